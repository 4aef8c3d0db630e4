//! TF-IDF vectorizer for text feature extraction.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, AnalyzerConfig};
use crate::error::{ClassifyError, ClassifyResult, JarvisError, Result};
use crate::ml::features::SparseVector;
use crate::ml::vectorizer::Vectorizer;

/// Persisted state of a fitted [`TfIdfVectorizer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TfIdfState {
    /// Analysis applied before counting terms.
    pub analyzer: AnalyzerConfig,
    /// Term -> column mapping.
    pub vocabulary: BTreeMap<String, usize>,
    /// Inverse document frequency per column.
    pub idf: Vec<f64>,
    /// Number of documents seen at fit time.
    pub n_documents: usize,
    /// Use `1 + ln(tf)` instead of raw term counts.
    pub sublinear_tf: bool,
}

/// TF-IDF vectorizer with smoothed IDF and L2-normalized output.
pub struct TfIdfVectorizer {
    config: AnalyzerConfig,
    analyzer: Arc<dyn Analyzer>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    n_documents: usize,
    sublinear_tf: bool,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .field("sublinear_tf", &self.sublinear_tf)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer using the described analyzer.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let analyzer = config.build()?;
        Ok(Self {
            config,
            analyzer,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            sublinear_tf: false,
        })
    }

    /// Enable or disable sublinear term frequency scaling.
    pub fn with_sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.sublinear_tf = sublinear_tf;
        self
    }

    /// Fit the vocabulary and IDF weights on a set of documents.
    ///
    /// Columns are assigned in lexicographic term order so that fitting the
    /// same documents always yields the same artifact.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();

        for doc in documents {
            let unique_terms: BTreeSet<String> = self.analyze(doc)?.into_iter().collect();
            for term in unique_terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n_documents = documents.len();
        let mut vocabulary = HashMap::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (column, (term, df)) in document_frequency.into_iter().enumerate() {
            // IDF = ln((N + 1) / (df + 1)) + 1
            idf.push(((n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0);
            vocabulary.insert(term, column);
        }

        self.vocabulary = vocabulary;
        self.idf = idf;
        self.n_documents = n_documents;

        Ok(())
    }

    /// Transform a document into a TF-IDF feature vector.
    pub fn transform_text(&self, document: &str) -> Result<SparseVector> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(document)? {
            if let Some(&column) = self.vocabulary.get(&term) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(column, count)| {
                let tf = if self.sublinear_tf {
                    1.0 + count.ln()
                } else {
                    count
                };
                (column, tf * self.idf[column])
            })
            .collect();

        let norm = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, value) in &mut entries {
                *value /= norm;
            }
        }

        SparseVector::from_entries(self.vocabulary.len(), entries)
    }

    /// Snapshot the fitted state for persistence.
    pub fn to_state(&self) -> TfIdfState {
        TfIdfState {
            analyzer: self.config.clone(),
            vocabulary: self
                .vocabulary
                .iter()
                .map(|(term, column)| (term.clone(), *column))
                .collect(),
            idf: self.idf.clone(),
            n_documents: self.n_documents,
            sublinear_tf: self.sublinear_tf,
        }
    }

    /// Rebuild a vectorizer from persisted state, validating its consistency.
    pub fn from_state(state: TfIdfState) -> Result<Self> {
        if state.idf.len() != state.vocabulary.len() {
            return Err(JarvisError::invalid_argument(format!(
                "vocabulary has {} terms but {} idf weights",
                state.vocabulary.len(),
                state.idf.len()
            )));
        }
        if state.idf.iter().any(|w| !w.is_finite()) {
            return Err(JarvisError::invalid_argument("non-finite idf weight"));
        }
        let mut seen = vec![false; state.idf.len()];
        for (term, &column) in &state.vocabulary {
            match seen.get_mut(column) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(JarvisError::invalid_argument(format!(
                        "column {column} assigned twice (term {term:?})"
                    )));
                }
                None => {
                    return Err(JarvisError::invalid_argument(format!(
                        "term {term:?} maps to out-of-range column {column}"
                    )));
                }
            }
        }

        let analyzer = state.analyzer.build()?;
        Ok(Self {
            config: state.analyzer,
            analyzer,
            vocabulary: state.vocabulary.into_iter().collect(),
            idf: state.idf,
            n_documents: state.n_documents,
            sublinear_tf: state.sublinear_tf,
        })
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of documents the vectorizer was fitted on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// The IDF weight of a term, if it is in the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&column| self.idf[column])
    }

    fn analyze(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyzer.analyze(text)?.map(|token| token.text).collect())
    }
}

impl Vectorizer for TfIdfVectorizer {
    fn transform(&self, text: &str) -> ClassifyResult<SparseVector> {
        self.transform_text(text)
            .map_err(|e| ClassifyError::transform(e.to_string()))
    }

    fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    fn name(&self) -> &'static str {
        "tfidf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted() -> TfIdfVectorizer {
        let documents = vec![
            "hello there".to_string(),
            "hi how are you".to_string(),
            "goodbye see you later".to_string(),
        ];
        let mut vectorizer = TfIdfVectorizer::new(AnalyzerConfig::StandardNoStop).unwrap();
        vectorizer.fit(&documents).unwrap();
        vectorizer
    }

    #[test]
    fn test_fit_builds_sorted_vocabulary() {
        let vectorizer = fitted();
        assert_eq!(vectorizer.vocabulary_size(), 9);
        assert_eq!(vectorizer.n_documents(), 3);

        let state = vectorizer.to_state();
        let columns: Vec<usize> = state.vocabulary.values().copied().collect();
        assert_eq!(columns, (0..9).collect::<Vec<_>>());
        assert_eq!(state.vocabulary["are"], 0);
    }

    #[test]
    fn test_idf_weights_rare_terms_higher() {
        let vectorizer = fitted();
        let shared = vectorizer.idf("you").unwrap();
        let rare = vectorizer.idf("hello").unwrap();
        assert!(rare > shared);
        assert!(((4.0f64 / 3.0).ln() + 1.0 - shared).abs() < 1e-12);
        assert_eq!(vectorizer.idf("missing"), None);
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let vectorizer = fitted();
        let features = vectorizer.transform("Hello HELLO you").unwrap();
        assert_eq!(features.dim(), vectorizer.vocabulary_size());
        assert_eq!(features.nnz(), 2);
        assert!((features.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_transform_empty_and_unknown_is_zero() {
        let vectorizer = fitted();
        for text in ["", "   ", "zzz qqq", "🤖🤖"] {
            let features = vectorizer.transform(text).unwrap();
            assert!(features.is_zero(), "expected zero vector for {text:?}");
            assert_eq!(features.dim(), 9);
        }
    }

    #[test]
    fn test_sublinear_tf_dampens_repeats() {
        let documents = vec!["hi hi".to_string(), "bye".to_string()];
        let mut raw = TfIdfVectorizer::new(AnalyzerConfig::StandardNoStop).unwrap();
        raw.fit(&documents).unwrap();
        let mut sublinear = TfIdfVectorizer::new(AnalyzerConfig::StandardNoStop)
            .unwrap()
            .with_sublinear_tf(true);
        sublinear.fit(&documents).unwrap();

        let text = "hi hi hi bye";
        let raw_hi = raw.transform(text).unwrap().entries()[1].1;
        let sub_hi = sublinear.transform(text).unwrap().entries()[1].1;
        assert!(sub_hi < raw_hi);
    }

    #[test]
    fn test_state_roundtrip_preserves_features() {
        let vectorizer = fitted();
        let restored = TfIdfVectorizer::from_state(vectorizer.to_state()).unwrap();
        assert_eq!(
            vectorizer.transform("hi there you").unwrap(),
            restored.transform("hi there you").unwrap()
        );
    }

    #[test]
    fn test_from_state_rejects_inconsistent_state() {
        let mut state = fitted().to_state();
        state.idf.pop();
        assert!(TfIdfVectorizer::from_state(state).is_err());

        let mut state = fitted().to_state();
        state.vocabulary.insert("extra".to_string(), 42);
        state.idf.push(1.0);
        assert!(TfIdfVectorizer::from_state(state).is_err());

        let mut state = fitted().to_state();
        state.vocabulary.insert("hello".to_string(), 0);
        assert!(TfIdfVectorizer::from_state(state).is_err());
    }
}
