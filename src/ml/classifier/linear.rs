//! One-vs-rest linear classifier.

use serde::{Deserialize, Serialize};

use crate::error::{ClassifyError, ClassifyResult, JarvisError, Result};
use crate::ml::classifier::{
    Classifier, IntentScore, argmax, check_dimension, validate_labels,
};
use crate::ml::features::SparseVector;

/// A linear model: one weight row and intercept per label.
///
/// The decision value of label `k` is `w_k · x + b_k`. With an all-zero input
/// the intercepts decide, which reproduces the majority-class behaviour of
/// the usual offline trainers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    labels: Vec<String>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    n_features: usize,
}

impl LinearClassifier {
    /// Create a classifier from exported weights.
    pub fn new(
        labels: Vec<String>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    ) -> Result<Self> {
        let n_features = coefficients.first().map_or(0, Vec::len);
        let model = Self {
            labels,
            coefficients,
            intercepts,
            n_features,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check shapes and values.
    pub fn validate(&self) -> Result<()> {
        validate_labels(&self.labels)?;
        if self.coefficients.len() != self.labels.len() {
            return Err(JarvisError::invalid_argument(format!(
                "{} labels but {} coefficient rows",
                self.labels.len(),
                self.coefficients.len()
            )));
        }
        if self.intercepts.len() != self.labels.len() {
            return Err(JarvisError::invalid_argument(format!(
                "{} labels but {} intercepts",
                self.labels.len(),
                self.intercepts.len()
            )));
        }
        if let Some(row) = self
            .coefficients
            .iter()
            .position(|row| row.len() != self.n_features)
        {
            return Err(JarvisError::invalid_argument(format!(
                "coefficient row {row} does not have {} columns",
                self.n_features
            )));
        }
        let finite = self
            .coefficients
            .iter()
            .flatten()
            .chain(self.intercepts.iter())
            .all(|w| w.is_finite());
        if !finite {
            return Err(JarvisError::invalid_argument("non-finite model weight"));
        }
        Ok(())
    }

    /// Raw decision values in label order.
    pub fn decision_function(&self, features: &SparseVector) -> ClassifyResult<Vec<f64>> {
        check_dimension(self.n_features, features)?;
        Ok(self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| features.dot_dense(row) + intercept)
            .collect())
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &SparseVector) -> ClassifyResult<String> {
        let decision = self.decision_function(features)?;
        argmax(&decision)
            .map(|index| self.labels[index].clone())
            .ok_or_else(|| ClassifyError::predict("classifier has no labels"))
    }

    /// Softmax over the decision values.
    fn scores(&self, features: &SparseVector) -> ClassifyResult<Vec<IntentScore>> {
        let decision = self.decision_function(features)?;
        let max = decision.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = decision.iter().map(|d| (d - max).exp()).collect();
        let total: f64 = exp.iter().sum();

        Ok(self
            .labels
            .iter()
            .zip(exp)
            .map(|(tag, e)| IntentScore {
                tag: tag.clone(),
                score: e / total,
            })
            .collect())
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LinearClassifier {
        LinearClassifier::new(
            vec!["greeting".to_string(), "goodbye".to_string()],
            vec![vec![2.0, -1.0, 0.0], vec![-1.0, 2.0, 0.0]],
            vec![0.1, 0.3],
        )
        .unwrap()
    }

    #[test]
    fn test_predict_follows_weights() {
        let classifier = model();
        let hello = SparseVector::from_dense(&[1.0, 0.0, 0.0]);
        let bye = SparseVector::from_dense(&[0.0, 1.0, 0.0]);
        assert_eq!(classifier.predict(&hello).unwrap(), "greeting");
        assert_eq!(classifier.predict(&bye).unwrap(), "goodbye");
    }

    #[test]
    fn test_zero_vector_uses_intercepts() {
        let classifier = model();
        assert_eq!(
            classifier.predict(&SparseVector::zeros(3)).unwrap(),
            "goodbye"
        );
    }

    #[test]
    fn test_scores_are_probabilities() {
        let classifier = model();
        let scores = classifier
            .scores(&SparseVector::from_dense(&[1.0, 0.0, 1.0]))
            .unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].tag, "greeting");
        let total: f64 = scores.iter().map(|s| s.score).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(scores[0].score > scores[1].score);
    }

    #[test]
    fn test_dimension_mismatch_is_predict_failure() {
        let classifier = model();
        let result = classifier.predict(&SparseVector::zeros(5));
        assert!(matches!(result, Err(ClassifyError::PredictFailed(_))));
    }

    #[test]
    fn test_new_rejects_bad_shapes() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert!(LinearClassifier::new(labels.clone(), vec![vec![1.0]], vec![0.0, 0.0]).is_err());
        assert!(
            LinearClassifier::new(labels.clone(), vec![vec![1.0], vec![1.0, 2.0]], vec![0.0, 0.0])
                .is_err()
        );
        assert!(
            LinearClassifier::new(labels.clone(), vec![vec![1.0], vec![2.0]], vec![0.0]).is_err()
        );
        assert!(
            LinearClassifier::new(labels, vec![vec![f64::NAN], vec![2.0]], vec![0.0, 0.0])
                .is_err()
        );
    }
}
