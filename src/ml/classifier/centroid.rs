//! Cosine nearest-centroid classifier.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifyResult, JarvisError, Result};
use crate::ml::classifier::{
    Classifier, IntentScore, argmax, check_dimension, validate_labels,
};
use crate::ml::features::SparseVector;

/// Classifies by cosine similarity to the mean feature vector of each intent.
///
/// Inputs with no similarity to any centroid (including the all-zero vector)
/// fall back to the label with the most training samples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NearestCentroidClassifier {
    labels: Vec<String>,
    centroids: Vec<Vec<f64>>,
    default_label: usize,
    n_features: usize,
}

impl NearestCentroidClassifier {
    /// Build centroids from labelled feature vectors.
    ///
    /// Labels keep their order of first appearance.
    pub fn fit(features: &[SparseVector], labels: &[String]) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(JarvisError::invalid_argument(format!(
                "{} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }
        let Some(first) = features.first() else {
            return Err(JarvisError::invalid_argument(
                "training samples cannot be empty",
            ));
        };
        let n_features = first.dim();

        let mut order: Vec<String> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut sums: Vec<Vec<f64>> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();

        for (vector, label) in features.iter().zip(labels) {
            if vector.dim() != n_features {
                return Err(JarvisError::invalid_argument(format!(
                    "feature dimension {} differs from {n_features}",
                    vector.dim()
                )));
            }
            let slot = *index.entry(label.as_str()).or_insert_with(|| {
                order.push(label.clone());
                sums.push(vec![0.0; n_features]);
                counts.push(0);
                order.len() - 1
            });
            for &(column, value) in vector.entries() {
                sums[slot][column] += value;
            }
            counts[slot] += 1;
        }

        let centroids = sums
            .into_iter()
            .zip(&counts)
            .map(|(sum, &count)| {
                let mean: Vec<f64> = sum.into_iter().map(|v| v / count as f64).collect();
                let norm = mean.iter().map(|v| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    mean.into_iter().map(|v| v / norm).collect()
                } else {
                    mean
                }
            })
            .collect();

        let counts: Vec<f64> = counts.into_iter().map(|c| c as f64).collect();
        let default_label = argmax(&counts).unwrap_or(0);

        let model = Self {
            labels: order,
            centroids,
            default_label,
            n_features,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check shapes and values.
    pub fn validate(&self) -> Result<()> {
        validate_labels(&self.labels)?;
        if self.centroids.len() != self.labels.len() {
            return Err(JarvisError::invalid_argument(format!(
                "{} labels but {} centroids",
                self.labels.len(),
                self.centroids.len()
            )));
        }
        if self.default_label >= self.labels.len() {
            return Err(JarvisError::invalid_argument(format!(
                "default label index {} out of range",
                self.default_label
            )));
        }
        for (label, centroid) in self.labels.iter().zip(&self.centroids) {
            if centroid.len() != self.n_features {
                return Err(JarvisError::invalid_argument(format!(
                    "centroid for {label:?} has {} columns, expected {}",
                    centroid.len(),
                    self.n_features
                )));
            }
            if centroid.iter().any(|v| !v.is_finite()) {
                return Err(JarvisError::invalid_argument(format!(
                    "centroid for {label:?} has non-finite values"
                )));
            }
        }
        Ok(())
    }

    /// The label returned when no centroid is similar to the input.
    pub fn default_label(&self) -> &str {
        &self.labels[self.default_label]
    }

    fn similarities(&self, features: &SparseVector) -> ClassifyResult<Vec<f64>> {
        check_dimension(self.n_features, features)?;
        let norm = features.norm();
        if norm == 0.0 {
            return Ok(vec![0.0; self.labels.len()]);
        }
        Ok(self
            .centroids
            .iter()
            .map(|centroid| features.dot_dense(centroid) / norm)
            .collect())
    }
}

impl Classifier for NearestCentroidClassifier {
    fn predict(&self, features: &SparseVector) -> ClassifyResult<String> {
        let similarities = self.similarities(features)?;
        let best = argmax(&similarities)
            .filter(|&index| similarities[index] > 0.0)
            .unwrap_or(self.default_label);
        Ok(self.labels[best].clone())
    }

    /// Cosine similarity to each centroid.
    fn scores(&self, features: &SparseVector) -> ClassifyResult<Vec<IntentScore>> {
        let similarities = self.similarities(features)?;
        Ok(self
            .labels
            .iter()
            .zip(similarities)
            .map(|(tag, score)| IntentScore {
                tag: tag.clone(),
                score,
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
        "nearest_centroid"
    }
}
