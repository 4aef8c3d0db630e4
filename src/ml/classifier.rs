//! Classifiers map feature vectors to intent tags.

pub mod centroid;
pub mod linear;

pub use centroid::NearestCentroidClassifier;
pub use linear::LinearClassifier;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifyError, ClassifyResult, JarvisError, Result};
use crate::ml::features::SparseVector;

/// A label together with the score a classifier assigned to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentScore {
    /// Intent tag.
    pub tag: String,
    /// Classifier score; higher is more likely.
    pub score: f64,
}

/// A fitted mapping from feature vectors to intent tags.
///
/// `predict` returns exactly one of [`labels`](Classifier::labels). There is
/// no thresholding: an all-zero vector still yields the model's default tag.
pub trait Classifier: Send + Sync {
    /// Predict the single most likely tag.
    fn predict(&self, features: &SparseVector) -> ClassifyResult<String>;

    /// Score every label, in the order of [`labels`](Classifier::labels).
    fn scores(&self, features: &SparseVector) -> ClassifyResult<Vec<IntentScore>>;

    /// The labels known to this classifier at training time.
    fn labels(&self) -> &[String];

    /// Dimension of the feature vectors this classifier accepts.
    fn n_features(&self) -> usize;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &'static str;
}

/// Persisted form of a classifier artifact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClassifierModel {
    /// One-vs-rest linear model.
    Linear(LinearClassifier),
    /// Cosine nearest-centroid model.
    NearestCentroid(NearestCentroidClassifier),
}

impl ClassifierModel {
    /// Check the internal consistency of a decoded model.
    pub fn validate(&self) -> Result<()> {
        match self {
            ClassifierModel::Linear(model) => model.validate(),
            ClassifierModel::NearestCentroid(model) => model.validate(),
        }
    }

    /// Labels of the wrapped classifier.
    pub fn labels(&self) -> &[String] {
        match self {
            ClassifierModel::Linear(model) => model.labels(),
            ClassifierModel::NearestCentroid(model) => model.labels(),
        }
    }

    /// Convert into a shareable classifier.
    pub fn into_classifier(self) -> Arc<dyn Classifier> {
        match self {
            ClassifierModel::Linear(model) => Arc::new(model),
            ClassifierModel::NearestCentroid(model) => Arc::new(model),
        }
    }
}

impl From<LinearClassifier> for ClassifierModel {
    fn from(model: LinearClassifier) -> Self {
        ClassifierModel::Linear(model)
    }
}

impl From<NearestCentroidClassifier> for ClassifierModel {
    fn from(model: NearestCentroidClassifier) -> Self {
        ClassifierModel::NearestCentroid(model)
    }
}

/// Reject feature vectors whose dimension disagrees with the model.
pub(crate) fn check_dimension(expected: usize, features: &SparseVector) -> ClassifyResult<()> {
    if features.dim() != expected {
        return Err(ClassifyError::predict(format!(
            "expected {expected} features, got {}",
            features.dim()
        )));
    }
    Ok(())
}

/// Labels must be non-empty strings, distinct, and there must be at least one.
pub(crate) fn validate_labels(labels: &[String]) -> Result<()> {
    if labels.is_empty() {
        return Err(JarvisError::invalid_argument("classifier has no labels"));
    }
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if label.is_empty() {
            return Err(JarvisError::invalid_argument("empty classifier label"));
        }
        if !seen.insert(label.as_str()) {
            return Err(JarvisError::invalid_argument(format!(
                "duplicate classifier label {label:?}"
            )));
        }
    }
    Ok(())
}

/// Index of the largest value; the first index wins ties.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}
