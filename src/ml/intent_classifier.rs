//! Text-to-intent classification.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, error};

use crate::error::{ClassifyError, ClassifyResult};
use crate::ml::classifier::{Classifier, IntentScore};
use crate::ml::vectorizer::Vectorizer;

/// Wraps a fitted vectorizer and classifier into a single `text -> tag` step.
///
/// The returned tag is always one of the classifier's labels. Whether the
/// intent catalog knows that tag is the resolver's concern.
#[derive(Clone)]
pub struct IntentClassifier {
    vectorizer: Arc<dyn Vectorizer>,
    classifier: Arc<dyn Classifier>,
}

impl std::fmt::Debug for IntentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentClassifier")
            .field("vectorizer", &self.vectorizer.name())
            .field("classifier", &self.classifier.name())
            .field("labels", &self.classifier.labels().len())
            .finish()
    }
}

impl IntentClassifier {
    /// Create a new intent classifier from shared model handles.
    pub fn new(vectorizer: Arc<dyn Vectorizer>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            vectorizer,
            classifier,
        }
    }

    /// Predict the intent tag for an utterance.
    ///
    /// Empty or whitespace-only text is valid input and yields the
    /// classifier's default prediction.
    pub fn predict(&self, text: &str) -> ClassifyResult<String> {
        let tag = guarded("predict", || {
            let features = self.vectorizer.transform(text)?;
            self.classifier.predict(&features)
        })?;
        debug!("Predicted intent {tag:?} for {} byte utterance", text.len());
        Ok(tag)
    }

    /// Predict from raw bytes, rejecting input that is not valid UTF-8.
    pub fn predict_bytes(&self, bytes: &[u8]) -> ClassifyResult<String> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ClassifyError::transform(format!("input is not valid UTF-8: {e}")))?;
        self.predict(text)
    }

    /// Score every label for an utterance, best first.
    ///
    /// The tag `predict` returns always leads, even when the classifier
    /// falls back to a default label that does not have the top score.
    pub fn rank(&self, text: &str) -> ClassifyResult<Vec<IntentScore>> {
        let (predicted, mut scores) = guarded("rank", || {
            let features = self.vectorizer.transform(text)?;
            let predicted = self.classifier.predict(&features)?;
            Ok((predicted, self.classifier.scores(&features)?))
        })?;
        scores.sort_by(|a, b| {
            (b.tag == predicted)
                .cmp(&(a.tag == predicted))
                .then_with(|| b.score.total_cmp(&a.score))
        });
        Ok(scores)
    }

    /// The labels the underlying classifier can predict.
    pub fn labels(&self) -> &[String] {
        self.classifier.labels()
    }

    /// The wrapped vectorizer.
    pub fn vectorizer(&self) -> &Arc<dyn Vectorizer> {
        &self.vectorizer
    }

    /// The wrapped classifier.
    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }
}

/// Run a model call, turning a panic inside the model into `PredictFailed`.
fn guarded<T>(
    operation: &str,
    call: impl FnOnce() -> ClassifyResult<T>,
) -> ClassifyResult<T> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!("Model panicked during {operation}: {message}");
            Err(ClassifyError::predict(format!("model panicked: {message}")))
        }
    }
}
