//! Vectorizers turn raw text into feature vectors.

pub mod tfidf;

pub use tfidf::{TfIdfState, TfIdfVectorizer};

use crate::error::ClassifyResult;
use crate::ml::features::SparseVector;

/// A fitted text-to-feature transformer.
///
/// Implementations must accept empty and whitespace-only text and return an
/// all-zero vector for it rather than an error.
pub trait Vectorizer: Send + Sync {
    /// Transform one utterance into a feature vector of dimension [`n_features`].
    ///
    /// [`n_features`]: Vectorizer::n_features
    fn transform(&self, text: &str) -> ClassifyResult<SparseVector>;

    /// Dimension of the produced feature vectors.
    fn n_features(&self) -> usize;

    /// Get the name of this vectorizer for debugging and logging.
    fn name(&self) -> &'static str;
}
