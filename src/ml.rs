//! Trained-model layer of the chatbot core.
//!
//! The vectorizer and classifier are opaque capabilities behind the
//! [`Vectorizer`] and [`Classifier`] traits; [`IntentClassifier`] composes them
//! into a single `text -> tag` operation.
//!
//! # Architecture
//!
//! - `Vectorizer` trait: raw text to a [`SparseVector`] of features
//! - `TfIdfVectorizer`: smoothed TF-IDF with L2 normalization
//! - `Classifier` trait: features to one intent tag, plus per-class scores
//! - `LinearClassifier`: one-vs-rest linear model exported by an offline trainer
//! - `NearestCentroidClassifier`: cosine similarity against per-intent centroids
//! - `ClassifierModel`: the persisted form of either classifier

pub mod classifier;
pub mod features;
pub mod intent_classifier;
pub mod vectorizer;

pub use classifier::{
    Classifier, ClassifierModel, IntentScore, LinearClassifier, NearestCentroidClassifier,
};
pub use features::SparseVector;
pub use intent_classifier::IntentClassifier;
pub use vectorizer::{TfIdfVectorizer, Vectorizer};
