//! Error types for the Jarvis library.
//!
//! Two failure domains matter to callers of the chatbot core:
//!
//! - [`LoadError`] is raised while materializing the trained artifacts. It is
//!   fatal to startup and puts the chatbot into its permanent unavailable mode.
//! - [`ClassifyError`] is raised per utterance. It is recovered by the chatbot
//!   facade and never reaches the host.
//!
//! Everything else (configuration, analysis, CLI plumbing) is reported through
//! [`JarvisError`] and the crate-wide [`Result`] alias.
//!
//! # Examples
//!
//! ```
//! use jarvis::error::{JarvisError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(JarvisError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// Errors raised while loading the vectorizer, classifier and intent catalog.
#[derive(Error, Debug)]
pub enum LoadError {
    /// One of the artifact sources does not exist.
    #[error("Artifact not found: {artifact}")]
    NotFound { artifact: String },

    /// An artifact source exists but could not be read.
    #[error("Failed to read artifact {artifact}: {source}")]
    Unreadable {
        artifact: String,
        #[source]
        source: io::Error,
    },

    /// An artifact could not be decoded, or decoded into an inconsistent model.
    #[error("Corrupt artifact {artifact}: {reason}")]
    Corrupt { artifact: String, reason: String },

    /// The intent catalog is valid JSON but does not have the expected shape.
    #[error("Invalid intent catalog: {reason}")]
    SchemaInvalid { reason: String },

    /// The classifier predicts labels the catalog has no entry for.
    #[error("Classifier labels missing from intent catalog: {}", missing.join(", "))]
    LabelMismatch { missing: Vec<String> },
}

impl LoadError {
    /// Create a new corrupt artifact error.
    pub fn corrupt<A: Into<String>, R: Into<String>>(artifact: A, reason: R) -> Self {
        LoadError::Corrupt {
            artifact: artifact.into(),
            reason: reason.into(),
        }
    }

    /// Create a new catalog schema error.
    pub fn schema<S: Into<String>>(reason: S) -> Self {
        LoadError::SchemaInvalid {
            reason: reason.into(),
        }
    }

    /// Map an I/O error raised while reading `artifact`.
    pub fn from_io<A: Into<String>>(artifact: A, source: io::Error) -> Self {
        let artifact = artifact.into();
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound { artifact }
        } else {
            LoadError::Unreadable { artifact, source }
        }
    }
}

/// Errors raised while turning a single utterance into an intent tag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// The vectorizer rejected the input.
    #[error("Transform failed: {0}")]
    TransformFailed(String),

    /// The classifier could not produce a prediction.
    #[error("Predict failed: {0}")]
    PredictFailed(String),
}

impl ClassifyError {
    /// Create a new transform error.
    pub fn transform<S: Into<String>>(msg: S) -> Self {
        ClassifyError::TransformFailed(msg.into())
    }

    /// Create a new predict error.
    pub fn predict<S: Into<String>>(msg: S) -> Self {
        ClassifyError::PredictFailed(msg.into())
    }
}

/// The main error type for Jarvis operations.
#[derive(Error, Debug)]
pub enum JarvisError {
    /// I/O errors (file operations, terminal, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Artifact loading errors
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Per-utterance classification errors
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with JarvisError.
pub type Result<T> = std::result::Result<T, JarvisError>;

/// Result type alias for artifact loading.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Result type alias for per-utterance classification.
pub type ClassifyResult<T> = std::result::Result<T, ClassifyError>;

impl JarvisError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        JarvisError::Analysis(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        JarvisError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        JarvisError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        JarvisError::Other(format!("Invalid argument: {}", msg.into()))
    }
}
