//! # Jarvis
//!
//! Intent classification and templated replies for conversational agents.
//!
//! ## Features
//!
//! - Text analysis pipeline (tokenizers, token filters, analyzers)
//! - TF-IDF vectorization with pluggable classifiers
//! - Checksummed binary model artifacts
//! - An intent catalog with uniformly random response selection
//! - A chatbot facade that always produces a displayable reply
//!
//! ## Model artifacts
//!
//! The chatbot reads `model/vectorizer.bin`, `model/classifier.bin` and
//! `dataset/intents.json`. To build the two model files from the bundled
//! dataset, run `cargo run --example build_model`.
//!
//! ## Example
//!
//! ```no_run
//! use jarvis::prelude::*;
//!
//! let chatbot = Chatbot::from_config(&ChatbotConfig::default());
//! println!("{}", chatbot.get_reply("hello"));
//! ```

pub mod analysis;
pub mod artifact;
pub mod catalog;
pub mod chatbot;
pub mod cli;
pub mod config;
pub mod error;
pub mod ml;
pub mod resolver;
pub mod store;

pub mod prelude {
    pub use crate::catalog::{IntentCatalog, IntentEntry};
    pub use crate::chatbot::{Chatbot, Reply, ReplyOutcome};
    pub use crate::config::{ChatbotConfig, ReplyMessages};
    pub use crate::error::{ClassifyError, JarvisError, LoadError, Result};
    pub use crate::ml::{Classifier, IntentClassifier, Vectorizer};
    pub use crate::resolver::{FALLBACK_RESPONSE, ResponseResolver, UNAVAILABLE_RESPONSE};
    pub use crate::store::{ArtifactPaths, ArtifactStore, Artifacts};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
