//! Chatbot configuration.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration:
//!
//! ```json
//! {
//!   "artifacts": {
//!     "vectorizer": "model/vectorizer.bin",
//!     "classifier": "model/classifier.bin",
//!     "catalog": "dataset/intents.json"
//!   },
//!   "messages": { "fallback": "Pardon?" },
//!   "validate_labels": true,
//!   "seed": 42
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{JarvisError, Result};
use crate::resolver::{FALLBACK_RESPONSE, ResponseResolver, UNAVAILABLE_RESPONSE};
use crate::store::{ArtifactPaths, ArtifactStore};

/// Fixed replies for the non-matching paths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyMessages {
    /// Reply when the predicted intent has no catalog entry.
    pub fallback: String,
    /// Reply when the artifacts failed to load or classification failed.
    pub unavailable: String,
}

impl Default for ReplyMessages {
    fn default() -> Self {
        Self {
            fallback: FALLBACK_RESPONSE.to_string(),
            unavailable: UNAVAILABLE_RESPONSE.to_string(),
        }
    }
}

/// Configuration for building a [`Chatbot`](crate::chatbot::Chatbot).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatbotConfig {
    /// Where the artifacts live.
    pub artifacts: ArtifactPaths,
    /// Fixed replies.
    pub messages: ReplyMessages,
    /// Fail loading when a classifier label has no catalog entry.
    pub validate_labels: bool,
    /// Seed for response selection; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl ChatbotConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| JarvisError::config(e.to_string()))
    }

    /// Read a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| JarvisError::config(format!("{}: {e}", path.display())))
    }

    /// An artifact store for this configuration.
    pub fn store(&self) -> ArtifactStore {
        ArtifactStore::new(self.artifacts.clone()).validate_labels(self.validate_labels)
    }

    /// A response resolver for this configuration.
    pub fn resolver(&self) -> ResponseResolver {
        let resolver = match self.seed {
            Some(seed) => ResponseResolver::seeded(seed),
            None => ResponseResolver::new(),
        };
        resolver.with_fallback(self.messages.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ChatbotConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ChatbotConfig::default());
        assert_eq!(config.messages.fallback, FALLBACK_RESPONSE);
        assert_eq!(config.messages.unavailable, UNAVAILABLE_RESPONSE);
        assert!(!config.validate_labels);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_partial_config() {
        let config = ChatbotConfig::from_json_str(
            r#"{"artifacts": {"catalog": "intents.json"}, "messages": {"fallback": "Pardon?"}, "seed": 3}"#,
        )
        .unwrap();
        assert_eq!(config.artifacts.catalog, PathBuf::from("intents.json"));
        assert_eq!(
            config.artifacts.vectorizer,
            PathBuf::from("model/vectorizer.bin")
        );
        assert_eq!(config.messages.fallback, "Pardon?");
        assert_eq!(config.messages.unavailable, UNAVAILABLE_RESPONSE);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.resolver().fallback(), "Pardon?");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"validate_labels": true}}"#).unwrap();
        let config = ChatbotConfig::from_file(file.path()).unwrap();
        assert!(config.validate_labels);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "not json").unwrap();
        assert!(matches!(
            ChatbotConfig::from_file(bad.path()),
            Err(JarvisError::Config(_))
        ));
    }
}
