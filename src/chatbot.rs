//! The host-facing chatbot.
//!
//! [`Chatbot`] ties the loaded [`Artifacts`], an [`IntentClassifier`] and a
//! [`ResponseResolver`] together. [`Chatbot::get_reply`] always produces a
//! displayable string:
//!
//! | situation                          | reply                          |
//! |------------------------------------|--------------------------------|
//! | predicted tag is in the catalog    | one of the tag's responses     |
//! | predicted tag is not in the catalog| the fallback message           |
//! | classification failed              | the unavailability message     |
//! | artifacts failed to load           | the unavailability message     |

use log::{debug, error, warn};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::ChatbotConfig;
use crate::error::{ClassifyResult, LoadError};
use crate::ml::intent_classifier::IntentClassifier;
use crate::resolver::{ResponseResolver, UNAVAILABLE_RESPONSE};
use crate::store::Artifacts;

/// How a reply was produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyOutcome {
    /// The predicted tag was found in the catalog.
    Matched { tag: String },
    /// The predicted tag has no catalog entry; the fallback was used.
    Unmatched { tag: String },
    /// Classification failed for this utterance.
    Failed { reason: String },
    /// The artifacts never loaded.
    Unavailable,
}

/// A reply and the way it was produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    pub outcome: ReplyOutcome,
}

enum State<R> {
    Available {
        artifacts: Artifacts,
        classifier: IntentClassifier,
        resolver: ResponseResolver<R>,
    },
    Unavailable(LoadError),
}

/// Intent-classifying chatbot.
pub struct Chatbot<R = StdRng> {
    state: State<R>,
    unavailable_message: String,
}

impl<R> std::fmt::Debug for Chatbot<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.state {
            State::Available { artifacts, .. } => f
                .debug_struct("Chatbot")
                .field("artifacts", artifacts)
                .finish_non_exhaustive(),
            State::Unavailable(e) => f
                .debug_struct("Chatbot")
                .field("load_error", e)
                .finish_non_exhaustive(),
        }
    }
}

impl Chatbot<StdRng> {
    /// Load the artifacts named by `config`.
    ///
    /// A load failure (logged once by the store) leaves the chatbot
    /// permanently unavailable; it is never retried.
    pub fn from_config(config: &ChatbotConfig) -> Self {
        let chatbot = match config.store().load() {
            Ok(artifacts) => Chatbot::new(artifacts, config.resolver()),
            Err(e) => Chatbot::unavailable(e),
        };
        chatbot.with_unavailable_message(config.messages.unavailable.clone())
    }
}

impl<R: Rng> Chatbot<R> {
    /// A chatbot over loaded artifacts.
    pub fn new(artifacts: Artifacts, resolver: ResponseResolver<R>) -> Self {
        let classifier = artifacts.intent_classifier();
        Self {
            state: State::Available {
                artifacts,
                classifier,
                resolver,
            },
            unavailable_message: UNAVAILABLE_RESPONSE.to_string(),
        }
    }

    /// A chatbot whose artifacts failed to load.
    pub fn unavailable(error: LoadError) -> Self {
        Self {
            state: State::Unavailable(error),
            unavailable_message: UNAVAILABLE_RESPONSE.to_string(),
        }
    }

    /// Replace the unavailability message.
    pub fn with_unavailable_message<S: Into<String>>(mut self, message: S) -> Self {
        self.unavailable_message = message.into();
        self
    }

    /// True when the artifacts loaded.
    pub fn is_available(&self) -> bool {
        matches!(self.state, State::Available { .. })
    }

    /// The error that made this chatbot unavailable.
    pub fn load_error(&self) -> Option<&LoadError> {
        match &self.state {
            State::Unavailable(e) => Some(e),
            State::Available { .. } => None,
        }
    }

    /// The loaded artifacts.
    pub fn artifacts(&self) -> Option<&Artifacts> {
        match &self.state {
            State::Available { artifacts, .. } => Some(artifacts),
            State::Unavailable(_) => None,
        }
    }

    /// The intent classifier.
    pub fn classifier(&self) -> Option<&IntentClassifier> {
        match &self.state {
            State::Available { classifier, .. } => Some(classifier),
            State::Unavailable(_) => None,
        }
    }

    /// Reply to an utterance.
    pub fn get_reply(&self, user_text: &str) -> String {
        self.respond(user_text).text
    }

    /// Reply to raw input bytes.
    pub fn get_reply_bytes(&self, user_bytes: &[u8]) -> String {
        self.respond_bytes(user_bytes).text
    }

    /// Reply to an utterance, reporting how the reply was produced.
    pub fn respond(&self, user_text: &str) -> Reply {
        self.respond_with(|classifier| classifier.predict(user_text))
    }

    /// Reply to raw input bytes, reporting how the reply was produced.
    pub fn respond_bytes(&self, user_bytes: &[u8]) -> Reply {
        self.respond_with(|classifier| classifier.predict_bytes(user_bytes))
    }

    fn respond_with(
        &self,
        predict: impl FnOnce(&IntentClassifier) -> ClassifyResult<String>,
    ) -> Reply {
        let State::Available {
            artifacts,
            classifier,
            resolver,
        } = &self.state
        else {
            debug!("Replying while unavailable");
            return self.unavailable_reply(ReplyOutcome::Unavailable);
        };

        let tag = match predict(classifier) {
            Ok(tag) => tag,
            Err(e) => {
                error!("Classification failed: {e}");
                return self.unavailable_reply(ReplyOutcome::Failed {
                    reason: e.to_string(),
                });
            }
        };

        match resolver.choose(&tag, artifacts.catalog()) {
            Some(response) => Reply {
                text: response.to_string(),
                outcome: ReplyOutcome::Matched { tag },
            },
            None => {
                warn!("No catalog entry for intent {tag:?}");
                Reply {
                    text: resolver.fallback().to_string(),
                    outcome: ReplyOutcome::Unmatched { tag },
                }
            }
        }
    }

    fn unavailable_reply(&self, outcome: ReplyOutcome) -> Reply {
        Reply {
            text: self.unavailable_message.clone(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{IntentCatalog, IntentEntry};
    use crate::error::ClassifyError;
    use crate::ml::classifier::{Classifier, IntentScore};
    use crate::ml::features::SparseVector;
    use crate::ml::vectorizer::Vectorizer;
    use crate::resolver::FALLBACK_RESPONSE;

    struct ZeroVectorizer;

    impl Vectorizer for ZeroVectorizer {
        fn transform(&self, _text: &str) -> ClassifyResult<SparseVector> {
            Ok(SparseVector::zeros(1))
        }

        fn n_features(&self) -> usize {
            1
        }

        fn name(&self) -> &'static str {
            "zero"
        }
    }

    struct FixedClassifier {
        labels: Vec<String>,
        fail: bool,
    }

    impl Classifier for FixedClassifier {
        fn predict(&self, _features: &SparseVector) -> ClassifyResult<String> {
            if self.fail {
                return Err(ClassifyError::predict("model offline"));
            }
            Ok(self.labels[0].clone())
        }

        fn scores(&self, _features: &SparseVector) -> ClassifyResult<Vec<IntentScore>> {
            Ok(vec![IntentScore {
                tag: self.labels[0].clone(),
                score: 1.0,
            }])
        }

        fn labels(&self) -> &[String] {
            &self.labels
        }

        fn n_features(&self) -> usize {
            1
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn chatbot(tag: &str, fail: bool) -> Chatbot {
        let catalog = IntentCatalog::from_entries(vec![
            IntentEntry::new("greeting", ["Hello!", "Hi there!"]).unwrap(),
        ])
        .unwrap();
        let artifacts = Artifacts::new(
            Arc::new(ZeroVectorizer),
            Arc::new(FixedClassifier {
                labels: vec![tag.to_string()],
                fail,
            }),
            Arc::new(catalog),
        );
        Chatbot::new(artifacts, ResponseResolver::seeded(0))
    }

    #[test]
    fn test_matched() {
        let reply = chatbot("greeting", false).respond("hi");
        assert!(reply.text == "Hello!" || reply.text == "Hi there!");
        assert_eq!(
            reply.outcome,
            ReplyOutcome::Matched {
                tag: "greeting".to_string()
            }
        );
    }

    #[test]
    fn test_unmatched() {
        let reply = chatbot("unknown_tag_xyz", false).respond("asdkfj");
        assert_eq!(reply.text, FALLBACK_RESPONSE);
        assert!(matches!(reply.outcome, ReplyOutcome::Unmatched { .. }));
    }

    #[test]
    fn test_classify_failure_is_unavailable_text() {
        let bot = chatbot("greeting", true);
        let reply = bot.respond("hi");
        assert_eq!(reply.text, UNAVAILABLE_RESPONSE);
        assert!(matches!(reply.outcome, ReplyOutcome::Failed { .. }));
        assert!(bot.is_available());
    }

    #[test]
    fn test_invalid_utf8() {
        let bot = chatbot("greeting", false);
        assert_eq!(bot.get_reply_bytes(&[0xc3, 0x28]), UNAVAILABLE_RESPONSE);
        let reply = bot.get_reply_bytes(b"hi");
        assert!(reply == "Hello!" || reply == "Hi there!");
    }

    #[test]
    fn test_unavailable() {
        let bot: Chatbot = Chatbot::unavailable(LoadError::NotFound {
            artifact: "model/classifier.bin".to_string(),
        })
        .with_unavailable_message("Offline.");
        assert!(!bot.is_available());
        assert!(bot.artifacts().is_none());
        assert!(matches!(bot.load_error(), Some(LoadError::NotFound { .. })));
        assert_eq!(bot.get_reply("hi"), "Offline.");
        assert_eq!(bot.respond("").outcome, ReplyOutcome::Unavailable);
    }

    #[test]
    fn test_outcome_serializes_with_kind() {
        let json = serde_json::to_value(ReplyOutcome::Matched {
            tag: "greeting".to_string(),
        })
        .unwrap();
        assert_eq!(json["kind"], "matched");
        assert_eq!(json["tag"], "greeting");
    }
}
