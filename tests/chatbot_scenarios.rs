use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use jarvis::analysis::analyzer::AnalyzerConfig;
use jarvis::artifact::{ArtifactKind, write_artifact};
use jarvis::catalog::{IntentCatalog, IntentEntry};
use jarvis::chatbot::{Chatbot, ReplyOutcome};
use jarvis::config::ChatbotConfig;
use jarvis::error::{ClassifyResult, LoadError, Result};
use jarvis::ml::classifier::{Classifier, ClassifierModel, IntentScore, NearestCentroidClassifier};
use jarvis::ml::features::SparseVector;
use jarvis::ml::vectorizer::{TfIdfVectorizer, Vectorizer};
use jarvis::resolver::{FALLBACK_RESPONSE, ResponseResolver, UNAVAILABLE_RESPONSE};
use jarvis::store::{ArtifactPaths, Artifacts};

const TRAINING: &[(&str, &str)] = &[
    ("hi", "greeting"),
    ("hello", "greeting"),
    ("hey there", "greeting"),
    ("good morning", "greeting"),
    ("bye", "goodbye"),
    ("see you later", "goodbye"),
    ("goodbye", "goodbye"),
    ("thanks", "thanks"),
    ("thank you", "thanks"),
    ("thanks a lot", "thanks"),
];

const CATALOG: &str = r#"{
    "intents": [
        {"tag": "greeting", "patterns": ["hi", "hello"], "responses": ["Hello!", "Hi there!"]},
        {"tag": "goodbye", "patterns": ["bye"], "responses": ["Bye!", "See you later!"]},
        {"tag": "thanks", "patterns": ["thanks"], "responses": ["Happy to help!", "Any time!"]}
    ]
}"#;

/// Vectorizer that ignores its input.
struct ConstantVectorizer;

impl Vectorizer for ConstantVectorizer {
    fn transform(&self, _text: &str) -> ClassifyResult<SparseVector> {
        Ok(SparseVector::from_dense(&[1.0]))
    }

    fn n_features(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

/// Classifier that always predicts the same tag.
struct StubClassifier {
    labels: Vec<String>,
}

impl StubClassifier {
    fn predicting(tag: &str) -> Self {
        Self {
            labels: vec![tag.to_string()],
        }
    }
}

impl Classifier for StubClassifier {
    fn predict(&self, _features: &SparseVector) -> ClassifyResult<String> {
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
        "stub"
    }
}

fn stub_chatbot(tag: &str, seed: u64) -> Result<Chatbot> {
    let catalog = IntentCatalog::from_entries(vec![IntentEntry::new(
        "greeting",
        ["Hello!", "Hi there!"],
    )?])?;
    let artifacts = Artifacts::new(
        Arc::new(ConstantVectorizer),
        Arc::new(StubClassifier::predicting(tag)),
        Arc::new(catalog),
    );
    Ok(Chatbot::new(artifacts, ResponseResolver::seeded(seed)))
}

fn write_trained_artifacts(root: &Path) -> Result<ArtifactPaths> {
    let paths = ArtifactPaths::in_dir(root);

    let documents: Vec<String> = TRAINING.iter().map(|(text, _)| text.to_string()).collect();
    let labels: Vec<String> = TRAINING.iter().map(|(_, tag)| tag.to_string()).collect();

    let mut vectorizer = TfIdfVectorizer::new(AnalyzerConfig::StandardNoStop)?;
    vectorizer.fit(&documents)?;
    let features = documents
        .iter()
        .map(|doc| vectorizer.transform_text(doc))
        .collect::<Result<Vec<_>>>()?;
    let classifier = NearestCentroidClassifier::fit(&features, &labels)?;

    write_artifact(&paths.vectorizer, ArtifactKind::Vectorizer, &vectorizer.to_state())?;
    write_artifact(
        &paths.classifier,
        ArtifactKind::Classifier,
        &ClassifierModel::from(classifier),
    )?;
    if let Some(parent) = paths.catalog.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&paths.catalog, CATALOG)?;

    Ok(paths)
}

fn trained_config(root: &Path) -> Result<ChatbotConfig> {
    Ok(ChatbotConfig {
        artifacts: write_trained_artifacts(root)?,
        seed: Some(11),
        ..ChatbotConfig::default()
    })
}

#[test]
fn stub_greeting_reply_is_one_of_the_greeting_responses() -> Result<()> {
    let chatbot = stub_chatbot("greeting", 1)?;
    for _ in 0..20 {
        let reply = chatbot.get_reply("hi");
        assert!(reply == "Hello!" || reply == "Hi there!", "unexpected {reply}");
    }
    Ok(())
}

#[test]
fn stub_unknown_tag_gets_the_fallback() -> Result<()> {
    let chatbot = stub_chatbot("unknown_tag_xyz", 1)?;
    assert_eq!(chatbot.get_reply("asdkfj"), FALLBACK_RESPONSE);
    assert_eq!(
        chatbot.respond("asdkfj").outcome,
        ReplyOutcome::Unmatched {
            tag: "unknown_tag_xyz".to_string()
        }
    );
    Ok(())
}

#[test]
fn missing_classifier_file_makes_the_chatbot_unavailable() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = trained_config(dir.path())?;
    fs::remove_file(&config.artifacts.classifier)?;

    assert!(matches!(
        config.store().load(),
        Err(LoadError::NotFound { .. })
    ));

    let chatbot = Chatbot::from_config(&config);
    assert!(!chatbot.is_available());
    assert!(matches!(
        chatbot.load_error(),
        Some(LoadError::NotFound { artifact }) if artifact.ends_with("classifier.bin")
    ));
    assert_eq!(chatbot.get_reply("hi"), UNAVAILABLE_RESPONSE);
    assert_eq!(chatbot.get_reply(""), UNAVAILABLE_RESPONSE);
    Ok(())
}

#[test]
fn unknown_tag_fallback_does_not_depend_on_the_seed() -> Result<()> {
    for seed in [0, 1, 42, u64::MAX] {
        let chatbot = stub_chatbot("no_such_intent", seed)?;
        for _ in 0..5 {
            assert_eq!(chatbot.get_reply("anything"), FALLBACK_RESPONSE);
        }
    }
    Ok(())
}

#[test]
fn trained_chatbot_replies_from_the_predicted_intent() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let chatbot = Chatbot::from_config(&trained_config(dir.path())?);
    assert!(chatbot.is_available());

    let cases = [
        ("hello", &["Hello!", "Hi there!"][..]),
        ("Bye", &["Bye!", "See you later!"][..]),
        ("thanks!", &["Happy to help!", "Any time!"][..]),
    ];
    for (utterance, expected) in cases {
        let reply = chatbot.respond(utterance);
        assert!(
            expected.contains(&reply.text.as_str()),
            "{utterance:?} got {reply:?}"
        );
        assert!(matches!(reply.outcome, ReplyOutcome::Matched { .. }));
    }
    Ok(())
}

#[test]
fn get_reply_never_fails_on_odd_input() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let chatbot = Chatbot::from_config(&trained_config(dir.path())?);

    let long = "hello ".repeat(50_000);
    let inputs = ["", "   \t\n", long.as_str(), "こんにちは 👋", "\u{0}\u{7f}", "¿¡?!"];
    for input in inputs {
        let reply = chatbot.get_reply(input);
        assert!(!reply.is_empty(), "empty reply for {input:?}");
    }

    assert_eq!(
        chatbot.get_reply_bytes(&[0xff, 0x00, 0xc3, 0x28]),
        UNAVAILABLE_RESPONSE
    );
    let reply = chatbot.get_reply_bytes("hello".as_bytes());
    assert!(reply == "Hello!" || reply == "Hi there!");
    Ok(())
}

#[test]
fn same_seed_gives_the_same_replies() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = trained_config(dir.path())?;
    let first = Chatbot::from_config(&config);
    let second = Chatbot::from_config(&config);

    let a: Vec<String> = (0..30).map(|_| first.get_reply("hello")).collect();
    let b: Vec<String> = (0..30).map(|_| second.get_reply("hello")).collect();
    assert_eq!(a, b);

    let distinct: HashSet<&String> = a.iter().collect();
    assert_eq!(distinct.len(), 2);
    Ok(())
}

#[test]
fn chatbot_can_be_shared_between_threads() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let chatbot = Chatbot::from_config(&trained_config(dir.path())?);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..100 {
                    let reply = chatbot.get_reply("hi");
                    assert!(reply == "Hello!" || reply == "Hi there!");
                }
            });
        }
    });
    Ok(())
}

#[test]
fn configured_messages_replace_the_defaults() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config = trained_config(dir.path())?;
    config.messages.unavailable = "Offline.".to_string();
    config.artifacts.catalog = dir.path().join("missing.json");

    let chatbot = Chatbot::from_config(&config);
    assert_eq!(chatbot.get_reply("hi"), "Offline.");
    Ok(())
}
