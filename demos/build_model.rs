//! Build the model artifacts for the bundled intent dataset.
//!
//! ```text
//! cargo run --example build_model [DATASET] [OUT_DIR]
//! ```
//!
//! Reads the `patterns` of every intent in DATASET (default
//! `dataset/intents.json`) and writes `model/vectorizer.bin` and
//! `model/classifier.bin` under OUT_DIR (default `.`), where the `jarvis`
//! binary looks for them.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use jarvis::analysis::analyzer::AnalyzerConfig;
use jarvis::artifact::{ArtifactKind, write_artifact};
use jarvis::ml::classifier::{ClassifierModel, NearestCentroidClassifier};
use jarvis::ml::vectorizer::TfIdfVectorizer;
use jarvis::prelude::*;
use jarvis::store::DEFAULT_CATALOG_PATH;

#[derive(Deserialize)]
struct Dataset {
    intents: Vec<Intent>,
}

#[derive(Deserialize)]
struct Intent {
    tag: String,
    #[serde(default)]
    patterns: Vec<String>,
}

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let dataset = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string()));
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));

    println!("Reading training patterns from {}", dataset.display());
    let json = fs::read_to_string(&dataset)?;
    let Dataset { intents } = serde_json::from_str(&json)?;

    let mut documents = Vec::new();
    let mut labels = Vec::new();
    for intent in intents {
        for pattern in intent.patterns {
            documents.push(pattern);
            labels.push(intent.tag.clone());
        }
    }
    println!("{} patterns", documents.len());

    let mut vectorizer = TfIdfVectorizer::new(AnalyzerConfig::StandardNoStop)?;
    vectorizer.fit(&documents)?;
    let features = documents
        .iter()
        .map(|doc| vectorizer.transform_text(doc))
        .collect::<Result<Vec<_>>>()?;
    let classifier = NearestCentroidClassifier::fit(&features, &labels)?;
    println!(
        "Vocabulary of {} terms, {} intents",
        vectorizer.vocabulary_size(),
        classifier.labels().len()
    );

    let paths = ArtifactPaths::in_dir(&out_dir);
    write_artifact(&paths.vectorizer, ArtifactKind::Vectorizer, &vectorizer.to_state())?;
    write_artifact(
        &paths.classifier,
        ArtifactKind::Classifier,
        &ClassifierModel::from(classifier),
    )?;
    let dataset_in_place =
        fs::canonicalize(&paths.catalog).ok() == Some(fs::canonicalize(&dataset)?);
    if !dataset_in_place {
        if let Some(parent) = paths.catalog.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&dataset, &paths.catalog)?;
    }

    println!("Wrote {}", paths.vectorizer.display());
    println!("Wrote {}", paths.classifier.display());

    let chatbot = Chatbot::from_config(&ChatbotConfig {
        artifacts: paths,
        ..ChatbotConfig::default()
    });
    println!("\nhello -> {}", chatbot.get_reply("hello"));
    Ok(())
}
