//! Loading of the trained artifacts.
//!
//! [`ArtifactStore`] reads the vectorizer, the classifier and the intent
//! catalog from disk and produces an [`Artifacts`] bundle. Loading is all or
//! nothing: every source is read before any is decoded, and the bundle only
//! exists once every decode and cross-check has passed.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::artifact::{self, ArtifactKind};
use crate::catalog::IntentCatalog;
use crate::error::{LoadError, LoadResult};
use crate::ml::classifier::{Classifier, ClassifierModel};
use crate::ml::intent_classifier::IntentClassifier;
use crate::ml::vectorizer::{TfIdfState, TfIdfVectorizer, Vectorizer};

/// Default vectorizer artifact path.
pub const DEFAULT_VECTORIZER_PATH: &str = "model/vectorizer.bin";
/// Default classifier artifact path.
pub const DEFAULT_CLASSIFIER_PATH: &str = "model/classifier.bin";
/// Default intent catalog path.
pub const DEFAULT_CATALOG_PATH: &str = "dataset/intents.json";

/// Locations of the three artifacts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    pub vectorizer: PathBuf,
    pub classifier: PathBuf,
    pub catalog: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            vectorizer: PathBuf::from(DEFAULT_VECTORIZER_PATH),
            classifier: PathBuf::from(DEFAULT_CLASSIFIER_PATH),
            catalog: PathBuf::from(DEFAULT_CATALOG_PATH),
        }
    }
}

impl ArtifactPaths {
    /// The default layout rooted at `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            vectorizer: dir.join(DEFAULT_VECTORIZER_PATH),
            classifier: dir.join(DEFAULT_CLASSIFIER_PATH),
            catalog: dir.join(DEFAULT_CATALOG_PATH),
        }
    }
}

/// The loaded, immutable artifact bundle.
///
/// Cloning is cheap; all parts are shared.
#[derive(Clone)]
pub struct Artifacts {
    vectorizer: Arc<dyn Vectorizer>,
    classifier: Arc<dyn Classifier>,
    catalog: Arc<IntentCatalog>,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("vectorizer", &self.vectorizer.name())
            .field("classifier", &self.classifier.name())
            .field("labels", &self.classifier.labels())
            .field("catalog_len", &self.catalog.len())
            .finish()
    }
}

impl Artifacts {
    /// Assemble a bundle from already built parts.
    ///
    /// No cross-checks are made; this is the entry point for custom or stub
    /// models.
    pub fn new(
        vectorizer: Arc<dyn Vectorizer>,
        classifier: Arc<dyn Classifier>,
        catalog: Arc<IntentCatalog>,
    ) -> Self {
        Self {
            vectorizer,
            classifier,
            catalog,
        }
    }

    /// Decode a bundle from in-memory sources.
    ///
    /// `paths` is only used to name the sources in errors and logs.
    pub fn from_bytes(
        paths: &ArtifactPaths,
        vectorizer: &[u8],
        classifier: &[u8],
        catalog: &[u8],
        validate_labels: bool,
    ) -> LoadResult<Self> {
        let vectorizer_source = paths.vectorizer.display().to_string();
        let classifier_source = paths.classifier.display().to_string();
        let catalog_source = paths.catalog.display().to_string();

        let state: TfIdfState =
            artifact::decode(ArtifactKind::Vectorizer, &vectorizer_source, vectorizer)?;
        let vectorizer = TfIdfVectorizer::from_state(state)
            .map_err(|e| LoadError::corrupt(&vectorizer_source, e.to_string()))?;
        info!(
            "Loaded vectorizer from {vectorizer_source} ({} features)",
            vectorizer.vocabulary_size()
        );

        let model: ClassifierModel =
            artifact::decode(ArtifactKind::Classifier, &classifier_source, classifier)?;
        model
            .validate()
            .map_err(|e| LoadError::corrupt(&classifier_source, e.to_string()))?;
        let classifier = model.into_classifier();
        info!(
            "Loaded {} classifier from {classifier_source} ({} labels)",
            classifier.name(),
            classifier.labels().len()
        );

        if vectorizer.vocabulary_size() != classifier.n_features() {
            return Err(LoadError::corrupt(
                classifier_source,
                format!(
                    "classifier expects {} features but the vectorizer produces {}",
                    classifier.n_features(),
                    vectorizer.vocabulary_size()
                ),
            ));
        }

        let catalog = IntentCatalog::from_bytes(&catalog_source, catalog)?;
        if catalog.is_empty() {
            warn!("Intent catalog {catalog_source} has no intents");
        }
        info!("Loaded {} intents from {catalog_source}", catalog.len());

        let artifacts = Self::new(Arc::new(vectorizer), classifier, Arc::new(catalog));

        let missing = artifacts.unknown_labels();
        if !missing.is_empty() {
            if validate_labels {
                return Err(LoadError::LabelMismatch { missing });
            }
            warn!(
                "Classifier labels without a catalog entry: {}",
                missing.join(", ")
            );
        }

        Ok(artifacts)
    }

    /// Shared vectorizer.
    pub fn vectorizer(&self) -> &Arc<dyn Vectorizer> {
        &self.vectorizer
    }

    /// Shared classifier.
    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }

    /// Shared intent catalog.
    pub fn catalog(&self) -> &Arc<IntentCatalog> {
        &self.catalog
    }

    /// An [`IntentClassifier`] over this bundle's vectorizer and classifier.
    pub fn intent_classifier(&self) -> IntentClassifier {
        IntentClassifier::new(self.vectorizer.clone(), self.classifier.clone())
    }

    /// Classifier labels that have no catalog entry, in label order.
    pub fn unknown_labels(&self) -> Vec<String> {
        self.classifier
            .labels()
            .iter()
            .filter(|label| !self.catalog.contains(label))
            .cloned()
            .collect()
    }

    /// Catalog tags the classifier can never predict, in catalog order.
    pub fn unused_tags(&self) -> Vec<String> {
        let labels: HashSet<&str> = self
            .classifier
            .labels()
            .iter()
            .map(String::as_str)
            .collect();
        self.catalog
            .tags()
            .filter(|tag| !labels.contains(tag))
            .map(str::to_string)
            .collect()
    }
}

/// Loads [`Artifacts`] from the filesystem.
#[derive(Clone, Debug, Default)]
pub struct ArtifactStore {
    paths: ArtifactPaths,
    validate_labels: bool,
}

impl ArtifactStore {
    /// Create a store over `paths`.
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            validate_labels: false,
        }
    }

    /// Fail the load when a classifier label has no catalog entry.
    pub fn validate_labels(mut self, validate_labels: bool) -> Self {
        self.validate_labels = validate_labels;
        self
    }

    /// The artifact locations.
    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Read and decode all three artifacts.
    pub fn load(&self) -> LoadResult<Artifacts> {
        let result = self.read_all().and_then(|(vectorizer, classifier, catalog)| {
            Artifacts::from_bytes(
                &self.paths,
                &vectorizer,
                &classifier,
                &catalog,
                self.validate_labels,
            )
        });
        if let Err(e) = &result {
            error!("Failed to load artifacts: {e}");
        }
        result
    }

    fn read_all(&self) -> LoadResult<(Vec<u8>, Vec<u8>, Vec<u8>)> {
        Ok((
            read_source(&self.paths.vectorizer)?,
            read_source(&self.paths.classifier)?,
            read_source(&self.paths.catalog)?,
        ))
    }
}

fn read_source(path: &Path) -> LoadResult<Vec<u8>> {
    fs::read(path).map_err(|e| LoadError::from_io(path.display().to_string(), e))
}
