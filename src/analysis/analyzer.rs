//! Analyzers combine a tokenizer with a chain of filters.
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → ... → Filter N → Token Stream
//! ```
//!
//! # Examples
//!
//! ```
//! use jarvis::analysis::analyzer::{Analyzer, StandardAnalyzer};
//!
//! let analyzer = StandardAnalyzer::new().unwrap();
//! let tokens: Vec<_> = analyzer.analyze("Hello World").unwrap().collect();
//!
//! assert_eq!(tokens[0].text, "hello");
//! assert_eq!(tokens[1].text, "world");
//! ```

mod pipeline;
mod standard;

pub use pipeline::PipelineAnalyzer;
pub use standard::StandardAnalyzer;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{LowercaseFilter, StopFilter};
use crate::analysis::tokenizer::RegexTokenizer;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// Requires `Send + Sync` because one analyzer instance is shared by every
/// caller of the vectorizer that owns it.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Serializable description of an analyzer.
///
/// Persisted inside vectorizer artifacts so that the exact analysis used at
/// fit time is rebuilt when the artifact is loaded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalyzerConfig {
    /// [`StandardAnalyzer`] with English stop words.
    Standard,
    /// [`StandardAnalyzer`] without stop word removal.
    #[default]
    StandardNoStop,
    /// Regex tokenizer with optional lowercasing and a custom stop list.
    Custom {
        pattern: String,
        lowercase: bool,
        stop_words: Vec<String>,
    },
}

impl AnalyzerConfig {
    /// Build the analyzer this configuration describes.
    pub fn build(&self) -> Result<Arc<dyn Analyzer>> {
        let analyzer: Arc<dyn Analyzer> = match self {
            AnalyzerConfig::Standard => Arc::new(StandardAnalyzer::new()?),
            AnalyzerConfig::StandardNoStop => Arc::new(StandardAnalyzer::without_stop_words()?),
            AnalyzerConfig::Custom {
                pattern,
                lowercase,
                stop_words,
            } => {
                let tokenizer = Arc::new(RegexTokenizer::with_pattern(pattern)?);
                let mut pipeline = PipelineAnalyzer::new(tokenizer).with_name("custom");
                if *lowercase {
                    pipeline = pipeline.add_filter(Arc::new(LowercaseFilter::new()));
                }
                if !stop_words.is_empty() {
                    pipeline = pipeline
                        .add_filter(Arc::new(StopFilter::from_words(stop_words.iter().cloned())));
                }
                Arc::new(pipeline)
            }
        };

        Ok(analyzer)
    }
}
