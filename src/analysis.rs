//! Text analysis used by the vectorizer.
//!
//! Raw utterances are split into tokens by a [`Tokenizer`], normalized by a
//! chain of [`Filter`]s and exposed through the [`Analyzer`] trait. The
//! [`AnalyzerConfig`] enum describes an analyzer in a serializable form so it
//! can travel inside a persisted vectorizer artifact.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::*;
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
