//! Command line argument parsing for the Jarvis CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::ChatbotConfig;
use crate::error::Result;
use crate::store::ArtifactPaths;

/// Jarvis - an intent-classifying chatbot
#[derive(Parser, Debug, Clone)]
#[command(name = "jarvis")]
#[command(about = "Classify utterances into intents and reply from an intent catalog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct JarvisArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding model/ and dataset/; overrides the configured paths
    #[arg(short, long, value_name = "DIR", env = "JARVIS_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Seed for response selection
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl JarvisArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }

    /// Build the chatbot configuration from the config file and overrides.
    pub fn chatbot_config(&self) -> Result<ChatbotConfig> {
        let mut config = match &self.config {
            Some(path) => ChatbotConfig::from_file(path)?,
            None => ChatbotConfig::default(),
        };
        if let Some(dir) = &self.model_dir {
            config.artifacts = ArtifactPaths::in_dir(dir);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Chat interactively on stdin
    Chat(ChatArgs),

    /// Reply to a single utterance
    Ask(AskArgs),

    /// Summarize the loaded artifacts
    Inspect(InspectArgs),
}

impl Command {
    /// The subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Chat(_) => "chat",
            Command::Ask(_) => "ask",
            Command::Inspect(_) => "inspect",
        }
    }
}

/// Arguments for the interactive chat
#[derive(Parser, Debug, Clone)]
pub struct ChatArgs {
    /// Prompt shown before each utterance
    #[arg(long, default_value = "> ")]
    pub prompt: String,
}

/// Arguments for a single reply
#[derive(Parser, Debug, Clone)]
pub struct AskArgs {
    /// The utterance to reply to
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Also show the predicted intent and the ranked scores
    #[arg(short, long)]
    pub explain: bool,
}

/// Arguments for inspecting the artifacts
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Fail if a classifier label has no catalog entry
    #[arg(long)]
    pub strict: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
