//! Output formatting for CLI commands.

use serde::Serialize;

use crate::chatbot::ReplyOutcome;
use crate::cli::args::{JarvisArgs, OutputFormat};
use crate::error::Result;
use crate::ml::classifier::IntentScore;
use crate::store::{ArtifactPaths, Artifacts};

/// Result structure for a single reply.
#[derive(Debug, Serialize)]
pub struct AskResult {
    pub reply: String,
    pub outcome: ReplyOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<IntentScore>>,
}

/// Summary of the loaded artifacts.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub vectorizer: String,
    pub vectorizer_path: String,
    pub n_features: usize,
    pub classifier: String,
    pub classifier_path: String,
    pub labels: Vec<String>,
    pub catalog_path: String,
    pub catalog_intents: usize,
    pub unknown_labels: Vec<String>,
    pub unused_tags: Vec<String>,
}

impl InspectReport {
    pub fn from_artifacts(paths: &ArtifactPaths, artifacts: &Artifacts) -> Self {
        Self {
            vectorizer: artifacts.vectorizer().name().to_string(),
            vectorizer_path: paths.vectorizer.display().to_string(),
            n_features: artifacts.vectorizer().n_features(),
            classifier: artifacts.classifier().name().to_string(),
            classifier_path: paths.classifier.display().to_string(),
            labels: artifacts.classifier().labels().to_vec(),
            catalog_path: paths.catalog.display().to_string(),
            catalog_intents: artifacts.catalog().len(),
            unknown_labels: artifacts.unknown_labels(),
            unused_tags: artifacts.unused_tags(),
        }
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &JarvisArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &JarvisArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    print!("{}", format_human(&value));
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &JarvisArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Render a JSON value as indented `key: value` lines.
pub fn format_human(value: &serde_json::Value) -> String {
    let mut out = String::new();
    write_human(value, 0, &mut out);
    out
}

fn write_human(value: &serde_json::Value, indent: usize, out: &mut String) {
    let spaces = "  ".repeat(indent);

    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                match val {
                    serde_json::Value::Object(_) => {
                        out.push_str(&format!("{spaces}{key}:\n"));
                        write_human(val, indent + 1, out);
                    }
                    serde_json::Value::Array(items) if items.iter().any(|i| i.is_object()) => {
                        out.push_str(&format!("{spaces}{key}:\n"));
                        for item in items {
                            let formatted_item = format_value(item);
                            out.push_str(&format!("{spaces}  - {formatted_item}\n"));
                        }
                    }
                    _ => {
                        let formatted_val = format_value(val);
                        out.push_str(&format!("{spaces}{key}: {formatted_val}\n"));
                    }
                }
            }
        }
        _ => {
            let formatted_value = format_value(value);
            out.push_str(&format!("{spaces}{formatted_value}\n"));
        }
    }
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) if !n.is_i64() && !n.is_u64() => format!("{f:.4}"),
            _ => n.to_string(),
        },
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(obj) => obj
            .iter()
            .map(|(key, val)| format!("{key}={}", format_value(val)))
            .collect::<Vec<_>>()
            .join(", "),
        serde_json::Value::Null => "null".to_string(),
    }
}
