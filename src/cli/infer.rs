//! Infer field selections from template text

use super::{CliError, analysis_to_json};
use crate::{Analyzer, AnalyzerOptions};

/// Options for the infer command
#[derive(Debug, Clone, Default)]
pub struct InferOptions {
    /// Template text
    pub input: Option<String>,
    /// Emit field trees instead of rendered selection bodies
    pub tree: bool,
    /// Pretty-print the output
    pub pretty: bool,
    /// Analyzer settings
    pub analyzer: AnalyzerOptions,
}

/// Result of an infer operation
#[derive(Debug)]
pub struct InferOutput {
    /// `{ "fields": ..., "diagnostics": ... }`
    pub json: serde_json::Value,
    /// Number of diagnostics raised
    pub diagnostics: usize,
}

/// Execute an infer operation
pub fn execute_infer(options: &InferOptions) -> Result<InferOutput, CliError> {
    let text = options.input.as_ref().ok_or(CliError::NoInput)?;

    let analysis = Analyzer::with_options(options.analyzer.clone()).analyze(text);
    tracing::info!(
        blocks = analysis.fields.len(),
        diagnostics = analysis.diagnostics.len(),
        "analysis finished"
    );

    Ok(InferOutput {
        json: analysis_to_json(&analysis, !options.tree),
        diagnostics: analysis.diagnostics.len(),
    })
}
