//! CLI support for await-fields
//!
//! Provides programmatic access to the CLI commands so build tooling can run
//! them without spawning the binary.

mod convert;
mod infer;
mod merge;

pub use convert::{analysis_to_json, tree_to_json};
pub use infer::{InferOptions, InferOutput, execute_infer};
pub use merge::{MergeOptions, execute_merge};

use std::io;

use crate::merge::MergeError;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Query document could not be merged into
    Merge(MergeError),
    /// JSON serialization error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Merge(e) => write!(f, "Merge error: {}", e),
            CliError::Json(e) => write!(f, "JSON error: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => {
                write!(f, "No input provided. Pass a file, use --input, or pipe text to stdin.")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Merge(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::NoInput => None,
        }
    }
}

impl From<MergeError> for CliError {
    fn from(e: MergeError) -> Self {
        CliError::Merge(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
