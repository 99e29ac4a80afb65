//! Merge extra field paths into a query document

use super::CliError;
use crate::merge::merge_query_text;

/// Options for the merge command
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Query document text
    pub query: Option<String>,
    /// Dotted field paths, e.g. `address.city`
    pub fields: Vec<String>,
}

/// Execute a merge operation, returning the printed document
pub fn execute_merge(options: &MergeOptions) -> Result<String, CliError> {
    let query = options.query.as_ref().ok_or(CliError::NoInput)?;
    tracing::debug!(fields = ?options.fields, "merging fields");
    Ok(merge_query_text(query, &options.fields)?)
}
