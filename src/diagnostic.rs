//! Reports for template constructs the analyzer could not interpret.
//!
//! Analysis is best-effort: an unrecognized construct narrows the inferred
//! field set instead of failing the pass. Every such case is recorded as a
//! [`Diagnostic`] so callers can surface likely author typos.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// `#await` with a word count other than 2, or a 4-word form without `then`
    MalformedAwait { token: String, arity: usize },

    /// `:then` with a word count other than 2
    MalformedThen { token: String, arity: usize },

    /// `/await` with no block open
    UnmatchedClose,

    /// A block still open at end of input
    UnclosedBlock { source: String },

    /// An iteration directive without a recognizable `<source> as <pattern>`
    MalformedEach { token: String },

    /// A destructuring element the pattern grammar does not cover
    UnsupportedPattern { element: String },

    /// A field path cut off at the configured depth limit
    DepthLimit { path: String, limit: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedAwait { token, arity } => write!(
                f,
                "ignored await directive with {} words (expected 2 or 4): {{{}}}",
                arity, token
            ),
            Diagnostic::MalformedThen { token, arity } => write!(
                f,
                "ignored then directive with {} words (expected 2): {{{}}}",
                arity, token
            ),
            Diagnostic::UnmatchedClose => write!(f, "ignored {{/await}} with no open block"),
            Diagnostic::UnclosedBlock { source } => {
                write!(f, "await block for {} is never closed", source)
            }
            Diagnostic::MalformedEach { token } => {
                write!(f, "could not read iteration directive: {{{}}}", token)
            }
            Diagnostic::UnsupportedPattern { element } => {
                write!(f, "ignored destructuring element: {}", element)
            }
            Diagnostic::DepthLimit { path, limit } => {
                write!(f, "truncated field path deeper than {} levels: {}", limit, path)
            }
        }
    }
}

/// Records a diagnostic and mirrors it to the log
pub(crate) fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    tracing::warn!(%diagnostic, "template construct ignored");
    diagnostics.push(diagnostic);
}
