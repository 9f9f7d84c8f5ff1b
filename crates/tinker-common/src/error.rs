//! Error types for identity parsing.

use thiserror::Error;

/// Errors produced when parsing resource URNs and block URIs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrnError {
    /// Input was empty
    #[error("Empty resource name")]
    Empty,

    /// Module qualifier is missing (`resource` instead of `module:resource`)
    #[error("Missing module qualifier in '{0}'")]
    MissingModule(String),

    /// A segment was empty or the separators were malformed
    #[error("Malformed name '{0}'")]
    Malformed(String),
}

/// Result type alias for URN parsing.
pub type UrnResult<T> = Result<T, UrnError>;
