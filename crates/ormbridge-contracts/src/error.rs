//! Error types for grammars.

/// Errors a grammar can report.
///
/// Unsupported DDL is not an error: compilers return `None` instead.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// A structured value could not be marshalled to JSON.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// An introspection query was requested without a table name.
    #[error("Table name must not be empty")]
    EmptyTable,
}

/// Result type for grammar operations.
pub type Result<T> = std::result::Result<T, GrammarError>;
