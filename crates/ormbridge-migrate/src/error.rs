//! Error types for applying and inspecting schemas.

use ormbridge_contracts::GrammarError;

/// Errors that can occur while applying blueprints or introspecting a database.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Database error while executing or introspecting.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The grammar refused to build a query.
    #[error("Grammar error: {0}")]
    Grammar(#[from] GrammarError),

    /// IO error (reading blueprint files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Introspection found no such table.
    #[error("Table not found: {0}")]
    TableNotFound(String),
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
