//! Apply schema blueprints to SQLite and read the schema back.
//!
//! `ormbridge-migrate` runs the statements a [`Grammar`] compiles from a
//! [`Blueprint`] against an `sqlx` SQLite pool, and turns the grammar's
//! introspection queries into normalised records through a [`Processor`].
//!
//! [`Grammar`]: ormbridge_contracts::Grammar
//! [`Blueprint`]: ormbridge_contracts::Blueprint
//! [`Processor`]: ormbridge_contracts::Processor
//!
//! # Example
//!
//! ```rust,ignore
//! use ormbridge_migrate::prelude::*;
//!
//! let pool = SqlitePoolOptions::new().connect("sqlite::memory:").await?;
//! let executor = SchemaExecutor::new(pool, SqliteGrammar::new(""), SqliteProcessor);
//!
//! executor
//!     .apply(
//!         &Blueprint::new("users")
//!             .create()
//!             .column(ColumnDefinition::new("id", ColumnType::Integer).auto_increment())
//!             .column(ColumnDefinition::new("email", ColumnType::String))
//!             .unique("users_email_unique", ["email"]),
//!     )
//!     .await?;
//!
//! for index in executor.indexes("users").await? {
//!     println!("{} {:?}", index.name, index.columns);
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the SQL a blueprint file compiles to
//! ormbridge-migrate sql blueprints/users.json
//!
//! # Apply it
//! ormbridge-migrate apply blueprints/users.json
//!
//! # Inspect the database
//! ormbridge-migrate tables
//! ormbridge-migrate columns users
//! ormbridge-migrate indexes users
//!
//! # Drop every table and view
//! ormbridge-migrate wipe
//! ```

pub mod error;
pub mod executor;
pub mod loader;

pub use error::{MigrateError, Result};
pub use executor::SchemaExecutor;
pub use loader::{load_blueprints, parse_blueprints};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{MigrateError, Result};
    pub use crate::executor::SchemaExecutor;
    pub use crate::loader::{load_blueprints, parse_blueprints};
    pub use ormbridge_contracts::{
        Blueprint, ColumnDefinition, ColumnType, Command, DefaultValue, ForeignCommand,
        ForeignKeyAction, Grammar, IndexCommand, Processor,
    };
    pub use ormbridge_sqlite::{SqliteGrammar, SqliteProcessor};
    pub use sqlx::sqlite::SqlitePoolOptions;
}
