//! # ormbridge-contracts
//!
//! The seam between a schema-migration engine and database drivers.
//!
//! The migration engine describes each table change as a [`Blueprint`]: the
//! columns it adds and a list of [`Command`]s (create, drop, rename, index,
//! foreign key, ...). A driver supplies a [`Grammar`] that turns blueprints
//! into literal SQL and a [`Processor`] that normalises the rows returned by
//! the grammar's introspection queries.
//!
//! ## Example
//!
//! ```rust
//! use ormbridge_contracts::{Blueprint, ColumnDefinition, ColumnType, ForeignCommand};
//!
//! let blueprint = Blueprint::new("posts")
//!     .create()
//!     .column(ColumnDefinition::new("id", ColumnType::Integer).auto_increment())
//!     .column(ColumnDefinition::new("user_id", ColumnType::Integer))
//!     .foreign(ForeignCommand::new(["user_id"], "users", ["id"]));
//!
//! assert!(blueprint.creating());
//! assert_eq!(blueprint.foreign_keys().count(), 1);
//! ```

mod blueprint;
mod error;
mod expression;
mod grammar;
mod introspect;
mod schema;

pub use blueprint::{Blueprint, Command, ForeignCommand, IndexCommand};
pub use error::{GrammarError, Result};
pub use expression::{Expression, UpdateValue};
pub use grammar::{Grammar, Processor, Step};
pub use introspect::{Column, DbColumn, DbForeignKey, DbIndex, ForeignKey, Index, Table, View};
pub use schema::{ColumnDefinition, ColumnType, DefaultValue, ForeignKeyAction};
