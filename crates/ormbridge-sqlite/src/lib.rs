//! # ormbridge-sqlite
//!
//! SQLite grammar and introspection processor for `ormbridge-contracts`.
//!
//! # How SQLite differs from other dialects
//!
//! - **Limited [ALTER TABLE]**: only `RENAME TO`, `RENAME COLUMN`,
//!   `ADD COLUMN` and `DROP COLUMN` (since 3.35.0). Changing a column,
//!   adding or dropping a primary or foreign key on an existing table
//!   compile to nothing.
//! - **Constraints live in `CREATE TABLE`**: foreign and primary keys of
//!   a new table are rendered inline after the column list.
//! - **No index renaming**: an index is renamed by dropping and
//!   recreating it, which needs the table's current indexes.
//! - **[AUTOINCREMENT]**: only on a serial column, rendered as
//!   `primary key autoincrement`.
//! - **Introspection** goes through the table-valued [pragma functions].
//! - **Identifier quoting** uses backticks, which SQLite accepts
//!   alongside double quotes.
//!
//! [ALTER TABLE]: https://www.sqlite.org/lang_altertable.html
//! [AUTOINCREMENT]: https://www.sqlite.org/autoinc.html
//! [pragma functions]: https://www.sqlite.org/pragma.html#pragfunc
//!
//! ## Example
//!
//! ```rust
//! use ormbridge_contracts::{Blueprint, ColumnDefinition, ColumnType, Grammar};
//! use ormbridge_sqlite::SqliteGrammar;
//!
//! let grammar = SqliteGrammar::new("app_");
//! let blueprint = Blueprint::new("users")
//!     .create()
//!     .column(ColumnDefinition::new("id", ColumnType::Integer).auto_increment())
//!     .column(ColumnDefinition::new("email", ColumnType::String));
//!
//! assert_eq!(
//!     grammar.compile_blueprint(&blueprint, &[]),
//!     vec!["create table `app_users` (`id` integer primary key autoincrement not null, `email` varchar not null)"]
//! );
//! ```

mod grammar;
mod json;
mod processor;
mod wrap;

pub use grammar::SqliteGrammar;
pub use processor::SqliteProcessor;
pub use wrap::Wrap;
