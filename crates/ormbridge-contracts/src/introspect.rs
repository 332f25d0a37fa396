//! Records describing what already exists in a database.
//!
//! `Db*` types are raw rows as returned by a grammar's introspection
//! queries; a [`Processor`](crate::Processor) turns them into the
//! normalised [`Column`], [`Index`] and [`ForeignKey`] records.

use serde::{Deserialize, Serialize};

/// Raw row of a column introspection query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DbColumn {
    /// Column name.
    pub name: String,
    /// Declared type, as written in the DDL.
    #[serde(rename = "type")]
    pub ty: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Default expression, if any.
    pub default: Option<String>,
    /// Whether the column belongs to the primary key.
    pub primary: bool,
    /// Engine specific extra information (hidden/generated flag in SQLite).
    pub extra: Option<String>,
}

/// Raw row of an index introspection query. `columns` is comma-joined.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DbIndex {
    /// Index name.
    pub name: String,
    /// Comma-joined column list.
    pub columns: String,
    /// Whether the index is unique.
    pub unique: bool,
    /// Whether the index backs the primary key.
    pub primary: bool,
}

/// Raw row of a foreign key introspection query. Column lists are comma-joined.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DbForeignKey {
    /// Constraint name. SQLite reports none.
    pub name: String,
    /// Comma-joined referencing columns.
    pub columns: String,
    /// Referenced schema.
    pub foreign_schema: String,
    /// Referenced table.
    pub foreign_table: String,
    /// Comma-joined referenced columns.
    pub foreign_columns: String,
    /// `on update` action as reported by the engine.
    pub on_update: String,
    /// `on delete` action as reported by the engine.
    pub on_delete: String,
}

/// A column of an existing table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Full lowercase type, e.g. `varchar(255)`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Type name without arguments, e.g. `varchar`.
    pub type_name: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Default expression, if any.
    pub default: Option<String>,
    /// Whether the column is an auto-incrementing key.
    pub autoincrement: bool,
}

/// An index of an existing table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
    /// Whether the index is unique.
    pub unique: bool,
    /// Whether the index backs the primary key.
    pub primary: bool,
}

/// A foreign key of an existing table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Referencing columns.
    pub columns: Vec<String>,
    /// Referenced schema.
    pub foreign_schema: String,
    /// Referenced table.
    pub foreign_table: String,
    /// Referenced columns.
    pub foreign_columns: Vec<String>,
    /// Lowercase `on update` action.
    pub on_update: String,
    /// Lowercase `on delete` action.
    pub on_delete: String,
}

/// A table listed by a tables query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,
}

/// A view listed by a views query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct View {
    /// View name.
    pub name: String,
    /// `CREATE VIEW` statement.
    pub definition: String,
}
