//! Traits implemented by database drivers.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::blueprint::{Blueprint, Command, ForeignCommand, IndexCommand};
use crate::error::Result;
use crate::expression::UpdateValue;
use crate::introspect::{Column, DbColumn, DbForeignKey, DbIndex, ForeignKey, Index, Table, View};
use crate::schema::ColumnDefinition;

/// Dialect-specific compiler from blueprints to SQL.
///
/// Every compiler returns `None` when the dialect cannot express the
/// operation. `None` means "nothing to execute" and is never an error.
/// Operations most dialects lack default to `None`.
pub trait Grammar: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// `ALTER TABLE ... ADD COLUMN`.
    fn compile_add(&self, blueprint: &Blueprint, column: &ColumnDefinition) -> Option<String>;

    /// Changes the definition of an existing column.
    fn compile_change(&self, _blueprint: &Blueprint, _column: &ColumnDefinition) -> Option<Vec<String>> {
        None
    }

    /// `CREATE TABLE`, including inline foreign and primary keys.
    fn compile_create(&self, blueprint: &Blueprint) -> Option<String>;

    /// `DROP TABLE`.
    fn compile_drop(&self, blueprint: &Blueprint) -> Option<String>;

    /// `DROP TABLE IF EXISTS`.
    fn compile_drop_if_exists(&self, blueprint: &Blueprint) -> Option<String>;

    /// Drops columns, possibly one statement per column.
    fn compile_drop_column(&self, blueprint: &Blueprint, columns: &[String]) -> Option<Vec<String>>;

    /// Drops a foreign key constraint.
    fn compile_drop_foreign(&self, _blueprint: &Blueprint, _index: &str) -> Option<String> {
        None
    }

    /// `DROP INDEX`.
    fn compile_drop_index(&self, blueprint: &Blueprint, index: &str) -> Option<String>;

    /// Drops the primary key constraint.
    fn compile_drop_primary(&self, _blueprint: &Blueprint, _index: &str) -> Option<String> {
        None
    }

    /// Drops a unique index.
    fn compile_drop_unique(&self, blueprint: &Blueprint, index: &str) -> Option<String>;

    /// Adds a foreign key to an existing table.
    fn compile_foreign(&self, _blueprint: &Blueprint, _command: &ForeignCommand) -> Option<String> {
        None
    }

    /// `CREATE INDEX`.
    fn compile_index(&self, blueprint: &Blueprint, command: &IndexCommand) -> Option<String>;

    /// Adds a primary key to an existing table.
    fn compile_primary(&self, _blueprint: &Blueprint, _command: &IndexCommand) -> Option<String> {
        None
    }

    /// Renames the table.
    fn compile_rename(&self, blueprint: &Blueprint, to: &str) -> Option<String>;

    /// Renames a column.
    fn compile_rename_column(&self, blueprint: &Blueprint, from: &str, to: &str) -> Option<String>;

    /// Renames an index, given the table's current indexes.
    fn compile_rename_index(
        &self,
        blueprint: &Blueprint,
        from: &str,
        to: &str,
        indexes: &[Index],
    ) -> Option<Vec<String>>;

    /// `CREATE UNIQUE INDEX`.
    fn compile_unique(&self, blueprint: &Blueprint, command: &IndexCommand) -> Option<String>;

    /// Query listing the columns of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::EmptyTable`](crate::GrammarError::EmptyTable)
    /// when `table` is empty.
    fn compile_columns(&self, table: &str) -> Result<Option<String>>;

    /// Query listing the indexes of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::EmptyTable`](crate::GrammarError::EmptyTable)
    /// when `table` is empty.
    fn compile_indexes(&self, table: &str) -> Result<Option<String>>;

    /// Query listing the foreign keys of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::EmptyTable`](crate::GrammarError::EmptyTable)
    /// when `table` is empty.
    fn compile_foreign_keys(&self, table: &str) -> Result<Option<String>>;

    /// Query listing user tables.
    fn compile_tables(&self) -> Option<String>;

    /// Query listing views.
    fn compile_views(&self) -> Option<String>;

    /// Query returning the engine version as `value`.
    fn compile_version(&self) -> Option<String>;

    /// Statements dropping every table.
    fn compile_drop_all_tables(&self, tables: &[Table]) -> Option<Vec<String>>;

    /// Statements dropping every view.
    fn compile_drop_all_views(&self, views: &[View]) -> Option<Vec<String>>;

    /// Allows direct writes to the schema catalog.
    fn compile_enable_writable_schema(&self) -> Option<String> {
        None
    }

    /// Forbids direct writes to the schema catalog.
    fn compile_disable_writable_schema(&self) -> Option<String> {
        None
    }

    /// Rebuilds the database file after bulk drops.
    fn compile_rebuild(&self) -> Option<String> {
        None
    }

    /// `ORDER BY` expression for random ordering.
    fn compile_random_order(&self) -> Option<String> {
        None
    }

    /// Locking clause for `SELECT ... FOR UPDATE`.
    fn compile_lock_for_update(&self) -> Option<String> {
        None
    }

    /// Locking clause for shared row locks.
    fn compile_shared_lock(&self) -> Option<String> {
        None
    }

    /// Expression extracting `column->path`.
    fn compile_json_selector(&self, column: &str) -> Option<String>;

    /// Predicate testing that the JSON array at `column->path` contains
    /// `value` (every element when `value` is an array), with its bindings.
    fn compile_json_contains(
        &self,
        column: &str,
        value: &Value,
        is_not: bool,
    ) -> Option<(String, Vec<Value>)>;

    /// Predicate testing that `column->path` exists.
    fn compile_json_contains_key(&self, column: &str, is_not: bool) -> Option<String>;

    /// Expression for the length of the JSON array at `column->path`.
    fn compile_json_length(&self, column: &str) -> Option<String>;

    /// Rewrites `column->path` assignment keys of an UPDATE.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::Json`](crate::GrammarError::Json) when a
    /// structured value cannot be marshalled.
    fn compile_json_columns_update(
        &self,
        values: &BTreeMap<String, Value>,
    ) -> Result<BTreeMap<String, UpdateValue>>;

    /// Compiles one command of `blueprint`.
    ///
    /// `indexes` are the table's current indexes; only `renameIndex` reads
    /// them. Primary and foreign keys of a table being created are part of
    /// its `CREATE TABLE` and compile to nothing here.
    fn compile_command(
        &self,
        blueprint: &Blueprint,
        command: &Command,
        indexes: &[Index],
    ) -> Option<Vec<String>> {
        match command {
            Command::Add { column } => self.compile_add(blueprint, column).map(|s| vec![s]),
            Command::Change { column } => self.compile_change(blueprint, column),
            Command::Create => self.compile_create(blueprint).map(|s| vec![s]),
            Command::Primary(_) | Command::Foreign(_) if blueprint.creating() => None,
            Command::Primary(primary) => self.compile_primary(blueprint, primary).map(|s| vec![s]),
            Command::Foreign(foreign) => self.compile_foreign(blueprint, foreign).map(|s| vec![s]),
            Command::Unique(unique) => self.compile_unique(blueprint, unique).map(|s| vec![s]),
            Command::Index(index) => self.compile_index(blueprint, index).map(|s| vec![s]),
            Command::Drop => self.compile_drop(blueprint).map(|s| vec![s]),
            Command::DropIfExists => self.compile_drop_if_exists(blueprint).map(|s| vec![s]),
            Command::DropColumn { columns } => self.compile_drop_column(blueprint, columns),
            Command::DropForeign { index } => {
                self.compile_drop_foreign(blueprint, index).map(|s| vec![s])
            }
            Command::DropIndex { index } => self.compile_drop_index(blueprint, index).map(|s| vec![s]),
            Command::DropPrimary { index } => {
                self.compile_drop_primary(blueprint, index).map(|s| vec![s])
            }
            Command::DropUnique { index } => {
                self.compile_drop_unique(blueprint, index).map(|s| vec![s])
            }
            Command::Rename { to } => self.compile_rename(blueprint, to).map(|s| vec![s]),
            Command::RenameColumn { from, to } => {
                self.compile_rename_column(blueprint, from, to).map(|s| vec![s])
            }
            Command::RenameIndex { from, to } => {
                self.compile_rename_index(blueprint, from, to, indexes)
            }
        }
    }

    /// Compiles a blueprint step by step, in execution order.
    ///
    /// Columns of a blueprint that does not create its table are added first,
    /// one step each, then every command follows in order. A step the
    /// dialect cannot express carries `None`.
    fn compile_steps<'a>(
        &self,
        blueprint: &'a Blueprint,
        indexes: &[Index],
    ) -> Vec<(Step<'a>, Option<Vec<String>>)> {
        let added: &[ColumnDefinition] = if blueprint.creating() {
            &[]
        } else {
            &blueprint.columns
        };
        let columns = added.iter().map(|column| {
            let sql = self.compile_add(blueprint, column).map(|s| vec![s]);
            (Step::AddColumn(column), sql)
        });
        let commands = blueprint.commands.iter().map(|command| {
            let sql = self.compile_command(blueprint, command, indexes);
            (Step::Command(command), sql)
        });
        columns.chain(commands).collect()
    }

    /// Compiles a whole blueprint into executable statements, leaving out
    /// the steps the dialect cannot express.
    fn compile_blueprint(&self, blueprint: &Blueprint, indexes: &[Index]) -> Vec<String> {
        self.compile_steps(blueprint, indexes)
            .into_iter()
            .filter_map(|(_, sql)| sql)
            .flatten()
            .collect()
    }
}

/// One unit of work in a blueprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step<'a> {
    /// A column added to an existing table.
    AddColumn(&'a ColumnDefinition),
    /// A blueprint command.
    Command(&'a Command),
}

/// Normalises raw introspection rows.
pub trait Processor: Send + Sync {
    /// Normalises column rows.
    fn process_columns(&self, columns: &[DbColumn]) -> Vec<Column>;

    /// Normalises index rows.
    fn process_indexes(&self, indexes: &[DbIndex]) -> Vec<Index>;

    /// Normalises foreign key rows.
    fn process_foreign_keys(&self, foreign_keys: &[DbForeignKey]) -> Vec<ForeignKey>;
}
