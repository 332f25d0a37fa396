//! SQLite schema grammar.

use std::collections::{BTreeMap, HashMap};

use ormbridge_contracts::{
    Blueprint, ColumnDefinition, ColumnType, DefaultValue, ForeignCommand, Grammar, GrammarError,
    Index, IndexCommand, Result, Table, UpdateValue, View,
};
use serde_json::Value;
use tracing::warn;

use crate::wrap::Wrap;

/// Renders the SQL type of a column.
type TypeRenderer = fn(&SqliteGrammar, &ColumnDefinition) -> String;

/// Renders one column modifier (default, increment, nullability).
type Modifier = fn(&SqliteGrammar, &Blueprint, &ColumnDefinition) -> String;

/// Compiles blueprints into SQLite DDL.
///
/// The grammar holds only immutable configuration: the table prefix, the
/// serial types eligible for `autoincrement`, the type dispatch table and
/// the modifier chain. Compilation is pure and the grammar can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct SqliteGrammar {
    wrap: Wrap,
    serials: Vec<ColumnType>,
    types: HashMap<ColumnType, TypeRenderer>,
    modifiers: Vec<Modifier>,
}

impl SqliteGrammar {
    /// Creates a grammar that prefixes table names with `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let types: [(ColumnType, TypeRenderer); 26] = [
            (ColumnType::BigInteger, Self::type_integer),
            (ColumnType::Boolean, Self::type_boolean),
            (ColumnType::Char, Self::type_string),
            (ColumnType::Date, Self::type_date),
            (ColumnType::DateTime, Self::type_date_time),
            (ColumnType::DateTimeTz, Self::type_date_time),
            (ColumnType::Decimal, Self::type_decimal),
            (ColumnType::Double, Self::type_double),
            (ColumnType::Enum, Self::type_enum),
            (ColumnType::Float, Self::type_float),
            (ColumnType::Integer, Self::type_integer),
            (ColumnType::Json, Self::type_text),
            (ColumnType::Jsonb, Self::type_text),
            (ColumnType::LongText, Self::type_text),
            (ColumnType::MediumInteger, Self::type_integer),
            (ColumnType::MediumText, Self::type_text),
            (ColumnType::SmallInteger, Self::type_integer),
            (ColumnType::String, Self::type_string),
            (ColumnType::Text, Self::type_text),
            (ColumnType::Time, Self::type_time),
            (ColumnType::TimeTz, Self::type_time),
            (ColumnType::Timestamp, Self::type_date_time),
            (ColumnType::TimestampTz, Self::type_date_time),
            (ColumnType::TinyInteger, Self::type_integer),
            (ColumnType::TinyText, Self::type_text),
            (ColumnType::Uuid, Self::type_string),
        ];

        let modifiers: Vec<Modifier> = vec![
            Self::modify_default,
            Self::modify_increment,
            Self::modify_nullable,
        ];

        Self {
            wrap: Wrap::new(prefix),
            serials: vec![
                ColumnType::BigInteger,
                ColumnType::Integer,
                ColumnType::MediumInteger,
                ColumnType::SmallInteger,
                ColumnType::TinyInteger,
            ],
            types: types.into_iter().collect(),
            modifiers,
        }
    }

    /// Returns the identifier wrapper.
    #[must_use]
    pub const fn wrap(&self) -> &Wrap {
        &self.wrap
    }

    /// Returns the table prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.wrap.prefix()
    }

    /// Renders `<name> <type><modifiers>` for one column.
    #[must_use]
    pub fn column_definition(&self, blueprint: &Blueprint, column: &ColumnDefinition) -> String {
        let mut sql = format!("{} {}", self.wrap.column(&column.name), self.type_of(column));
        for modifier in &self.modifiers {
            sql.push_str(&modifier(self, blueprint, column));
        }
        sql
    }

    /// Renders the SQL type of a column. Unknown tags are emitted verbatim.
    #[must_use]
    pub fn type_of(&self, column: &ColumnDefinition) -> String {
        self.types
            .get(&column.ty)
            .map_or_else(|| column.ty.as_str().to_string(), |render| render(self, column))
    }

    fn foreign_key_clause(&self, foreign: &ForeignCommand) -> String {
        let mut sql = format!(
            ", foreign key({}) references {}({})",
            self.wrap.columnize(&foreign.columns),
            self.wrap.table(&foreign.on),
            self.wrap.columnize(&foreign.references)
        );
        if let Some(action) = foreign.on_delete {
            sql.push_str(" on delete ");
            sql.push_str(action.as_sql());
        }
        if let Some(action) = foreign.on_update {
            sql.push_str(" on update ");
            sql.push_str(action.as_sql());
        }
        sql
    }

    fn primary_key_clause(&self, blueprint: &Blueprint) -> String {
        blueprint.primary_key().map_or_else(String::new, |primary| {
            format!(", primary key ({})", self.wrap.columnize(&primary.columns))
        })
    }

    fn create_index_sql(&self, blueprint: &Blueprint, command: &IndexCommand, unique: bool) -> String {
        format!(
            "create {}index {} on {} ({})",
            if unique { "unique " } else { "" },
            self.wrap.column(&command.index),
            self.wrap.table(&blueprint.table),
            self.wrap.columnize(&command.columns)
        )
    }

    fn drop_index_sql(&self, index: &str) -> String {
        format!("drop index {}", self.wrap.column(index))
    }

    fn pragma(key: &str, value: &str) -> String {
        format!("pragma {key} = {value}")
    }

    /// Renders the arguments of a table-valued pragma function for
    /// `table`. As in [`Wrap::table`], only the table segment is prefixed;
    /// a schema goes in the trailing schema argument.
    fn pragma_table(&self, table: &str) -> Result<String> {
        if table.is_empty() {
            return Err(GrammarError::EmptyTable);
        }
        Ok(match table.rsplit_once('.') {
            Some((schema, name)) => format!(
                "{}, {}",
                self.wrap.value(&format!("{}{name}", self.prefix())),
                self.wrap.value(schema)
            ),
            None => self.wrap.value(&format!("{}{table}", self.prefix())),
        })
    }
}

// Renderers share the dispatch table signature, so most ignore `self`.
#[allow(clippy::unused_self)]
impl SqliteGrammar {
    fn modify_default(&self, _blueprint: &Blueprint, column: &ColumnDefinition) -> String {
        let current = (column.use_current && column.ty.is_timestamp())
            .then(|| DefaultValue::Expression("CURRENT_TIMESTAMP".to_string()));
        column
            .default
            .as_ref()
            .or(current.as_ref())
            .map_or_else(String::new, |default| format!(" default {}", default.to_sql()))
    }

    fn modify_increment(&self, _blueprint: &Blueprint, column: &ColumnDefinition) -> String {
        if column.auto_increment && self.serials.contains(&column.ty) {
            " primary key autoincrement".to_string()
        } else {
            String::new()
        }
    }

    fn modify_nullable(&self, _blueprint: &Blueprint, column: &ColumnDefinition) -> String {
        if column.nullable {
            " null".to_string()
        } else {
            " not null".to_string()
        }
    }

    fn type_boolean(&self, _column: &ColumnDefinition) -> String {
        "tinyint(1)".to_string()
    }

    fn type_date(&self, _column: &ColumnDefinition) -> String {
        "date".to_string()
    }

    fn type_date_time(&self, _column: &ColumnDefinition) -> String {
        "datetime".to_string()
    }

    fn type_decimal(&self, _column: &ColumnDefinition) -> String {
        "numeric".to_string()
    }

    fn type_double(&self, _column: &ColumnDefinition) -> String {
        "double".to_string()
    }

    fn type_enum(&self, column: &ColumnDefinition) -> String {
        format!(
            "varchar check ({} in ({}))",
            self.wrap.column(&column.name),
            self.wrap.quotes(&column.allowed).join(", ")
        )
    }

    fn type_float(&self, _column: &ColumnDefinition) -> String {
        "float".to_string()
    }

    fn type_integer(&self, _column: &ColumnDefinition) -> String {
        "integer".to_string()
    }

    fn type_string(&self, _column: &ColumnDefinition) -> String {
        "varchar".to_string()
    }

    fn type_text(&self, _column: &ColumnDefinition) -> String {
        "text".to_string()
    }

    fn type_time(&self, _column: &ColumnDefinition) -> String {
        "time".to_string()
    }
}

impl Default for SqliteGrammar {
    fn default() -> Self {
        Self::new("")
    }
}

impl Grammar for SqliteGrammar {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn compile_add(&self, blueprint: &Blueprint, column: &ColumnDefinition) -> Option<String> {
        Some(format!(
            "alter table {} add column {}",
            self.wrap.table(&blueprint.table),
            self.column_definition(blueprint, column)
        ))
    }

    fn compile_create(&self, blueprint: &Blueprint) -> Option<String> {
        let columns: Vec<String> = blueprint
            .columns
            .iter()
            .map(|column| self.column_definition(blueprint, column))
            .collect();
        let foreign_keys: String = blueprint
            .foreign_keys()
            .map(|foreign| self.foreign_key_clause(foreign))
            .collect();

        Some(format!(
            "create table {} ({}{}{})",
            self.wrap.table(&blueprint.table),
            columns.join(", "),
            foreign_keys,
            self.primary_key_clause(blueprint)
        ))
    }

    fn compile_drop(&self, blueprint: &Blueprint) -> Option<String> {
        Some(format!("drop table {}", self.wrap.table(&blueprint.table)))
    }

    fn compile_drop_if_exists(&self, blueprint: &Blueprint) -> Option<String> {
        Some(format!(
            "drop table if exists {}",
            self.wrap.table(&blueprint.table)
        ))
    }

    // One statement per column keeps older engines, which drop a single
    // column per ALTER TABLE, working.
    fn compile_drop_column(&self, blueprint: &Blueprint, columns: &[String]) -> Option<Vec<String>> {
        let table = self.wrap.table(&blueprint.table);
        Some(
            self.wrap
                .prefix_array("drop column", &self.wrap.columns(columns))
                .into_iter()
                .map(|clause| format!("alter table {table} {clause}"))
                .collect(),
        )
    }

    fn compile_drop_index(&self, _blueprint: &Blueprint, index: &str) -> Option<String> {
        Some(self.drop_index_sql(index))
    }

    fn compile_drop_unique(&self, _blueprint: &Blueprint, index: &str) -> Option<String> {
        Some(self.drop_index_sql(index))
    }

    fn compile_index(&self, blueprint: &Blueprint, command: &IndexCommand) -> Option<String> {
        Some(self.create_index_sql(blueprint, command, false))
    }

    fn compile_rename(&self, blueprint: &Blueprint, to: &str) -> Option<String> {
        Some(format!(
            "alter table {} rename to {}",
            self.wrap.table(&blueprint.table),
            self.wrap.table(to)
        ))
    }

    fn compile_rename_column(&self, blueprint: &Blueprint, from: &str, to: &str) -> Option<String> {
        Some(format!(
            "alter table {} rename column {} to {}",
            self.wrap.table(&blueprint.table),
            self.wrap.column(from),
            self.wrap.column(to)
        ))
    }

    // SQLite has no ALTER INDEX ... RENAME; the index is dropped and
    // recreated under the new name.
    fn compile_rename_index(
        &self,
        blueprint: &Blueprint,
        from: &str,
        to: &str,
        indexes: &[Index],
    ) -> Option<Vec<String>> {
        let Some(index) = indexes.iter().find(|index| index.name == from) else {
            warn!(table = %blueprint.table, index = %from, "Index does not exist, skipping rename");
            return None;
        };

        if index.primary {
            warn!(table = %blueprint.table, index = %from, "SQLite cannot alter primary keys, skipping rename");
            return None;
        }

        let renamed = IndexCommand {
            index: to.to_string(),
            columns: index.columns.clone(),
        };
        Some(vec![
            self.drop_index_sql(&index.name),
            self.create_index_sql(blueprint, &renamed, index.unique),
        ])
    }

    fn compile_unique(&self, blueprint: &Blueprint, command: &IndexCommand) -> Option<String> {
        Some(self.create_index_sql(blueprint, command, true))
    }

    fn compile_columns(&self, table: &str) -> Result<Option<String>> {
        Ok(Some(format!(
            "select name, type, not \"notnull\" as \"nullable\", dflt_value as \"default\", \
             pk as \"primary\", hidden as \"extra\" \
             from pragma_table_xinfo({}) order by cid asc",
            self.pragma_table(table)?
        )))
    }

    fn compile_indexes(&self, table: &str) -> Result<Option<String>> {
        let table = self.pragma_table(table)?;
        Ok(Some(format!(
            "select 'primary' as name, group_concat(col) as columns, 1 as \"unique\", 1 as \"primary\" \
             from (select name as col from pragma_table_info({table}) where pk > 0 order by pk, cid) group by name \
             union select name, group_concat(col) as columns, \"unique\", origin = 'pk' as \"primary\" \
             from (select il.*, ii.name as col from pragma_index_list({table}) il, pragma_index_info(il.name) ii \
             order by il.seq, ii.seqno) group by name, \"unique\", \"primary\""
        )))
    }

    fn compile_foreign_keys(&self, table: &str) -> Result<Option<String>> {
        Ok(Some(format!(
            "select group_concat(\"from\") as columns, \"table\" as foreign_table, \
             group_concat(\"to\") as foreign_columns, on_update, on_delete \
             from (select * from pragma_foreign_key_list({}) order by id desc, seq) \
             group by id, \"table\", on_update, on_delete",
            self.pragma_table(table)?
        )))
    }

    fn compile_tables(&self) -> Option<String> {
        Some(
            "select name from sqlite_master where type = 'table' and name not like 'sqlite_%' order by name"
                .to_string(),
        )
    }

    fn compile_views(&self) -> Option<String> {
        Some("select name, sql as definition from sqlite_master where type = 'view' order by name".to_string())
    }

    fn compile_version(&self) -> Option<String> {
        Some("select sqlite_version() as value".to_string())
    }

    // Catalog rows can only be deleted while writable_schema is on.
    fn compile_drop_all_tables(&self, _tables: &[Table]) -> Option<Vec<String>> {
        Some(vec![
            Self::pragma("writable_schema", "1"),
            "delete from sqlite_master where type in ('table', 'index', 'trigger')".to_string(),
            Self::pragma("writable_schema", "0"),
        ])
    }

    fn compile_drop_all_views(&self, _views: &[View]) -> Option<Vec<String>> {
        Some(vec![
            Self::pragma("writable_schema", "1"),
            "delete from sqlite_master where type in ('view')".to_string(),
            Self::pragma("writable_schema", "0"),
        ])
    }

    fn compile_enable_writable_schema(&self) -> Option<String> {
        Some(Self::pragma("writable_schema", "1"))
    }

    fn compile_disable_writable_schema(&self) -> Option<String> {
        Some(Self::pragma("writable_schema", "0"))
    }

    fn compile_rebuild(&self) -> Option<String> {
        Some("vacuum".to_string())
    }

    fn compile_random_order(&self) -> Option<String> {
        Some("RANDOM()".to_string())
    }

    fn compile_json_selector(&self, column: &str) -> Option<String> {
        Some(self.json_selector(column))
    }

    fn compile_json_contains(
        &self,
        column: &str,
        value: &Value,
        is_not: bool,
    ) -> Option<(String, Vec<Value>)> {
        self.json_contains(column, value, is_not)
    }

    fn compile_json_contains_key(&self, column: &str, is_not: bool) -> Option<String> {
        Some(self.json_contains_key(column, is_not))
    }

    fn compile_json_length(&self, column: &str) -> Option<String> {
        Some(self.json_length(column))
    }

    fn compile_json_columns_update(
        &self,
        values: &BTreeMap<String, Value>,
    ) -> Result<BTreeMap<String, UpdateValue>> {
        self.json_columns_update(values)
    }
}
