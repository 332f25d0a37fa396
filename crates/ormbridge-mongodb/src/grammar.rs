use std::collections::BTreeMap;

use ormbridge_contracts::{
    Blueprint, ColumnDefinition, Grammar, Index, IndexCommand, Result, Table, UpdateValue, View,
};
use serde_json::Value;

/// Grammar for document stores.
///
/// Collections are created on first insert and have no declared columns,
/// so every schema compiler yields nothing to execute. JSON column updates
/// are handed back unchanged because documents are patched natively.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoGrammar;

impl MongoGrammar {
    /// Creates a grammar.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Grammar for MongoGrammar {
    fn name(&self) -> &'static str {
        "mongodb"
    }

    fn compile_add(&self, _blueprint: &Blueprint, _column: &ColumnDefinition) -> Option<String> {
        None
    }

    fn compile_create(&self, _blueprint: &Blueprint) -> Option<String> {
        None
    }

    fn compile_drop(&self, _blueprint: &Blueprint) -> Option<String> {
        None
    }

    fn compile_drop_if_exists(&self, _blueprint: &Blueprint) -> Option<String> {
        None
    }

    fn compile_drop_column(&self, _blueprint: &Blueprint, _columns: &[String]) -> Option<Vec<String>> {
        None
    }

    fn compile_drop_index(&self, _blueprint: &Blueprint, _index: &str) -> Option<String> {
        None
    }

    fn compile_drop_unique(&self, _blueprint: &Blueprint, _index: &str) -> Option<String> {
        None
    }

    fn compile_index(&self, _blueprint: &Blueprint, _command: &IndexCommand) -> Option<String> {
        None
    }

    fn compile_rename(&self, _blueprint: &Blueprint, _to: &str) -> Option<String> {
        None
    }

    fn compile_rename_column(&self, _blueprint: &Blueprint, _from: &str, _to: &str) -> Option<String> {
        None
    }

    fn compile_rename_index(
        &self,
        _blueprint: &Blueprint,
        _from: &str,
        _to: &str,
        _indexes: &[Index],
    ) -> Option<Vec<String>> {
        None
    }

    fn compile_unique(&self, _blueprint: &Blueprint, _command: &IndexCommand) -> Option<String> {
        None
    }

    fn compile_columns(&self, _table: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn compile_indexes(&self, _table: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn compile_foreign_keys(&self, _table: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn compile_tables(&self) -> Option<String> {
        None
    }

    fn compile_views(&self) -> Option<String> {
        None
    }

    fn compile_version(&self) -> Option<String> {
        None
    }

    fn compile_drop_all_tables(&self, _tables: &[Table]) -> Option<Vec<String>> {
        None
    }

    fn compile_drop_all_views(&self, _views: &[View]) -> Option<Vec<String>> {
        None
    }

    fn compile_json_selector(&self, _column: &str) -> Option<String> {
        None
    }

    fn compile_json_contains(
        &self,
        _column: &str,
        _value: &Value,
        _is_not: bool,
    ) -> Option<(String, Vec<Value>)> {
        None
    }

    fn compile_json_contains_key(&self, _column: &str, _is_not: bool) -> Option<String> {
        None
    }

    fn compile_json_length(&self, _column: &str) -> Option<String> {
        None
    }

    fn compile_json_columns_update(
        &self,
        values: &BTreeMap<String, Value>,
    ) -> Result<BTreeMap<String, UpdateValue>> {
        Ok(values
            .iter()
            .map(|(key, value)| (key.clone(), UpdateValue::Value(value.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use ormbridge_contracts::{ColumnType, ForeignCommand};
    use serde_json::json;

    use super::*;

    fn users() -> Blueprint {
        Blueprint::new("users")
    }

    #[test]
    fn test_schema_compilers_yield_nothing() {
        let grammar = MongoGrammar::new();
        let column = ColumnDefinition::new("name", ColumnType::String);
        let command = IndexCommand::new("users", ["role_id", "permission_id"]);

        assert_eq!(grammar.compile_add(&users(), &column), None);
        assert_eq!(grammar.compile_create(&users()), None);
        assert_eq!(grammar.compile_drop_if_exists(&users()), None);
        assert_eq!(
            grammar.compile_drop_column(&users(), &["id".to_string(), "name".to_string()]),
            None
        );
        assert_eq!(grammar.compile_index(&users(), &command), None);
        assert_eq!(
            grammar.compile_foreign(&users(), &ForeignCommand::new(["role_id"], "roles", ["id"])),
            None
        );
        assert_eq!(grammar.compile_rename_column(&users(), "before", "after"), None);
        assert_eq!(grammar.compile_rename_index(&users(), "users", "admins", &[]), None);
    }

    #[test]
    fn test_blueprint_compiles_to_no_statements() {
        let blueprint = users()
            .create()
            .column(ColumnDefinition::new("id", ColumnType::Integer).auto_increment())
            .index("users_id_index", ["id"]);

        assert!(MongoGrammar.compile_blueprint(&blueprint, &[]).is_empty());
    }

    #[test]
    fn test_introspection_yields_nothing() {
        assert_eq!(MongoGrammar.compile_columns("users").unwrap(), None);
        assert_eq!(MongoGrammar.compile_indexes("users").unwrap(), None);
        assert_eq!(MongoGrammar.compile_tables(), None);
        assert_eq!(MongoGrammar.compile_version(), None);
    }

    #[test]
    fn test_json_compilers_yield_nothing() {
        assert_eq!(
            MongoGrammar.compile_json_contains("data->details", &json!("value1"), false),
            None
        );
        assert_eq!(MongoGrammar.compile_json_contains_key("data->details", false), None);
        assert_eq!(MongoGrammar.compile_json_length("data->details"), None);
    }

    #[test]
    fn test_json_columns_update_passes_values_through() {
        let values = BTreeMap::from([("data".to_string(), json!({"name": "test"}))]);

        let compiled = MongoGrammar.compile_json_columns_update(&values).unwrap();

        assert_eq!(compiled["data"], UpdateValue::Value(json!({"name": "test"})));
    }
}
