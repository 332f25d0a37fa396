//! JSON path expressions over the SQLite JSON1 functions.

use std::collections::BTreeMap;

use ormbridge_contracts::{Expression, Result, UpdateValue};
use serde_json::Value;

use crate::grammar::SqliteGrammar;
use crate::wrap::JSON_ARROW;

/// Values stored as JSON text and re-parsed with `json(?)`.
const fn is_structured(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_) | Value::Bool(_))
}

/// Returns the placeholder and binding for `value`.
fn bind(value: &Value) -> Result<(&'static str, Value)> {
    if is_structured(value) {
        Ok(("json(?)", Value::String(serde_json::to_string(value)?)))
    } else {
        Ok(("?", value.clone()))
    }
}

impl SqliteGrammar {
    /// Like [`Wrap::json_field_and_path`](crate::Wrap::json_field_and_path),
    /// but targets the document root when the column has no path.
    fn json_target(&self, column: &str) -> (String, String) {
        let (field, path) = self.wrap().json_field_and_path(column);
        if path.is_empty() {
            (field, ", '$'".to_string())
        } else {
            (field, path)
        }
    }

    /// `json_extract(col, path)` for `col->path`.
    #[must_use]
    pub fn json_selector(&self, column: &str) -> String {
        let (field, path) = self.json_target(column);
        format!("json_extract({field}{path})")
    }

    /// Containment predicate for `col->path`, one `exists` clause per value.
    ///
    /// Returns `None` for an empty array: there is nothing to test.
    #[must_use]
    pub fn json_contains(
        &self,
        column: &str,
        value: &Value,
        is_not: bool,
    ) -> Option<(String, Vec<Value>)> {
        let (field, path) = self.json_target(column);
        let clause = format!(
            "{}exists (select 1 from json_each(json_extract({field}{path})) where value = ?)",
            self.wrap().not(is_not)
        );

        match value {
            Value::Array(values) if values.is_empty() => None,
            Value::Array(values) => Some((vec![clause; values.len()].join(" AND "), values.clone())),
            other => Some((clause, vec![other.clone()])),
        }
    }

    /// Key existence predicate for `col->path`.
    #[must_use]
    pub fn json_contains_key(&self, column: &str, is_not: bool) -> String {
        let (field, path) = self.wrap().json_field_and_path(column);
        format!("{}json_type({field}{path}) is not null", self.wrap().not(is_not))
    }

    /// `json_array_length(col, path)` for `col->path`.
    #[must_use]
    pub fn json_length(&self, column: &str) -> String {
        let (field, path) = self.wrap().json_field_and_path(column);
        format!("json_array_length({field}{path})")
    }

    /// Folds `col->path` assignments into `json_set` chains, one per column.
    ///
    /// Keys are visited in order, so a plain `col` assignment sorts before
    /// its `col->path` siblings and becomes the base document they patch.
    /// Keys without a path pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::Json`](ormbridge_contracts::GrammarError::Json)
    /// when a structured value cannot be marshalled.
    pub fn json_columns_update(
        &self,
        values: &BTreeMap<String, Value>,
    ) -> Result<BTreeMap<String, UpdateValue>> {
        let mut compiled: BTreeMap<String, UpdateValue> = BTreeMap::new();

        for (key, value) in values {
            let Some((column, path)) = key.split_once(JSON_ARROW) else {
                compiled.insert(key.clone(), UpdateValue::Value(value.clone()));
                continue;
            };

            let (base_sql, mut bindings) = match compiled.remove(column) {
                Some(UpdateValue::Expression(expression)) => (expression.sql, expression.bindings),
                Some(UpdateValue::Value(previous)) => {
                    let (placeholder, bound) = bind(&previous)?;
                    (placeholder.to_string(), vec![bound])
                }
                None => (self.wrap().column(column), Vec::new()),
            };

            let (placeholder, bound) = bind(value)?;
            bindings.push(Value::String(self.wrap().json_path(path)));
            bindings.push(bound);

            compiled.insert(
                column.to_string(),
                UpdateValue::Expression(Expression::new(
                    format!("json_set({base_sql}, ?, {placeholder})"),
                    bindings,
                )),
            );
        }

        Ok(compiled)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn grammar() -> SqliteGrammar {
        SqliteGrammar::new("goravel_")
    }

    #[test]
    fn test_json_selector() {
        assert_eq!(
            grammar().json_selector("data->details->subdetails[0]"),
            "json_extract(`data`, '$.\"details\".\"subdetails\"[0]')"
        );
        assert_eq!(grammar().json_selector("data"), "json_extract(`data`, '$')");
    }

    #[test]
    fn test_json_contains() {
        let (sql, bindings) = grammar()
            .json_contains("data->details->subdetails[0]", &json!(["value1", "value2"]), false)
            .unwrap();

        let clause = "exists (select 1 from json_each(json_extract(`data`, '$.\"details\".\"subdetails\"[0]')) where value = ?)";
        assert_eq!(sql, format!("{clause} AND {clause}"));
        assert_eq!(bindings, vec![json!("value1"), json!("value2")]);
    }

    #[test]
    fn test_json_contains_single_value() {
        let (sql, bindings) = grammar()
            .json_contains("data->tags", &json!("rust"), true)
            .unwrap();

        assert_eq!(
            sql,
            "not exists (select 1 from json_each(json_extract(`data`, '$.\"tags\"')) where value = ?)"
        );
        assert_eq!(bindings, vec![json!("rust")]);
    }

    #[test]
    fn test_json_contains_empty_array() {
        assert_eq!(grammar().json_contains("data->tags", &json!([]), false), None);
    }

    #[test]
    fn test_json_contains_key() {
        assert_eq!(
            grammar().json_contains_key("data->details", false),
            "json_type(`data`, '$.\"details\"') is not null"
        );
        assert_eq!(
            grammar().json_contains_key("data->details", true),
            "not json_type(`data`, '$.\"details\"') is not null"
        );
    }

    #[test]
    fn test_json_length() {
        assert_eq!(
            grammar().json_length("data->items"),
            "json_array_length(`data`, '$.\"items\"')"
        );
        assert_eq!(grammar().json_length("data"), "json_array_length(`data`)");
    }

    #[test]
    fn test_json_columns_update() {
        let values = BTreeMap::from([
            ("data->details->name".to_string(), json!("goravel")),
            ("data->details->tags".to_string(), json!(["a", "b"])),
            ("name".to_string(), json!("plain")),
        ]);

        let compiled = grammar().json_columns_update(&values).unwrap();

        assert_eq!(compiled["name"], UpdateValue::Value(json!("plain")));
        assert_eq!(
            compiled["data"],
            UpdateValue::Expression(Expression::new(
                "json_set(json_set(`data`, ?, ?), ?, json(?))",
                vec![
                    json!("$.\"details\".\"name\""),
                    json!("goravel"),
                    json!("$.\"details\".\"tags\""),
                    json!("[\"a\",\"b\"]"),
                ],
            ))
        );
    }

    #[test]
    fn test_json_columns_update_patches_plain_value() {
        let values = BTreeMap::from([
            ("data".to_string(), json!({"active": false})),
            ("data->active".to_string(), json!(true)),
        ]);

        let compiled = grammar().json_columns_update(&values).unwrap();

        assert_eq!(compiled.len(), 1);
        assert_eq!(
            compiled["data"],
            UpdateValue::Expression(Expression::new(
                "json_set(json(?), ?, json(?))",
                vec![
                    json!("{\"active\":false}"),
                    json!("$.\"active\""),
                    json!("true"),
                ],
            ))
        );
    }
}
