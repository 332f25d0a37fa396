//! Raw SQL fragments with their bindings.

use serde_json::Value;

/// A raw SQL fragment and the values bound to its `?` placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// SQL text with `?` placeholders.
    pub sql: String,
    /// Values bound to the placeholders.
    pub bindings: Vec<Value>,
}

impl Expression {
    /// Creates an expression.
    #[must_use]
    pub fn new(sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            bindings,
        }
    }
}

/// Right-hand side of a column assignment in an UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateValue {
    /// Plain value, bound as-is.
    Value(Value),
    /// Raw SQL, e.g. a `json_set(...)` chain.
    Expression(Expression),
}

impl From<Value> for UpdateValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}
