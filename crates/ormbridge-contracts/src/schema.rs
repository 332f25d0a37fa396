//! Column descriptions.
//!
//! These types describe the columns a blueprint adds to a table. They are
//! built by the migration engine and handed read-only to a grammar.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical column type tags understood by the grammars.
///
/// Tags are spelled in camelCase on the wire (`bigInteger`, `timestampTz`).
/// Any tag that is not recognised is kept as [`ColumnType::Custom`] and
/// rendered verbatim by SQL grammars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    /// 64-bit integer.
    BigInteger,
    /// Boolean flag.
    Boolean,
    /// Fixed-length character string.
    Char,
    /// Date only.
    Date,
    /// Date and time.
    DateTime,
    /// Date and time with time zone.
    DateTimeTz,
    /// Exact decimal.
    Decimal,
    /// Double precision float.
    Double,
    /// String restricted to an allowed list.
    Enum,
    /// Single precision float.
    Float,
    /// 32-bit integer.
    Integer,
    /// JSON document.
    Json,
    /// Binary JSON document.
    Jsonb,
    /// Long text.
    LongText,
    /// 24-bit integer.
    MediumInteger,
    /// Medium text.
    MediumText,
    /// 16-bit integer.
    SmallInteger,
    /// Variable-length string.
    String,
    /// Text.
    Text,
    /// Time only.
    Time,
    /// Time with time zone.
    TimeTz,
    /// Timestamp.
    Timestamp,
    /// Timestamp with time zone.
    TimestampTz,
    /// 8-bit integer.
    TinyInteger,
    /// Tiny text.
    TinyText,
    /// UUID.
    Uuid,
    /// Any other tag, passed through untouched.
    Custom(String),
}

impl ColumnType {
    /// Returns the camelCase tag of this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::BigInteger => "bigInteger",
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::DateTimeTz => "dateTimeTz",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Enum => "enum",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Json => "json",
            Self::Jsonb => "jsonb",
            Self::LongText => "longText",
            Self::MediumInteger => "mediumInteger",
            Self::MediumText => "mediumText",
            Self::SmallInteger => "smallInteger",
            Self::String => "string",
            Self::Text => "text",
            Self::Time => "time",
            Self::TimeTz => "timeTz",
            Self::Timestamp => "timestamp",
            Self::TimestampTz => "timestampTz",
            Self::TinyInteger => "tinyInteger",
            Self::TinyText => "tinyText",
            Self::Uuid => "uuid",
            Self::Custom(tag) => tag,
        }
    }

    /// Returns true for the timestamp family.
    #[must_use]
    pub fn is_timestamp(&self) -> bool {
        matches!(self, Self::Timestamp | Self::TimestampTz)
    }
}

impl From<&str> for ColumnType {
    fn from(tag: &str) -> Self {
        match tag {
            "bigInteger" => Self::BigInteger,
            "boolean" => Self::Boolean,
            "char" => Self::Char,
            "date" => Self::Date,
            "dateTime" => Self::DateTime,
            "dateTimeTz" => Self::DateTimeTz,
            "decimal" => Self::Decimal,
            "double" => Self::Double,
            "enum" => Self::Enum,
            "float" => Self::Float,
            "integer" => Self::Integer,
            "json" => Self::Json,
            "jsonb" => Self::Jsonb,
            "longText" => Self::LongText,
            "mediumInteger" => Self::MediumInteger,
            "mediumText" => Self::MediumText,
            "smallInteger" => Self::SmallInteger,
            "string" => Self::String,
            "text" => Self::Text,
            "time" => Self::Time,
            "timeTz" => Self::TimeTz,
            "timestamp" => Self::Timestamp,
            "timestampTz" => Self::TimestampTz,
            "tinyInteger" => Self::TinyInteger,
            "tinyText" => Self::TinyText,
            "uuid" => Self::Uuid,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for ColumnType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<ColumnType> for String {
    fn from(ty: ColumnType) -> Self {
        match ty {
            ColumnType::Custom(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    /// Boolean default, stored as `'1'` / `'0'`.
    Bool(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default.
    String(String),
    /// Raw SQL expression (e.g. `CURRENT_TIMESTAMP`), emitted verbatim.
    Expression(String),
}

impl DefaultValue {
    /// Returns the SQL representation of this default value.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Bool(b) => String::from(if *b { "'1'" } else { "'0'" }),
            Self::Integer(i) => format!("'{i}'"),
            Self::Float(f) => format!("'{f}'"),
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

/// Referential action for `on delete` / `on update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyAction {
    /// Propagate the change.
    Cascade,
    /// Reject the change immediately.
    Restrict,
    /// Set referencing columns to NULL.
    SetNull,
    /// Set referencing columns to their default.
    SetDefault,
    /// Reject the change at statement end.
    NoAction,
}

impl ForeignKeyAction {
    /// Returns the SQL keyword(s) for this action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "cascade",
            Self::Restrict => "restrict",
            Self::SetNull => "set null",
            Self::SetDefault => "set default",
            Self::NoAction => "no action",
        }
    }
}

/// A column added by a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Logical type tag.
    #[serde(rename = "type")]
    pub ty: ColumnType,
    /// Whether the column accepts NULL.
    #[serde(default)]
    pub nullable: bool,
    /// Default value.
    #[serde(default)]
    pub default: Option<DefaultValue>,
    /// Whether the column auto-increments.
    #[serde(default)]
    pub auto_increment: bool,
    /// Allowed values for enum columns.
    #[serde(default)]
    pub allowed: Vec<String>,
    /// Timestamp columns default to `CURRENT_TIMESTAMP` when set.
    #[serde(default)]
    pub use_current: bool,
}

impl ColumnDefinition {
    /// Creates a non-nullable column with no default.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<ColumnType>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            nullable: false,
            default: None,
            auto_increment: false,
            allowed: Vec::new(),
            use_current: false,
        }
    }

    /// Marks the column nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Marks the column auto-incrementing.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Sets the allowed values of an enum column.
    #[must_use]
    pub fn allowed<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = values.into_iter().map(Into::into).collect();
        self
    }

    /// Defaults a timestamp column to the current time.
    #[must_use]
    pub fn use_current(mut self) -> Self {
        self.use_current = true;
        self
    }
}
