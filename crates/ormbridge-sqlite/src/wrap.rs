//! Identifier and literal quoting.

use std::sync::LazyLock;

use regex::Regex;

/// Trailing array subscripts of a JSON path segment, e.g. `items[0][1]`.
static ARRAY_SUBSCRIPTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<key>.*?)(?P<subscripts>(?:\[[^\]]*\])+)$").expect("valid subscript regex")
});

/// Separator between a JSON column and its path.
pub const JSON_ARROW: &str = "->";

fn push_key(path: &mut String, key: &str) {
    path.push_str(".\"");
    path.push_str(key);
    path.push('"');
}

/// Quotes identifiers and literals for SQLite, applying the table prefix.
#[derive(Debug, Clone, Default)]
pub struct Wrap {
    prefix: String,
}

impl Wrap {
    /// Creates a wrapper that prefixes table names with `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns the table prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Quotes an identifier with backticks.
    ///
    /// Dots split the identifier into separately quoted segments. A literal
    /// backtick is doubled. Segments that already arrive backtick-quoted are
    /// kept as they are, so quoting is stable on its own output.
    #[must_use]
    pub fn quote(&self, identifier: &str) -> String {
        if identifier.is_empty() {
            return "``".to_string();
        }

        let mut out = String::with_capacity(identifier.len() + 2);
        let mut under_quoted = false;
        let mut self_quoted = false;
        let mut backticks: i32 = 0;
        let mut shift: i32 = 0;

        for ch in identifier.chars() {
            match ch {
                '`' => {
                    backticks += 1;
                    if backticks == 2 {
                        out.push_str("``");
                        backticks = 0;
                    }
                }
                '.' => {
                    if backticks > 0 || !self_quoted {
                        shift = 0;
                        under_quoted = false;
                        backticks = 0;
                        out.push('`');
                    }
                    out.push('.');
                    continue;
                }
                _ => {
                    if shift - backticks <= 0 && !under_quoted {
                        out.push('`');
                        under_quoted = true;
                        self_quoted = backticks > 0;
                        if self_quoted {
                            backticks -= 1;
                        }
                    }
                    while backticks > 0 {
                        out.push_str("``");
                        backticks -= 1;
                    }
                    out.push(ch);
                }
            }
            shift += 1;
        }

        if backticks > 0 && !self_quoted {
            out.push_str("``");
        }
        out.push('`');
        out
    }

    /// Quotes a column name.
    #[must_use]
    pub fn column(&self, column: &str) -> String {
        self.quote(column)
    }

    /// Quotes each column name.
    #[must_use]
    pub fn columns(&self, columns: &[String]) -> Vec<String> {
        columns.iter().map(|c| self.column(c)).collect()
    }

    /// Quotes column names and joins them with `, `.
    #[must_use]
    pub fn columnize(&self, columns: &[String]) -> String {
        self.columns(columns).join(", ")
    }

    /// Prefixes and quotes a table name. In `schema.table` only the table
    /// segment is prefixed.
    #[must_use]
    pub fn table(&self, table: &str) -> String {
        match table.rsplit_once('.') {
            Some((schema, name)) => self.quote(&format!("{schema}.{}{name}", self.prefix)),
            None => self.quote(&format!("{}{table}", self.prefix)),
        }
    }

    /// Renders a single-quoted string literal.
    #[must_use]
    pub fn value(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Renders each value as a string literal.
    #[must_use]
    pub fn quotes(&self, values: &[String]) -> Vec<String> {
        values.iter().map(|v| self.value(v)).collect()
    }

    /// Prepends `prefix ` to every value.
    #[must_use]
    pub fn prefix_array(&self, prefix: &str, values: &[String]) -> Vec<String> {
        values.iter().map(|v| format!("{prefix} {v}")).collect()
    }

    /// Returns `not ` when `is_not` is set.
    #[must_use]
    pub const fn not(&self, is_not: bool) -> &'static str {
        if is_not {
            "not "
        } else {
            ""
        }
    }

    /// Converts `a->b[0]->c` into the JSON path `$."a"."b"[0]."c"`.
    ///
    /// Array subscripts stay unquoted; a segment made only of subscripts
    /// indexes the preceding value.
    #[must_use]
    pub fn json_path(&self, path: &str) -> String {
        let mut out = String::from("$");
        for segment in path.split(JSON_ARROW) {
            match ARRAY_SUBSCRIPTS.captures(segment) {
                Some(caps) => {
                    let key = &caps["key"];
                    if !key.is_empty() {
                        push_key(&mut out, key);
                    }
                    out.push_str(&caps["subscripts"]);
                }
                None => push_key(&mut out, segment),
            }
        }
        out
    }

    /// Splits `column->path` into the quoted column and a `, '<json path>'`
    /// argument suffix. The suffix is empty when there is no path.
    #[must_use]
    pub fn json_field_and_path(&self, column: &str) -> (String, String) {
        match column.split_once(JSON_ARROW) {
            Some((field, path)) => (
                self.column(field),
                format!(", {}", self.value(&self.json_path(path))),
            ),
            None => (self.column(column), String::new()),
        }
    }
}
