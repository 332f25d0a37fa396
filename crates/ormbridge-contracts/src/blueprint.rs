//! Table blueprints and the commands they carry.

use serde::{Deserialize, Serialize};

use crate::schema::{ColumnDefinition, ForeignKeyAction};

/// Index-shaped payload shared by `primary`, `unique` and `index` commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCommand {
    /// Index name. Primary keys may leave it empty.
    #[serde(default)]
    pub index: String,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
}

impl IndexCommand {
    /// Creates an index payload.
    #[must_use]
    pub fn new<I, S>(index: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index: index.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Payload of a `foreign` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignCommand {
    /// Constraint name. SQLite ignores it.
    #[serde(default)]
    pub index: String,
    /// Referencing columns.
    pub columns: Vec<String>,
    /// Referenced table, unprefixed.
    pub on: String,
    /// Referenced columns.
    pub references: Vec<String>,
    /// Action on delete of the referenced row.
    #[serde(default)]
    pub on_delete: Option<ForeignKeyAction>,
    /// Action on update of the referenced row.
    #[serde(default)]
    pub on_update: Option<ForeignKeyAction>,
}

impl ForeignCommand {
    /// Creates a foreign key from `columns` to `on(references)`.
    #[must_use]
    pub fn new<I, S, J, T>(columns: I, on: impl Into<String>, references: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            index: String::new(),
            columns: columns.into_iter().map(Into::into).collect(),
            on: on.into(),
            references: references.into_iter().map(Into::into).collect(),
            on_delete: None,
            on_update: None,
        }
    }

    /// Sets the `on delete` action.
    #[must_use]
    pub fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    /// Sets the `on update` action.
    #[must_use]
    pub fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.on_update = Some(action);
        self
    }
}

/// A single schema operation inside a blueprint, keyed by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum Command {
    /// Add a column to an existing table.
    Add {
        /// Column to add.
        column: ColumnDefinition,
    },
    /// Change an existing column.
    Change {
        /// New column definition.
        column: ColumnDefinition,
    },
    /// Create the table.
    Create,
    /// Declare the primary key.
    Primary(IndexCommand),
    /// Declare a foreign key.
    Foreign(ForeignCommand),
    /// Create a unique index.
    Unique(IndexCommand),
    /// Create a plain index.
    Index(IndexCommand),
    /// Drop the table.
    Drop,
    /// Drop the table when it exists.
    DropIfExists,
    /// Drop columns.
    DropColumn {
        /// Columns to drop, in order.
        columns: Vec<String>,
    },
    /// Drop a foreign key.
    DropForeign {
        /// Constraint name.
        index: String,
    },
    /// Drop an index.
    DropIndex {
        /// Index name.
        index: String,
    },
    /// Drop the primary key.
    DropPrimary {
        /// Constraint name.
        #[serde(default)]
        index: String,
    },
    /// Drop a unique index.
    DropUnique {
        /// Index name.
        index: String,
    },
    /// Rename the table.
    Rename {
        /// New table name, unprefixed.
        to: String,
    },
    /// Rename a column.
    RenameColumn {
        /// Current column name.
        from: String,
        /// New column name.
        to: String,
    },
    /// Rename an index.
    RenameIndex {
        /// Current index name.
        from: String,
        /// New index name.
        to: String,
    },
}

impl Command {
    /// Returns the command tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Change { .. } => "change",
            Self::Create => "create",
            Self::Primary(_) => "primary",
            Self::Foreign(_) => "foreign",
            Self::Unique(_) => "unique",
            Self::Index(_) => "index",
            Self::Drop => "drop",
            Self::DropIfExists => "dropIfExists",
            Self::DropColumn { .. } => "dropColumn",
            Self::DropForeign { .. } => "dropForeign",
            Self::DropIndex { .. } => "dropIndex",
            Self::DropPrimary { .. } => "dropPrimary",
            Self::DropUnique { .. } => "dropUnique",
            Self::Rename { .. } => "rename",
            Self::RenameColumn { .. } => "renameColumn",
            Self::RenameIndex { .. } => "renameIndex",
        }
    }

    /// Returns true for commands rendered inside `CREATE TABLE`.
    #[must_use]
    pub const fn is_table_constraint(&self) -> bool {
        matches!(self, Self::Primary(_) | Self::Foreign(_))
    }
}

/// Description of one table's desired schema changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Blueprint {
    /// Table name, unprefixed.
    pub table: String,
    /// Columns added by this blueprint.
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
    /// Commands, in execution order.
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Blueprint {
    /// Creates an empty blueprint for `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Returns the unprefixed table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Returns true when the blueprint creates its table.
    #[must_use]
    pub fn creating(&self) -> bool {
        self.commands.iter().any(|c| matches!(c, Command::Create))
    }

    /// Returns every `foreign` command, in declaration order.
    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignCommand> {
        self.commands.iter().filter_map(|c| match c {
            Command::Foreign(foreign) => Some(foreign),
            _ => None,
        })
    }

    /// Returns the first `primary` command.
    #[must_use]
    pub fn primary_key(&self) -> Option<&IndexCommand> {
        self.commands.iter().find_map(|c| match c {
            Command::Primary(primary) => Some(primary),
            _ => None,
        })
    }

    /// Adds a `create` command.
    #[must_use]
    pub fn create(self) -> Self {
        self.command(Command::Create)
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends a command.
    #[must_use]
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Declares the primary key.
    #[must_use]
    pub fn primary<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command(Command::Primary(IndexCommand::new("", columns)))
    }

    /// Declares a foreign key.
    #[must_use]
    pub fn foreign(self, foreign: ForeignCommand) -> Self {
        self.command(Command::Foreign(foreign))
    }

    /// Declares a plain index.
    #[must_use]
    pub fn index<I, S>(self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command(Command::Index(IndexCommand::new(name, columns)))
    }

    /// Declares a unique index.
    #[must_use]
    pub fn unique<I, S>(self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command(Command::Unique(IndexCommand::new(name, columns)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    #[test]
    fn test_creating() {
        assert!(!Blueprint::new("users").creating());
        assert!(Blueprint::new("users").create().creating());
    }

    #[test]
    fn test_constraint_lookup() {
        let blueprint = Blueprint::new("users")
            .create()
            .foreign(ForeignCommand::new(["role_id"], "roles", ["id"]))
            .primary(["id"])
            .foreign(ForeignCommand::new(["team_id"], "teams", ["id"]));

        let tables: Vec<&str> = blueprint.foreign_keys().map(|f| f.on.as_str()).collect();
        assert_eq!(tables, vec!["roles", "teams"]);
        assert_eq!(blueprint.primary_key().unwrap().columns, vec!["id"]);
    }

    #[test]
    fn test_command_tagged_by_name() {
        let json = r#"[
            {"name": "create"},
            {"name": "dropColumn", "columns": ["id", "name"]},
            {"name": "renameIndex", "from": "a", "to": "b"},
            {"name": "foreign", "columns": ["role_id"], "on": "roles", "references": ["id"], "on_delete": "cascade"},
            {"name": "add", "column": {"name": "age", "type": "tinyInteger"}}
        ]"#;
        let commands: Vec<Command> = serde_json::from_str(json).unwrap();

        assert_eq!(commands[0], Command::Create);
        assert_eq!(
            commands[1],
            Command::DropColumn {
                columns: vec!["id".into(), "name".into()]
            }
        );
        assert_eq!(commands[2].name(), "renameIndex");
        match &commands[3] {
            Command::Foreign(foreign) => {
                assert_eq!(foreign.on_delete, Some(ForeignKeyAction::Cascade));
                assert_eq!(foreign.on_update, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
        match &commands[4] {
            Command::Add { column } => assert_eq!(column.ty, ColumnType::TinyInteger),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_table_constraints() {
        assert!(Command::Primary(IndexCommand::new("", ["id"])).is_table_constraint());
        assert!(!Command::Index(IndexCommand::new("i", ["id"])).is_table_constraint());
    }
}
