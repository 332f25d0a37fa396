//! Schema executor.
//!
//! This module applies blueprints to a SQLite database through a
//! [`Grammar`] and reads the resulting schema back through a [`Processor`].

use ormbridge_contracts::{
    Blueprint, Column, Command, DbColumn, DbForeignKey, DbIndex, ForeignKey, Grammar, Index,
    Processor, Step, Table, View,
};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::{debug, info, warn};

use crate::error::{MigrateError, Result};

/// Decodes an integer flag column.
fn flag(row: &SqliteRow, column: &str) -> Result<bool> {
    Ok(row.try_get::<i64, _>(column)? != 0)
}

/// Applies blueprints and introspects a SQLite database.
pub struct SchemaExecutor<G: Grammar, P: Processor> {
    pool: SqlitePool,
    grammar: G,
    processor: P,
    dry_run: bool,
}

impl<G: Grammar, P: Processor> SchemaExecutor<G, P> {
    /// Creates a new schema executor.
    pub fn new(pool: SqlitePool, grammar: G, processor: P) -> Self {
        Self {
            pool,
            grammar,
            processor,
            dry_run: false,
        }
    }

    /// Enables dry-run mode (SQL is printed but not executed).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Returns the grammar.
    #[must_use]
    pub const fn grammar(&self) -> &G {
        &self.grammar
    }

    /// Returns the processor.
    #[must_use]
    pub const fn processor(&self) -> &P {
        &self.processor
    }

    /// Returns the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Compiles a blueprint into the statements [`apply`](Self::apply) runs.
    ///
    /// The table's current indexes are read only when the blueprint renames
    /// an index. Operations the grammar cannot express are logged and left
    /// out.
    pub async fn sql_for(&self, blueprint: &Blueprint) -> Result<Vec<String>> {
        let renames_index = blueprint
            .commands
            .iter()
            .any(|command| matches!(command, Command::RenameIndex { .. }));
        let indexes = if renames_index {
            self.indexes(&blueprint.table).await?
        } else {
            Vec::new()
        };

        let creating = blueprint.creating();
        let mut statements = Vec::new();

        for (step, sql) in self.grammar.compile_steps(blueprint, &indexes) {
            match (step, sql) {
                (_, Some(sql)) => statements.extend(sql),
                (Step::AddColumn(column), None) => warn!(
                    grammar = self.grammar.name(),
                    table = %blueprint.table,
                    column = %column.name,
                    "Adding columns is unsupported, skipping"
                ),
                // Rendered inside CREATE TABLE.
                (Step::Command(command), None) if creating && command.is_table_constraint() => {}
                (Step::Command(command), None) => warn!(
                    grammar = self.grammar.name(),
                    table = %blueprint.table,
                    command = command.name(),
                    "Unsupported command, skipping"
                ),
            }
        }

        Ok(statements)
    }

    /// Applies a single blueprint and returns the statements it ran.
    pub async fn apply(&self, blueprint: &Blueprint) -> Result<Vec<String>> {
        info!(table = %blueprint.table, "Applying blueprint");

        let statements = self.sql_for(blueprint).await?;
        self.execute(&statements).await?;

        info!(
            table = %blueprint.table,
            statements = statements.len(),
            "Blueprint applied successfully"
        );

        Ok(statements)
    }

    /// Applies multiple blueprints in order.
    pub async fn apply_all(&self, blueprints: &[Blueprint]) -> Result<()> {
        for blueprint in blueprints {
            self.apply(blueprint).await?;
        }
        Ok(())
    }

    // Statements share one connection: writable_schema is per connection.
    async fn execute(&self, statements: &[String]) -> Result<()> {
        if self.dry_run {
            for sql in statements {
                println!("{sql};");
            }
            return Ok(());
        }

        let mut conn = self.pool.acquire().await?;
        for sql in statements {
            debug!(sql = %sql, "Executing SQL");
            sqlx::query(sql).execute(&mut *conn).await?;
        }
        Ok(())
    }

    /// Lists user tables.
    pub async fn tables(&self) -> Result<Vec<Table>> {
        let Some(sql) = self.grammar.compile_tables() else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| -> Result<Table> {
                Ok(Table {
                    name: row.try_get("name")?,
                })
            })
            .collect()
    }

    /// Lists views with their definitions.
    pub async fn views(&self) -> Result<Vec<View>> {
        let Some(sql) = self.grammar.compile_views() else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| -> Result<View> {
                Ok(View {
                    name: row.try_get("name")?,
                    definition: row.try_get("definition")?,
                })
            })
            .collect()
    }

    /// Returns the columns of `table`.
    ///
    /// Fails with [`MigrateError::TableNotFound`] when the grammar can
    /// introspect columns but the table has none.
    pub async fn columns(&self, table: &str) -> Result<Vec<Column>> {
        let Some(sql) = self.grammar.compile_columns(table)? else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        if rows.is_empty() {
            return Err(MigrateError::TableNotFound(table.to_string()));
        }

        let columns = rows
            .iter()
            .map(|row| -> Result<DbColumn> {
                let hidden: i64 = row.try_get("extra")?;
                Ok(DbColumn {
                    name: row.try_get("name")?,
                    ty: row.try_get("type")?,
                    nullable: flag(row, "nullable")?,
                    default: row.try_get("default")?,
                    primary: flag(row, "primary")?,
                    extra: (hidden != 0).then(|| hidden.to_string()),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self.processor.process_columns(&columns))
    }

    /// Returns the indexes of `table`, including its primary key.
    pub async fn indexes(&self, table: &str) -> Result<Vec<Index>> {
        let Some(sql) = self.grammar.compile_indexes(table)? else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let indexes = rows
            .iter()
            .map(|row| -> Result<DbIndex> {
                Ok(DbIndex {
                    name: row.try_get("name")?,
                    columns: row.try_get::<Option<String>, _>("columns")?.unwrap_or_default(),
                    unique: flag(row, "unique")?,
                    primary: flag(row, "primary")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self.processor.process_indexes(&indexes))
    }

    /// Returns the foreign keys declared on `table`.
    pub async fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
        let Some(sql) = self.grammar.compile_foreign_keys(table)? else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let foreign_keys = rows
            .iter()
            .map(|row| -> Result<DbForeignKey> {
                Ok(DbForeignKey {
                    columns: row.try_get("columns")?,
                    foreign_table: row.try_get("foreign_table")?,
                    foreign_columns: row.try_get("foreign_columns")?,
                    on_update: row.try_get("on_update")?,
                    on_delete: row.try_get("on_delete")?,
                    ..DbForeignKey::default()
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self.processor.process_foreign_keys(&foreign_keys))
    }

    /// Returns the engine version, when the grammar can query it.
    pub async fn version(&self) -> Result<Option<String>> {
        let Some(sql) = self.grammar.compile_version() else {
            return Ok(None);
        };

        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        Ok(Some(row.try_get("value")?))
    }

    /// Drops every table, then rebuilds the database file.
    pub async fn drop_all_tables(&self) -> Result<()> {
        let tables = self.tables().await?;
        let Some(statements) = self.grammar.compile_drop_all_tables(&tables) else {
            warn!(grammar = self.grammar.name(), "Dropping all tables is unsupported, skipping");
            return Ok(());
        };

        info!(tables = tables.len(), "Dropping all tables");
        self.execute(&statements).await?;
        self.rebuild().await
    }

    /// Drops every view, then rebuilds the database file.
    pub async fn drop_all_views(&self) -> Result<()> {
        let views = self.views().await?;
        let Some(statements) = self.grammar.compile_drop_all_views(&views) else {
            warn!(grammar = self.grammar.name(), "Dropping all views is unsupported, skipping");
            return Ok(());
        };

        info!(views = views.len(), "Dropping all views");
        self.execute(&statements).await?;
        self.rebuild().await
    }

    async fn rebuild(&self) -> Result<()> {
        match self.grammar.compile_rebuild() {
            Some(sql) => self.execute(&[sql]).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ormbridge_contracts::{ColumnDefinition, ColumnType, ForeignCommand, ForeignKeyAction};
    use ormbridge_mongodb::{MongoGrammar, MongoProcessor};
    use ormbridge_sqlite::{SqliteGrammar, SqliteProcessor};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory SQLite pool")
    }

    async fn create_executor() -> SchemaExecutor<SqliteGrammar, SqliteProcessor> {
        SchemaExecutor::new(
            create_test_pool().await,
            SqliteGrammar::new(""),
            SqliteProcessor::new(),
        )
    }

    fn create_users_blueprint() -> Blueprint {
        Blueprint::new("users")
            .create()
            .column(ColumnDefinition::new("id", ColumnType::Integer).auto_increment())
            .column(ColumnDefinition::new("name", ColumnType::String).nullable())
            .column(ColumnDefinition::new("bio", ColumnType::Text).nullable())
            .unique("users_name_unique", ["name"])
    }

    #[tokio::test]
    async fn test_apply_create_table() {
        let executor = create_executor().await;

        let statements = executor.apply(&create_users_blueprint()).await.unwrap();
        assert_eq!(statements.len(), 2);

        let tables = executor.tables().await.unwrap();
        assert_eq!(tables, vec![Table { name: "users".into() }]);

        let columns = executor.columns("users").await.unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "bio"]);
        assert!(columns[0].autoincrement);
        assert!(!columns[0].nullable);
        assert_eq!(columns[1].type_name, "varchar");
        assert!(columns[1].nullable);
    }

    #[tokio::test]
    async fn test_indexes() {
        let executor = create_executor().await;
        executor.apply(&create_users_blueprint()).await.unwrap();

        let indexes = executor.indexes("users").await.unwrap();

        let primary = indexes.iter().find(|i| i.name == "primary").unwrap();
        assert!(primary.primary);
        assert_eq!(primary.columns, vec!["id"]);

        let unique = indexes.iter().find(|i| i.name == "users_name_unique").unwrap();
        assert!(unique.unique);
        assert!(!unique.primary);
        assert_eq!(unique.columns, vec!["name"]);
    }

    #[tokio::test]
    async fn test_apply_alter_table() {
        let executor = create_executor().await;
        executor.apply(&create_users_blueprint()).await.unwrap();

        let alter = Blueprint::new("users")
            .column(ColumnDefinition::new("age", ColumnType::TinyInteger).nullable())
            .command(Command::RenameColumn {
                from: "bio".into(),
                to: "about".into(),
            });
        executor.apply(&alter).await.unwrap();

        let drop = Blueprint::new("users").command(Command::DropColumn {
            columns: vec!["age".into(), "about".into()],
        });
        let statements = executor.apply(&drop).await.unwrap();
        assert_eq!(statements.len(), 2);

        let names: Vec<String> = executor
            .columns("users")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["id", "name"]);
    }

    #[tokio::test]
    async fn test_rename_index() {
        let executor = create_executor().await;
        executor.apply(&create_users_blueprint()).await.unwrap();

        let rename = Blueprint::new("users").command(Command::RenameIndex {
            from: "users_name_unique".into(),
            to: "users_handle_unique".into(),
        });
        let statements = executor.apply(&rename).await.unwrap();
        assert_eq!(statements.len(), 2);

        let indexes = executor.indexes("users").await.unwrap();
        assert!(indexes.iter().all(|i| i.name != "users_name_unique"));
        let renamed = indexes
            .iter()
            .find(|i| i.name == "users_handle_unique")
            .unwrap();
        assert!(renamed.unique);
    }

    #[tokio::test]
    async fn test_rename_missing_index_is_skipped() {
        let executor = create_executor().await;
        executor.apply(&create_users_blueprint()).await.unwrap();

        let rename = Blueprint::new("users").command(Command::RenameIndex {
            from: "missing".into(),
            to: "still_missing".into(),
        });

        assert!(executor.apply(&rename).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_keys() {
        let executor = create_executor().await;
        executor
            .apply(
                &Blueprint::new("roles")
                    .create()
                    .column(ColumnDefinition::new("id", ColumnType::Integer).auto_increment()),
            )
            .await
            .unwrap();
        executor
            .apply(
                &Blueprint::new("users")
                    .create()
                    .column(ColumnDefinition::new("id", ColumnType::Integer).auto_increment())
                    .column(ColumnDefinition::new("role_id", ColumnType::Integer))
                    .foreign(
                        ForeignCommand::new(["role_id"], "roles", ["id"])
                            .on_delete(ForeignKeyAction::Cascade),
                    ),
            )
            .await
            .unwrap();

        let foreign_keys = executor.foreign_keys("users").await.unwrap();
        assert_eq!(foreign_keys.len(), 1);
        assert_eq!(foreign_keys[0].columns, vec!["role_id"]);
        assert_eq!(foreign_keys[0].foreign_table, "roles");
        assert_eq!(foreign_keys[0].foreign_columns, vec!["id"]);
        assert_eq!(foreign_keys[0].on_delete, "cascade");
        assert_eq!(foreign_keys[0].on_update, "no action");
    }

    #[tokio::test]
    async fn test_unsupported_commands_are_skipped() {
        let executor = create_executor().await;
        executor.apply(&create_users_blueprint()).await.unwrap();

        let blueprint = Blueprint::new("users")
            .command(Command::DropForeign {
                index: "users_role_id_foreign".into(),
            })
            .command(Command::DropIndex {
                index: "users_name_unique".into(),
            });

        assert_eq!(
            executor.apply(&blueprint).await.unwrap(),
            vec!["drop index `users_name_unique`"]
        );
    }

    #[tokio::test]
    async fn test_columns_table_not_found() {
        let executor = create_executor().await;

        assert!(matches!(
            executor.columns("missing").await,
            Err(MigrateError::TableNotFound(table)) if table == "missing"
        ));
        assert!(matches!(
            executor.columns("").await,
            Err(MigrateError::Grammar(_))
        ));
    }

    #[tokio::test]
    async fn test_views() {
        let executor = create_executor().await;
        executor.apply(&create_users_blueprint()).await.unwrap();
        sqlx::query("create view named_users as select name from users")
            .execute(executor.pool())
            .await
            .unwrap();

        let views = executor.views().await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].name, "named_users");
        assert!(views[0].definition.contains("select name from users"));
    }

    #[tokio::test]
    async fn test_drop_all_tables_and_views() {
        let executor = create_executor().await;
        executor.apply(&create_users_blueprint()).await.unwrap();
        sqlx::query("create view named_users as select name from users")
            .execute(executor.pool())
            .await
            .unwrap();

        executor.drop_all_views().await.unwrap();
        assert!(executor.views().await.unwrap().is_empty());
        assert_eq!(executor.tables().await.unwrap().len(), 1);

        executor.drop_all_tables().await.unwrap();
        assert!(executor.tables().await.unwrap().is_empty());
        assert!(executor.views().await.unwrap().is_empty());

        // The catalog no longer knows the table or its unique index
        executor.apply(&create_users_blueprint()).await.unwrap();
        assert_eq!(executor.tables().await.unwrap()[0].name, "users");
        assert!(executor
            .indexes("users")
            .await
            .unwrap()
            .iter()
            .any(|index| index.name == "users_name_unique"));
    }

    #[tokio::test]
    async fn test_version() {
        let executor = create_executor().await;

        let version = executor.version().await.unwrap().unwrap();
        assert!(version.starts_with("3."));
    }

    #[tokio::test]
    async fn test_dry_run() {
        let pool = create_test_pool().await;
        let executor = SchemaExecutor::new(pool.clone(), SqliteGrammar::new(""), SqliteProcessor)
            .dry_run(true);

        let statements = executor.apply(&create_users_blueprint()).await.unwrap();
        assert_eq!(statements.len(), 2);
        executor.drop_all_tables().await.unwrap();

        // Nothing was executed
        let row: Option<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name='users'")
                .fetch_optional(&pool)
                .await
                .unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn test_prefix_applies_to_introspection() {
        let executor = SchemaExecutor::new(
            create_test_pool().await,
            SqliteGrammar::new("app_"),
            SqliteProcessor,
        );
        executor.apply(&create_users_blueprint()).await.unwrap();

        assert_eq!(executor.tables().await.unwrap()[0].name, "app_users");
        assert_eq!(executor.columns("users").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_document_store_grammar_runs_nothing() {
        let executor = SchemaExecutor::new(create_test_pool().await, MongoGrammar, MongoProcessor);

        assert!(executor.apply(&create_users_blueprint()).await.unwrap().is_empty());
        assert!(executor.tables().await.unwrap().is_empty());
        assert!(executor.columns("users").await.unwrap().is_empty());
        assert_eq!(executor.version().await.unwrap(), None);
        executor.drop_all_tables().await.unwrap();
    }
}
