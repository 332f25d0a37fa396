//! Integration tests applying blueprint files to an in-memory database.
//!
//! Each test writes a blueprint file, loads it the way the CLI does, applies
//! it through `SchemaExecutor` and checks the schema SQLite reports back.

use std::io::Write;

use ormbridge_migrate::prelude::*;
use sqlx::sqlite::SqlitePool;

async fn create_test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool")
}

fn write_blueprints(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(json.as_bytes()).expect("write blueprint");
    file
}

// =============================================================================
// Schema lifecycle: create, alter, rename, drop
// =============================================================================

#[tokio::test]
async fn blueprint_file_lifecycle() {
    let file = write_blueprints(
        r#"[
            {
                "table": "roles",
                "columns": [
                    {"name": "id", "type": "integer", "auto_increment": true},
                    {"name": "title", "type": "string"}
                ],
                "commands": [{"name": "create"}]
            },
            {
                "table": "users",
                "columns": [
                    {"name": "id", "type": "bigInteger", "auto_increment": true},
                    {"name": "role_id", "type": "integer"},
                    {"name": "email", "type": "string"},
                    {"name": "status", "type": "enum", "allowed": ["active", "banned"], "default": {"string": "active"}},
                    {"name": "meta", "type": "json", "nullable": true},
                    {"name": "created_at", "type": "timestamp", "use_current": true}
                ],
                "commands": [
                    {"name": "create"},
                    {"name": "foreign", "columns": ["role_id"], "on": "roles", "references": ["id"], "on_delete": "cascade"},
                    {"name": "unique", "index": "users_email_unique", "columns": ["email"]},
                    {"name": "index", "index": "users_role_id_index", "columns": ["role_id"]}
                ]
            }
        ]"#,
    );

    let executor = SchemaExecutor::new(
        create_test_pool().await,
        SqliteGrammar::new("app_"),
        SqliteProcessor,
    );
    executor
        .apply_all(&load_blueprints(file.path()).unwrap())
        .await
        .unwrap();

    let tables: Vec<String> = executor
        .tables()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(tables, vec!["app_roles", "app_users"]);

    let columns = executor.columns("users").await.unwrap();
    let status = columns.iter().find(|c| c.name == "status").unwrap();
    assert_eq!(status.type_name, "varchar");
    assert_eq!(status.default.as_deref(), Some("'active'"));
    let created_at = columns.iter().find(|c| c.name == "created_at").unwrap();
    assert_eq!(created_at.ty, "datetime");
    assert_eq!(created_at.default.as_deref(), Some("CURRENT_TIMESTAMP"));

    let foreign_keys = executor.foreign_keys("users").await.unwrap();
    assert_eq!(foreign_keys[0].foreign_table, "app_roles");

    // The enum check constraint is enforced
    let rejected = sqlx::query(
        "insert into app_users (role_id, email, status) values (1, 'a@example.com', 'deleted')",
    )
    .execute(executor.pool())
    .await;
    assert!(rejected.is_err());

    let rename = write_blueprints(
        r#"{
            "table": "users",
            "commands": [
                {"name": "renameIndex", "from": "users_role_id_index", "to": "users_role_index"},
                {"name": "rename", "to": "members"}
            ]
        }"#,
    );
    executor
        .apply_all(&load_blueprints(rename.path()).unwrap())
        .await
        .unwrap();

    let indexes = executor.indexes("members").await.unwrap();
    assert!(indexes.iter().any(|i| i.name == "users_role_index"));
    assert!(indexes.iter().all(|i| i.name != "users_role_id_index"));

    let drop = write_blueprints(r#"{"table": "members", "commands": [{"name": "dropIfExists"}]}"#);
    executor
        .apply_all(&load_blueprints(drop.path()).unwrap())
        .await
        .unwrap();

    let tables = executor.tables().await.unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].name, "app_roles");
}

// =============================================================================
// SQL preview
// =============================================================================

#[tokio::test]
async fn sql_for_previews_without_executing() {
    let executor = SchemaExecutor::new(
        create_test_pool().await,
        SqliteGrammar::new(""),
        SqliteProcessor,
    );
    let blueprints = parse_blueprints(
        r#"{
            "table": "posts",
            "columns": [{"name": "id", "type": "integer", "auto_increment": true}],
            "commands": [{"name": "create"}]
        }"#,
    )
    .unwrap();

    let sql = executor.sql_for(&blueprints[0]).await.unwrap();

    assert_eq!(
        sql,
        vec!["create table `posts` (`id` integer primary key autoincrement not null)"]
    );
    assert!(executor.tables().await.unwrap().is_empty());
}
