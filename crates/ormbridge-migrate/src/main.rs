//! ormbridge-migrate CLI
//!
//! Command-line tool for applying schema blueprints and inspecting a
//! SQLite database.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ormbridge_migrate::prelude::*;

/// Apply schema blueprints to SQLite.
#[derive(Parser)]
#[command(name = "ormbridge-migrate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:database.sqlite")]
    database: String,

    /// Prefix prepended to every table name.
    #[arg(short, long, env = "DB_PREFIX", default_value = "")]
    prefix: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SQL for a blueprint file without executing it.
    Sql {
        /// JSON file holding a blueprint or a list of blueprints.
        file: PathBuf,
    },

    /// Apply a blueprint file.
    Apply {
        /// JSON file holding a blueprint or a list of blueprints.
        file: PathBuf,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },

    /// List tables.
    Tables,

    /// Show the columns of a table.
    Columns {
        /// Table name, without prefix.
        table: String,
    },

    /// Show the indexes of a table.
    Indexes {
        /// Table name, without prefix.
        table: String,
    },

    /// Show the SQLite version.
    Version,

    /// Drop every table and view.
    Wipe {
        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Connect to database
    let options = SqliteConnectOptions::from_str(&cli.database)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    let executor = SchemaExecutor::new(pool, SqliteGrammar::new(cli.prefix), SqliteProcessor);

    match cli.command {
        Commands::Sql { file } => {
            for blueprint in load_blueprints(&file)? {
                for sql in executor.sql_for(&blueprint).await? {
                    println!("{sql};");
                }
            }
        }

        Commands::Apply { file, dry_run } => {
            let blueprints = load_blueprints(&file)?;
            let executor = executor.dry_run(dry_run);

            if dry_run {
                info!("Dry run mode - SQL will be printed but not executed.");
            }

            executor.apply_all(&blueprints).await?;
            info!(blueprints = blueprints.len(), "Done.");
        }

        Commands::Tables => {
            let tables = executor.tables().await?;

            if tables.is_empty() {
                info!("No tables found.");
            } else {
                for table in &tables {
                    println!("{}", table.name);
                }
            }
        }

        Commands::Columns { table } => {
            let columns = executor.columns(&table).await?;

            println!("\n{:<24} {:<16} {:<8} {:<16} {}", "name", "type", "null", "default", "autoincrement");
            println!("{:-<80}", "");
            for column in &columns {
                println!(
                    "{:<24} {:<16} {:<8} {:<16} {}",
                    column.name,
                    column.ty,
                    column.nullable,
                    column.default.as_deref().unwrap_or(""),
                    column.autoincrement
                );
            }
            println!();
        }

        Commands::Indexes { table } => {
            let indexes = executor.indexes(&table).await?;

            if indexes.is_empty() {
                info!(table = %table, "No indexes found.");
            } else {
                for index in &indexes {
                    let kind = match (index.primary, index.unique) {
                        (true, _) => "primary",
                        (false, true) => "unique",
                        (false, false) => "index",
                    };
                    println!(" [{kind}] {} ({})", index.name, index.columns.join(", "));
                }
            }
        }

        Commands::Version => match executor.version().await? {
            Some(version) => println!("SQLite {version}"),
            None => info!("Version is not available."),
        },

        Commands::Wipe { dry_run } => {
            let executor = executor.dry_run(dry_run);
            executor.drop_all_views().await?;
            executor.drop_all_tables().await?;
            info!("Database wiped.");
        }
    }

    Ok(())
}
