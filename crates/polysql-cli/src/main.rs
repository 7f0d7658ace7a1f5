//! polysql CLI
//!
//! Compiles JSON statement descriptions to SQL and optionally executes them.

mod statement;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use polysql_core::Dialect;
use polysql_db::{Database, DatabaseConfig};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::statement::StatementDescription;

/// Multi-dialect SQL statement compiler.
#[derive(Parser)]
#[command(name = "polysql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a statement description and print the SQL.
    Compile {
        /// Target dialect (mysql, postgres, sqlite).
        #[arg(short, long, default_value = "sqlite")]
        dialect: String,

        /// Statement description (JSON).
        file: PathBuf,
    },

    /// Compile a statement for the connected database and execute it.
    Exec {
        /// Database URL, overriding the configuration file.
        #[arg(short, long, env = "DATABASE_URL")]
        database: Option<String>,

        /// Database configuration file (JSON).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print executed statements with their durations.
        #[arg(long)]
        sql_log: bool,

        /// Statement description (JSON).
        file: PathBuf,
    },
}

fn load_config(path: Option<&Path>, database: Option<String>) -> anyhow::Result<DatabaseConfig> {
    let mut config = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?
        }
        None => DatabaseConfig::default(),
    };
    if let Some(url) = database {
        config.url = url;
    }
    Ok(config)
}

async fn exec(config: DatabaseConfig, desc: &StatementDescription) -> anyhow::Result<()> {
    let mut db = Database::from_config(config).await?;
    let sql = desc.compile(db.dialect().clone())?;

    if desc.returns_rows() {
        let rows = db.select_to_map_any(&sql).await?;
        info!(rows = rows.len(), "Query returned");
        for row in &rows {
            println!("{}", serde_json::to_string(row)?);
        }
    } else {
        let affected = db.exec(&sql).await?;
        info!(rows_affected = affected, "Statement executed");
    }

    for entry in db.sql_log() {
        info!(duration = ?entry.duration, "{}", entry.sql);
    }

    db.close().await;
    Ok(())
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

    match cli.command {
        Commands::Compile { dialect, file } => {
            let desc = StatementDescription::load(&file)?;
            let dialect = Dialect::from(dialect);
            if !dialect.is_supported() {
                info!(dialect = %dialect, "Unsupported dialect, column types will not be mapped");
            }
            println!("{}", desc.compile(dialect)?);
        }

        Commands::Exec {
            database,
            config,
            sql_log,
            file,
        } => {
            let desc = StatementDescription::load(&file)?;
            let mut config = load_config(config.as_deref(), database)?;
            if sql_log {
                config.sql_log = true;
            }
            exec(config, &desc).await?;
        }
    }

    Ok(())
}
