//! CLI command definitions and dispatch.

pub mod migrate;
pub mod organization;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use orgdal_core::config::AppConfig;
use orgdal_core::error::AppError;
use orgdal_database::DatabasePool;

/// orgdal — organization data access
#[derive(Debug, Parser)]
#[command(name = "orgdal", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Organization management
    Org(organization::OrgArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, config).await,
            Commands::Org(args) => organization::execute(args, config, self.format).await,
        }
    }
}

/// Helper: connect to the configured database
pub async fn connect(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}
