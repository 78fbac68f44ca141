//! Database migration commands.

use clap::Args;

use crate::output;
use orgdal_core::config::AppConfig;
use orgdal_core::error::AppError;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Only check connectivity, do not run migrations
    #[arg(long)]
    pub check: bool,
}

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    let db = super::connect(config).await?;

    if args.check {
        let healthy = db.health_check().await?;
        output::print_kv("Database reachable", &healthy.to_string());
    } else {
        db.migrate().await?;
        output::print_success("Migrations applied");
    }

    db.close().await;
    Ok(())
}
