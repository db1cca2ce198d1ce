use anyhow::Result;
use colored::Colorize;
use log::info;

use crate::config::settings::AppConfig;
use crate::database;
use crate::services::players::PlayerDirectory;

/// Offline database chores run from the command line.
pub struct MaintenanceService {
    config: AppConfig,
}

impl MaintenanceService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Drop every table and recreate the empty schema.
    pub fn reset(&self) -> Result<()> {
        let pool = database::create_pool(&self.config.database.path)?;
        let conn = database::get_connection(&pool)?;

        database::setup::reset_database(&conn)?;
        info!("Database {} reset", self.config.database.path);
        Ok(())
    }

    /// Re-derive all player statistics and print the ones that were stale.
    pub fn recompute(&self) -> Result<()> {
        let pool = database::create_pool(&self.config.database.path)?;
        let conn = database::get_connection(&pool)?;
        database::setup::ensure_schema(&conn)?;
        drop(conn);

        let stale = PlayerDirectory::new(pool).recompute_all()?;
        if stale.is_empty() {
            println!("{}", "All player statistics are up to date".green());
            return Ok(());
        }

        println!("{}", format!("Repaired {} player(s):", stale.len()).yellow());
        for player in &stale {
            println!("  {player}");
        }
        Ok(())
    }
}
