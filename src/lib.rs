pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod pagination;
pub mod services;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::services::maintenance::MaintenanceService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_reset() -> Result<()> {
    let service = MaintenanceService::new(AppConfig::from_env());
    service.reset()
}

pub fn handle_recompute() -> Result<()> {
    let service = MaintenanceService::new(AppConfig::from_env());
    service.recompute()
}

pub fn handle_schema() -> Result<()> {
    println!("{}", api::export_schema_sdl());
    Ok(())
}
