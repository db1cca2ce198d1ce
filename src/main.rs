use anyhow::Result;
use log::error;

use poker_ledger::cli::Command;
use poker_ledger::{handle_recompute, handle_reset, handle_schema, handle_serve, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        error!("Command failed: {e:#}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Reset => handle_reset(),
        Command::Recompute => handle_recompute(),
        Command::Schema => handle_schema(),
    }
}
