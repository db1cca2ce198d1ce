use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "poker-ledger backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the GraphQL server
    Serve {
        /// Port number (optional, defaults to 5001)
        #[arg(short, long, default_value_t = 5001)]
        port: u16,
    },
    /// Drop all tables and recreate the empty schema
    Reset,
    /// Re-derive every player's statistics from their stored results
    Recompute,
    /// Print the GraphQL schema
    Schema,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_default_port() {
        let cli = Cli::try_parse_from(["poker_ledger", "serve"]).unwrap();
        assert_eq!(cli.command, Command::Serve { port: 5001 });
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["poker_ledger", "serve", "--port", "8080"]).unwrap();
        assert_eq!(cli.command, Command::Serve { port: 8080 });

        let cli = Cli::try_parse_from(["poker_ledger", "recompute"]).unwrap();
        assert_eq!(cli.command, Command::Recompute);
        assert!(Cli::try_parse_from(["poker_ledger", "ingest"]).is_err());
    }
}
