//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Scope-gated reconnaissance gateway
///
/// Passive lookups (DNS, WHOIS, geolocation) and active port scans are only
/// run against targets on the allow-list.
#[derive(Parser, Debug)]
#[command(name = "reconguard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, env = "RECONGUARD_CONFIG", default_value = "reconguard.toml", global = true)]
    pub config: PathBuf,

    /// SQLite URL of the durable target registry
    #[arg(long, env = "RECONGUARD_DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP gateway
    Serve(ServeArgs),

    /// Manage the general target registry
    Targets(TargetsArgs),

    /// Show the passive and active scope decisions for a target
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, env = "RECONGUARD_LISTEN")]
    pub listen: Option<SocketAddr>,
}

#[derive(Args, Debug)]
pub struct TargetsArgs {
    #[command(subcommand)]
    pub command: TargetsCommands,
}

#[derive(Subcommand, Debug)]
pub enum TargetsCommands {
    /// Register a target
    Add {
        /// IP address or domain name
        target: String,
    },

    /// Unregister a target
    Remove {
        /// IP address or domain name
        target: String,
    },

    /// List registered targets
    List,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// IP address or domain name
    pub target: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["reconguard", "serve", "--listen", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.listen.unwrap().port(), 9000),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_targets_list_with_global_flags() {
        let cli = Cli::try_parse_from([
            "reconguard",
            "targets",
            "list",
            "--output",
            "json",
            "--database-url",
            "sqlite:recon.db",
        ])
        .unwrap();

        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.database_url.as_deref(), Some("sqlite:recon.db"));
        assert!(matches!(
            cli.command,
            Commands::Targets(TargetsArgs {
                command: TargetsCommands::List
            })
        ));
    }

    #[test]
    fn test_check_requires_target() {
        assert!(Cli::try_parse_from(["reconguard", "check"]).is_err());
    }
}
