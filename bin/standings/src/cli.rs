//! Standings CLI entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use standings_node_core::{
    args::{LogArgs, ServiceArgs, StoreArgs},
    builder::build_service,
    config::NodeConfig,
    logging, version,
};
use standings_service::LeaderboardService;
use tracing::{debug, info};

use crate::commands::{bench::BenchArgs, repl::ReplArgs};

/// Standings - live leaderboard ranking engine
#[derive(Debug, Parser)]
#[command(author, version, long_version = version::LONG_VERSION, about, long_about = None)]
pub(crate) struct Cli {
    /// Logging configuration (applies to all subcommands).
    #[command(flatten)]
    pub(crate) logs: LogArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Serve line commands from stdin, one JSON reply per line on stdout.
    Repl(ReplArgs),
    /// Run a concurrent workload and report throughput.
    Bench(BenchArgs),
}

/// Leaderboard arguments shared by every command.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LeaderboardArgs {
    /// TOML configuration file.
    #[arg(long, value_name = "PATH", env = "STANDINGS_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) store: StoreArgs,

    #[command(flatten)]
    pub(crate) service: ServiceArgs,
}

impl LeaderboardArgs {
    /// Load configuration (defaults < env < config file < CLI) and build
    /// the service.
    pub(crate) fn build(&self) -> Result<LeaderboardService> {
        let mut config = NodeConfig::load(self.config.as_deref())?;
        config.apply_overrides(&self.store, &self.service);
        debug!(?config, "resolved configuration");
        build_service(&config)
    }
}

/// Parse arguments, set up error reporting and logging, and dispatch.
pub(crate) fn run() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(&cli.logs)?;

    info!("Starting standings {}", version::VERSION);

    match cli.command {
        Commands::Repl(args) => crate::commands::repl::run(args),
        Commands::Bench(args) => crate::commands::bench::run(args),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use standings_service::RankBackend;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_store_and_service_flags() {
        let cli = Cli::try_parse_from([
            "standings",
            "-v",
            "repl",
            "--store.backend",
            "skiplist",
            "--store.seed",
            "7",
            "--service.min-delta",
            "-50",
        ])
        .unwrap();
        assert_eq!(cli.logs.verbosity, 1);
        let Commands::Repl(args) = cli.command else {
            panic!("expected repl");
        };
        assert_eq!(args.leaderboard.store.backend, Some(RankBackend::SkipList));
        assert_eq!(args.leaderboard.store.seed, Some(7));
        assert_eq!(
            args.leaderboard.service.min_delta,
            Some(rust_decimal::Decimal::from(-50))
        );
    }
}
