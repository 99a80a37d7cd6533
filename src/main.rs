//! hostsfeed - Hosts/domain feed aggregator
//!
//! Fetches hosts-style feeds, filters them against a whitelist and writes
//! the aggregated domain and IP lists.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use hostsfeed::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Update {
            repositories,
            dry_run,
        } => hostsfeed::commands::update::run(repositories, dry_run, &cli.config),
        Commands::Check { line } => hostsfeed::commands::check::run(&line, &cli.config),
        Commands::Version => {
            println!("hostsfeed {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
