//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hostsfeed")]
#[command(author, version, about = "Hosts/domain feed aggregator with whitelist filtering")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "hostsfeed.yaml", global = true)]
    pub config: PathBuf,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the whitelist and feeds, then write the aggregated lists
    Update {
        /// Repositories to process (default: those in the config file)
        repositories: Vec<String>,

        /// Fetch and filter but don't write output files
        #[arg(long)]
        dry_run: bool,
    },

    /// Normalize and classify a single feed line
    Check {
        /// Raw feed line, e.g. "0.0.0.0 ads.example.com"
        line: String,
    },

    /// Show version
    Version,
}
