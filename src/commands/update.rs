//! Update command implementation.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::extractor::FeedExtractor;
use crate::fetcher::{HttpRetriever, Retriever};
use crate::fs_abstraction::{real_fs, FileSystem};
use crate::output::{format_list, write_outputs};
use crate::session::Session;

/// Result of one update run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateSummary {
    pub domains: usize,
    pub ips: usize,
    pub failed: Vec<String>,
    pub whitelist_loaded: bool,
}

/// Run the update command
pub fn run(repositories: Vec<String>, dry_run: bool, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    let retriever = HttpRetriever::with_timeout(Duration::from_secs(config.timeout_secs))?;
    let stdout = io::stdout();

    let summary = execute(
        &config,
        &repositories,
        dry_run,
        retriever,
        real_fs(),
        stdout.lock(),
    )?;

    println!();
    println!(
        "[OK] {} domains, {} ips ({} repositories failed)",
        summary.domains,
        summary.ips,
        summary.failed.len()
    );

    Ok(())
}

/// Load the whitelist, extract every repository and write the results.
///
/// Repositories given explicitly replace the configured list.
pub fn execute<R, F, W>(
    config: &Config,
    repositories: &[String],
    dry_run: bool,
    retriever: R,
    fs: &F,
    status: W,
) -> Result<UpdateSummary>
where
    R: Retriever,
    F: FileSystem + ?Sized,
    W: Write,
{
    let repositories = if repositories.is_empty() {
        config.repositories.as_slice()
    } else {
        repositories
    };

    if repositories.is_empty() {
        warn!("No repositories configured. Check your configuration.");
        return Ok(UpdateSummary::default());
    }

    let mut session = Session::with_exclusions(config.exclusions()?);
    let mut extractor = FeedExtractor::new(retriever, config.template()?, status);

    let whitelist_loaded = super::load_whitelist(&mut extractor, fs, config, &mut session);
    if !whitelist_loaded {
        warn!("Continuing without whitelist");
    }

    info!("Processing {} repositories...", repositories.len());
    let failed = extractor.extract_all(&mut session, repositories);
    for repo in &failed {
        error!("No data extracted from {}", repo);
    }

    let (domains, ips) = if dry_run {
        info!("Dry-run mode: output files not written");
        (
            format_list(session.domains()).len(),
            format_list(session.ips()).len(),
        )
    } else {
        let written = write_outputs(fs, &config.output, &session)?;
        (written.domains, written.ips)
    };

    Ok(UpdateSummary {
        domains,
        ips,
        failed,
        whitelist_loaded,
    })
}
