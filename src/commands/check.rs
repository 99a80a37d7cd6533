//! Check command implementation.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crate::classifier::Classification;
use crate::config::Config;
use crate::extractor::FeedExtractor;
use crate::fetcher::{HttpRetriever, Retriever};
use crate::fs_abstraction::{real_fs, FileSystem};
use crate::normalizer::format_line;
use crate::session::Session;

/// Run the check command
pub fn run(line: &str, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    let retriever = HttpRetriever::with_timeout(Duration::from_secs(config.timeout_secs))?;

    let stdout = io::stdout();
    let (token, class) = classify_line(&config, line, retriever, real_fs(), stdout.lock())?;

    println!();
    if token.is_empty() {
        println!("Nothing to extract from {:?}", line);
    } else {
        println!("{} -> {}", token, class);
    }

    Ok(())
}

/// Normalize `line` and classify it against the configured whitelist.
pub fn classify_line<R, F, W>(
    config: &Config,
    line: &str,
    retriever: R,
    fs: &F,
    status: W,
) -> Result<(String, Classification)>
where
    R: Retriever,
    F: FileSystem + ?Sized,
    W: Write,
{
    let mut session = Session::with_exclusions(config.exclusions()?);
    let mut extractor = FeedExtractor::new(retriever, config.template()?, status);
    super::load_whitelist(&mut extractor, fs, config, &mut session);

    let token = format_line(line);
    let class = session.ingest_token(token.clone());
    Ok((token, class))
}
