//! CLI command implementations.

pub mod check;
pub mod update;

use std::io::Write;

use crate::config::Config;
use crate::extractor::FeedExtractor;
use crate::fetcher::Retriever;
use crate::fs_abstraction::FileSystem;
use crate::session::Session;

/// Load the whitelist from the local file if configured, else remotely.
pub(crate) fn load_whitelist<R: Retriever, W: Write, F: FileSystem + ?Sized>(
    extractor: &mut FeedExtractor<R, W>,
    fs: &F,
    config: &Config,
    session: &mut Session,
) -> bool {
    match config.whitelist_file.as_deref() {
        Some(path) => extractor.load_whitelist_file(fs, session, path),
        None => extractor.load_whitelist(session, &config.whitelist_repo),
    }
}
