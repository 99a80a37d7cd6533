//! Generation of the aggregated domain and IP lists.

use std::path::Path;
use tracing::info;

use crate::config::OutputConfig;
use crate::error::{FeedError, Result};
use crate::fs_abstraction::{FileSystem, WriteMode};
use crate::session::Session;

/// Sort and deduplicate a list.
///
/// # Examples
/// ```
/// use hostsfeed::output::format_list;
/// let list = ["google.com", "twitter.com", "twitter.com", "", "google.com", "github.com"];
/// assert_eq!(format_list(&list), ["", "github.com", "google.com", "twitter.com"]);
/// ```
pub fn format_list<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    let mut list: Vec<String> = items.iter().map(|s| s.as_ref().to_string()).collect();
    list.sort_unstable();
    list.dedup();
    list
}

/// Render a formatted list as newline-terminated text.
pub fn render_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for item in format_list(items) {
        if item.is_empty() {
            continue;
        }
        out.push_str(&item);
        out.push('\n');
    }
    out
}

/// Counts of what was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputSummary {
    pub domains: usize,
    pub ips: usize,
}

/// Write the session's domains and IPs to the configured files.
pub fn write_outputs<F: FileSystem + ?Sized>(
    fs: &F,
    output: &OutputConfig,
    session: &Session,
) -> Result<OutputSummary> {
    let domains = render_list(session.domains());
    let ips = render_list(session.ips());

    write_file(fs, &output.domains, &domains)?;
    write_file(fs, &output.ips, &ips)?;

    let summary = OutputSummary {
        domains: domains.lines().count(),
        ips: ips.lines().count(),
    };
    info!(
        "Wrote {} domains to {:?} and {} ips to {:?}",
        summary.domains, output.domains, summary.ips, output.ips
    );
    Ok(summary)
}

fn write_file<F: FileSystem + ?Sized>(fs: &F, path: &Path, contents: &str) -> Result<()> {
    fs.write(path, contents, WriteMode::Overwrite)
        .map_err(|source| FeedError::FileSystem {
            path: path.to_path_buf(),
            source,
        })
}
