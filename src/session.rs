//! Per-run state: compiled whitelist, IP exclusions and accumulated results.

use tracing::debug;

use crate::classifier::{classify, Classification, IpExclusions};
use crate::normalizer::format_line;
use crate::whitelist::Whitelist;

/// Context owned by the caller of one run.
///
/// Domains and IPs are appended in acceptance order; duplicates are kept
/// and removed only when the output is formatted. The accumulators take
/// `&mut self` and need external synchronization if shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub whitelist: Whitelist,
    pub exclusions: IpExclusions,
    domains: Vec<String>,
    ips: Vec<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exclusions(exclusions: IpExclusions) -> Self {
        Self {
            exclusions,
            ..Self::default()
        }
    }

    /// Normalize, classify and record one raw feed line.
    pub fn ingest_line(&mut self, raw: &str) -> Classification {
        let token = format_line(raw);
        self.ingest_token(token)
    }

    /// Classify an already-normalized token and record it if accepted.
    pub fn ingest_token(&mut self, token: String) -> Classification {
        let class = classify(&token, &self.whitelist, &self.exclusions);
        match class {
            Classification::Ip => self.ips.push(token),
            Classification::Domain => self.domains.push(token),
            Classification::Rejected => {
                if !token.is_empty() {
                    debug!("Rejected {:?}", token);
                }
            }
        }
        class
    }

    /// Feed every line of `body` through [`ingest_line`](Session::ingest_line).
    ///
    /// Returns the number of accepted tokens.
    pub fn ingest_text(&mut self, body: &str) -> usize {
        body.lines()
            .filter(|line| self.ingest_line(line) != Classification::Rejected)
            .count()
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn ips(&self) -> &[String] {
        &self.ips
    }

    /// Drop accumulated results and the whitelist, keeping exclusions.
    pub fn reset(&mut self) {
        self.whitelist.clear();
        self.domains.clear();
        self.ips.clear();
    }
}
