//! Token classification: IP address, domain, or rejected.
//!
//! IP tokens are checked against a set of excluded private/reserved ranges,
//! domain tokens against label grammar and the compiled whitelist.

use anyhow::{Context, Result};
use ipnet::IpNet;
use std::fmt;
use std::net::IpAddr;

use crate::whitelist::Whitelist;

/// Maximum total length of a domain name
pub const MAX_DOMAIN_LEN: usize = 253;

/// Maximum length of a single domain label
pub const MAX_LABEL_LEN: usize = 63;

/// Ranges excluded when no explicit set is configured.
pub const DEFAULT_EXCLUDED_RANGES: &[&str] = &[
    "0.0.0.0/32",
    "10.0.0.0/8",
    "127.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "::/128",
    "::1/128",
    "fc00::/7",
    "fe80::/10",
];

/// Category assigned to a normalized token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Ip,
    Domain,
    Rejected,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Ip => write!(f, "ip"),
            Classification::Domain => write!(f, "domain"),
            Classification::Rejected => write!(f, "rejected"),
        }
    }
}

/// Set of address ranges whose members are never accepted as IPs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpExclusions {
    ranges: Vec<IpNet>,
}

impl IpExclusions {
    pub fn new(ranges: Vec<IpNet>) -> Self {
        Self { ranges }
    }

    /// Parse a list of CIDR strings (plain addresses become /32 or /128).
    pub fn parse<S: AsRef<str>>(ranges: &[S]) -> Result<Self> {
        let ranges = ranges
            .iter()
            .map(|r| {
                let r = r.as_ref().trim();
                if r.contains('/') {
                    r.parse::<IpNet>()
                        .with_context(|| format!("Invalid excluded range: {}", r))
                } else {
                    r.parse::<IpAddr>()
                        .map(IpNet::from)
                        .with_context(|| format!("Invalid excluded address: {}", r))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { ranges })
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.ranges.iter().any(|net| net.contains(ip))
    }

    pub fn ranges(&self) -> &[IpNet] {
        &self.ranges
    }
}

impl Default for IpExclusions {
    fn default() -> Self {
        let ranges = DEFAULT_EXCLUDED_RANGES
            .iter()
            .filter_map(|r| r.parse().ok())
            .collect();
        Self { ranges }
    }
}

/// Check a token against domain label grammar.
///
/// One or more dot-separated labels of ASCII letters, digits and hyphens,
/// each 1-63 characters and neither starting nor ending with a hyphen. At
/// least one dot is required and the whole name is at most 253 characters.
///
/// # Examples
/// ```
/// use hostsfeed::classifier::is_valid_domain;
/// assert!(is_valid_domain("google.com"));
/// assert!(!is_valid_domain("-hello-.world"));
/// assert!(!is_valid_domain("hello@world"));
/// assert!(!is_valid_domain("localhost"));
/// ```
pub fn is_valid_domain(token: &str) -> bool {
    if token.is_empty() || token.len() > MAX_DOMAIN_LEN || !token.contains('.') {
        return false;
    }

    token.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// Classify a normalized token.
///
/// IP addresses inside `exclusions` and domains matched by `whitelist` are
/// rejected, as is anything that is neither a valid address nor a valid
/// domain (including the empty token).
pub fn classify(token: &str, whitelist: &Whitelist, exclusions: &IpExclusions) -> Classification {
    if let Ok(ip) = token.parse::<IpAddr>() {
        return if exclusions.contains(&ip.to_canonical()) {
            Classification::Rejected
        } else {
            Classification::Ip
        };
    }

    if is_valid_domain(token) && !whitelist.is_whitelisted(token) {
        Classification::Domain
    } else {
        Classification::Rejected
    }
}
