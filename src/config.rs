//! Configuration management for hostsfeed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::classifier::{IpExclusions, DEFAULT_EXCLUDED_RANGES};
use crate::extractor::LocatorTemplate;
use crate::fetcher::DEFAULT_TIMEOUT_SECS;

/// Default locator template
pub const DEFAULT_RAW_LINK: &str =
    "https://raw.githubusercontent.com/Ultimate-Hosts-Blacklist/%s/master/";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Locator template; `%s` is replaced by the repository identifier
    pub raw_link: String,

    /// Repository holding the whitelist `domains.list`
    pub whitelist_repo: String,

    /// Local whitelist used instead of the remote one when set
    pub whitelist_file: Option<PathBuf>,

    /// Feed repositories, processed in order
    pub repositories: Vec<String>,

    /// IP ranges never accepted (CIDR or plain addresses)
    pub excluded_ranges: Vec<String>,

    /// Retrieval timeout in seconds
    pub timeout_secs: u64,

    /// Generated list locations
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raw_link: DEFAULT_RAW_LINK.to_string(),
            whitelist_repo: "whitelist".to_string(),
            whitelist_file: None,
            repositories: Vec::new(),
            excluded_ranges: DEFAULT_EXCLUDED_RANGES
                .iter()
                .map(|r| r.to_string())
                .collect(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output: OutputConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub domains: PathBuf,
    pub ips: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            domains: PathBuf::from("domains.list"),
            ips: PathBuf::from("ips.list"),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            warn!(
                "Config file {:?} not found, using defaults",
                path.as_ref()
            );
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        LocatorTemplate::new(self.raw_link.as_str())?;

        if !self.raw_link.starts_with("https://") && !self.raw_link.starts_with("http://") {
            anyhow::bail!("raw_link must be an HTTP(S) URL: {}", self.raw_link);
        }

        if self.whitelist_repo.trim().is_empty() && self.whitelist_file.is_none() {
            anyhow::bail!("Either whitelist_repo or whitelist_file must be set");
        }

        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }

        self.exclusions()?;

        Ok(())
    }

    pub fn template(&self) -> Result<LocatorTemplate> {
        Ok(LocatorTemplate::new(self.raw_link.as_str())?)
    }

    pub fn exclusions(&self) -> Result<IpExclusions> {
        IpExclusions::parse(&self.excluded_ranges)
    }
}
