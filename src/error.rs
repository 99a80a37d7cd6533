//! Error types for hostsfeed.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Retrieval of {url} failed: {reason}")]
    Retrieval { url: String, reason: String },

    #[error("Malformed whitelist line '{line}': {reason}")]
    MalformedWhitelistLine { line: String, reason: String },

    #[error("Whitelist pattern error: {0}")]
    Whitelist(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error on {path:?}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FeedError {
    pub fn retrieval(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Retrieval {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedWhitelistLine {
            line: line.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
