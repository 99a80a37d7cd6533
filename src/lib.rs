//! # hostsfeed - Hosts/Domain Feed Aggregator
//!
//! Ingests line-oriented feeds (hosts-file style or plain domain lists),
//! normalizes every line into a bare domain or IP, classifies it, and
//! filters the result against a whitelist of exact and pattern rules.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        hostsfeed                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: update, check, version                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  FeedExtractor                                              │
//! │    ├── Retriever (reqwest, blocking)                        │
//! │    └── clean.list -> domains.list fallback                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Session                                                    │
//! │    ├── normalizer: comments, 0.0.0.0 / 127.0.0.1 prefixes   │
//! │    ├── classifier: ip / domain / rejected (ipnet)           │
//! │    └── whitelist: anchored fragments, one alternation       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Output (FileSystem trait)                                  │
//! │    └── sorted, deduplicated domains.list / ips.list         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use hostsfeed::extractor::{FeedExtractor, LocatorTemplate};
//! use hostsfeed::fetcher::HttpRetriever;
//! use hostsfeed::session::Session;
//!
//! fn main() -> anyhow::Result<()> {
//!     let template = LocatorTemplate::new("https://lists.example.org/%s/")?;
//!     let mut extractor = FeedExtractor::new(HttpRetriever::new()?, template, std::io::stdout());
//!
//!     let mut session = Session::new();
//!     extractor.load_whitelist(&mut session, "whitelist");
//!     extractor.extract_all(&mut session, &["ads", "malware"]);
//!
//!     println!("{} domains, {} ips", session.domains().len(), session.ips().len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`classifier`] - Domain/IP classification and IP exclusions
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`error`] - Library error type
//! - [`extractor`] - Candidate fallback, whitelist loading, status lines
//! - [`fetcher`] - Retrieval collaborator and HTTP implementation
//! - [`fs_abstraction`] - Persistence collaborator
//! - [`normalizer`] - Raw line normalization
//! - [`output`] - List formatting and generation
//! - [`session`] - Per-run accumulators
//! - [`whitelist`] - Whitelist rule compilation

pub mod classifier;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod fs_abstraction;
pub mod normalizer;
pub mod output;
pub mod session;
pub mod whitelist;

pub use classifier::Classification;
pub use config::Config;
pub use error::FeedError;
pub use extractor::{FeedExtractor, LocatorTemplate, Outcome};
pub use session::Session;
pub use whitelist::Whitelist;
