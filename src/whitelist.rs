//! Whitelist compilation.
//!
//! Each whitelist source line becomes one or more anchored regular
//! expression fragments:
//!
//! | Line               | Fragments                              |
//! |--------------------|----------------------------------------|
//! | `example.com`      | `^example\.com$`, `^www\.example\.com$` |
//! | `www.example.com`  | `^www\.example\.com$`, `^example\.com$` |
//! | `ALL example.com`  | `example\.com$`                        |
//!
//! Once a source has been fully read, [`Whitelist::build`] joins every
//! fragment with `|` into a single pattern used for whitelist lookups.

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::error::{FeedError, Result};

/// Prefix marking a rule that covers a domain and all of its subdomains.
pub const ALL_PREFIX: &str = "ALL ";

const WWW_PREFIX: &str = "www.";

/// Compiled program size limit for the joined pattern. Whitelists run to
/// tens of thousands of rules, well past the regex crate default.
pub const PATTERN_SIZE_LIMIT: usize = 1 << 30;

/// Lazy DFA cache limit for whitelist lookups
pub const DFA_SIZE_LIMIT: usize = 256 << 20;

/// Compiled whitelist state.
///
/// Fragments accumulate through [`compile_line`](Whitelist::compile_line);
/// lookups only see them after [`build`](Whitelist::build). Not safe for
/// concurrent mutation without external synchronization.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    fragments: Vec<String>,
    pattern: String,
    compiled: Option<Regex>,
}

impl Whitelist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every line of a whitelist source and build the pattern.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut whitelist = Self::new();
        whitelist.compile_source(lines)?;
        Ok(whitelist)
    }

    /// Compile all lines of `lines`, skipping malformed ones, then build.
    pub fn compile_source<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            if let Err(e) = self.compile_line(line.as_ref()) {
                warn!("Skipping whitelist entry: {}", e);
            }
        }
        self.build()
    }

    /// Append the fragments for one whitelist source line.
    ///
    /// Blank lines and `#` comments add nothing. A line with embedded
    /// whitespace or an `ALL ` rule without a domain is reported as
    /// [`FeedError::MalformedWhitelistLine`] and adds nothing.
    pub fn compile_line(&mut self, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        if line == ALL_PREFIX.trim_end() {
            return Err(FeedError::malformed(line, "missing domain"));
        }

        if let Some(domain) = line.strip_prefix(ALL_PREFIX) {
            let domain = domain.trim();
            check_domain(line, domain)?;
            self.fragments.push(format!("{}$", regex::escape(domain)));
            return Ok(());
        }

        check_domain(line, line)?;

        let escaped = regex::escape(line);
        self.fragments.push(format!("^{}$", escaped));

        match line.strip_prefix(WWW_PREFIX) {
            Some(bare) if !bare.is_empty() => {
                self.fragments.push(format!("^{}$", regex::escape(bare)));
            }
            Some(_) => {}
            None => {
                self.fragments
                    .push(format!("^{}{}$", regex::escape(WWW_PREFIX), escaped));
            }
        }

        Ok(())
    }

    /// Join all fragments into the search pattern and compile it.
    ///
    /// With no fragments the pattern is the empty string and no whitelist
    /// is active.
    pub fn build(&mut self) -> Result<()> {
        self.pattern = self.fragments.join("|");

        if self.pattern.is_empty() {
            self.compiled = None;
            return Ok(());
        }

        let regex = RegexBuilder::new(&self.pattern)
            .size_limit(PATTERN_SIZE_LIMIT)
            .dfa_size_limit(DFA_SIZE_LIMIT)
            .build()
            .map_err(|e| FeedError::Whitelist(e.to_string()))?;
        debug!(
            "Compiled whitelist: {} fragments, {} bytes",
            self.fragments.len(),
            self.pattern.len()
        );
        self.compiled = Some(regex);
        Ok(())
    }

    /// Whether `domain` is matched anywhere by the compiled pattern.
    pub fn is_whitelisted(&self, domain: &str) -> bool {
        self.compiled
            .as_ref()
            .is_some_and(|regex| regex.is_match(domain))
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// The joined pattern as of the last [`build`](Whitelist::build).
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_active(&self) -> bool {
        self.compiled.is_some()
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
        self.pattern.clear();
        self.compiled = None;
    }
}

fn check_domain(line: &str, domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(FeedError::malformed(line, "missing domain"));
    }
    if domain.chars().any(char::is_whitespace) {
        return Err(FeedError::malformed(line, "domain contains whitespace"));
    }
    Ok(())
}
