//! Feed extraction with ordered candidate fallback.
//!
//! For each repository two resources are tried in order: the pre-cleaned
//! `clean.list`, then the raw `domains.list`. The first one retrieved is
//! parsed line by line into the [`Session`]; if neither can be retrieved the
//! repository contributes nothing.
//!
//! ```text
//! START -> TRY_CLEAN -> SUCCESS(clean)
//!                    -> TRY_RAW -> SUCCESS(raw)
//!                               -> FAILED
//! ```
//!
//! Every operation writes one status line to the configured sink, e.g.
//! `Extracting domains and ips from <repo> (clean.list) done`.

use std::fmt;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{FeedError, Result};
use crate::fetcher::Retriever;
use crate::fs_abstraction::FileSystem;
use crate::session::Session;

/// Status token for a successful operation
pub const DONE: &str = "done";

/// Status token for a failed operation
pub const ERROR: &str = "error";

/// Pre-cleaned resource name
pub const CLEAN_LIST: &str = "clean.list";

/// Raw resource name, also used for the whitelist
pub const DOMAINS_LIST: &str = "domains.list";

/// Status label shown when the raw resource was used
pub const RAW_LABEL: &str = "domain.list";

/// Placeholder for the repository identifier in a locator template
pub const REPO_PLACEHOLDER: &str = "%s";

/// Locator template with one `%s` substitution point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorTemplate(String);

impl LocatorTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        match template.matches(REPO_PLACEHOLDER).count() {
            1 => Ok(Self(template)),
            n => Err(FeedError::Config(format!(
                "Locator template '{}' must contain exactly one '{}' (found {})",
                template, REPO_PLACEHOLDER, n
            ))),
        }
    }

    /// Build the locator of `resource` within repository `repo`.
    ///
    /// # Examples
    /// ```
    /// use hostsfeed::extractor::LocatorTemplate;
    /// let template = LocatorTemplate::new("http://example.org/%s/").unwrap();
    /// assert_eq!(template.locate("ads", "clean.list"), "http://example.org/ads/clean.list");
    /// ```
    pub fn locate(&self, repo: &str, resource: &str) -> String {
        let mut url = self.0.replacen(REPO_PLACEHOLDER, repo, 1);
        url.push_str(resource);
        url
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Which representation of a feed was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Clean,
    Raw,
}

impl Variant {
    pub fn resource(&self) -> &'static str {
        match self {
            Variant::Clean => CLEAN_LIST,
            Variant::Raw => DOMAINS_LIST,
        }
    }
}

/// Terminal state of one extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success(Variant),
    Failed,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Label shown in parentheses on the status line.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success(Variant::Clean) => CLEAN_LIST,
            Outcome::Success(Variant::Raw) => RAW_LABEL,
            Outcome::Failed => "ERROR",
        }
    }

    pub fn token(&self) -> &'static str {
        if self.is_success() {
            DONE
        } else {
            ERROR
        }
    }
}

/// Parser applied to a retrieved body; returns the number of accepted tokens.
pub type BodyParser = fn(&mut Session, &str) -> usize;

/// One resource to attempt, in priority order.
#[derive(Clone)]
pub struct Candidate {
    pub variant: Variant,
    pub url: String,
    pub parse: BodyParser,
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("variant", &self.variant)
            .field("url", &self.url)
            .finish()
    }
}

/// Drives retrieval and parsing of feeds and whitelists.
pub struct FeedExtractor<R, W> {
    retriever: R,
    template: LocatorTemplate,
    status: W,
}

impl<R: Retriever, W: Write> FeedExtractor<R, W> {
    pub fn new(retriever: R, template: LocatorTemplate, status: W) -> Self {
        Self {
            retriever,
            template,
            status,
        }
    }

    /// Ordered resources tried for `repo`.
    pub fn candidates(&self, repo: &str) -> Vec<Candidate> {
        [Variant::Clean, Variant::Raw]
            .into_iter()
            .map(|variant| Candidate {
                variant,
                url: self.template.locate(repo, variant.resource()),
                parse: Session::ingest_text,
            })
            .collect()
    }

    /// Extract domains and IPs of one repository into `session`.
    ///
    /// The first retrievable candidate wins; a failed retrieval is never
    /// retried. Failure is reported on the status line and returned, it is
    /// never propagated as an error.
    pub fn extract(&mut self, session: &mut Session, repo: &str) -> Outcome {
        let mut outcome = Outcome::Failed;

        for candidate in self.candidates(repo) {
            match self.retriever.retrieve(&candidate.url) {
                Ok(body) => {
                    let accepted = (candidate.parse)(session, &body);
                    info!(
                        "{}: {} entries accepted from {}",
                        repo,
                        accepted,
                        candidate.variant.resource()
                    );
                    outcome = Outcome::Success(candidate.variant);
                    break;
                }
                Err(e) => warn!("{}", e),
            }
        }

        self.report(format_args!(
            "Extracting domains and ips from {} ({}) {}",
            repo,
            outcome.label(),
            outcome.token()
        ));
        outcome
    }

    /// Extract every repository in order; returns the ones that failed.
    pub fn extract_all<S: AsRef<str>>(&mut self, session: &mut Session, repos: &[S]) -> Vec<String> {
        let mut failed = Vec::new();
        for repo in repos {
            let repo = repo.as_ref();
            if !self.extract(session, repo).is_success() {
                failed.push(repo.to_string());
            }
        }
        failed
    }

    /// Retrieve `domains.list` of the whitelist repository and compile it.
    ///
    /// On failure the session whitelist is left as it was.
    pub fn load_whitelist(&mut self, session: &mut Session, whitelist_repo: &str) -> bool {
        let url = self.template.locate(whitelist_repo, DOMAINS_LIST);
        let result = self
            .retriever
            .retrieve(&url)
            .and_then(|body| session.whitelist.compile_source(body.lines()));
        self.finish_whitelist(session, result)
    }

    /// Compile a local whitelist file read through `fs`.
    pub fn load_whitelist_file<F: FileSystem + ?Sized>(
        &mut self,
        fs: &F,
        session: &mut Session,
        path: &Path,
    ) -> bool {
        let result = fs
            .read_to_string(path)
            .map_err(|source| FeedError::FileSystem {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|body| session.whitelist.compile_source(body.lines()));
        self.finish_whitelist(session, result)
    }

    fn finish_whitelist(&mut self, session: &mut Session, result: Result<()>) -> bool {
        let ok = match result {
            Ok(()) => {
                info!("Whitelist: {} rules", session.whitelist.fragments().len());
                true
            }
            Err(e @ FeedError::Whitelist(_)) => {
                warn!("{}", e);
                session.whitelist.clear();
                false
            }
            Err(e) => {
                warn!("Failed to get whitelist: {}", e);
                false
            }
        };

        self.report(format_args!(
            "Getting whitelist {}",
            if ok { DONE } else { ERROR }
        ));
        ok
    }

    fn report(&mut self, line: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.status, "{}", line) {
            warn!("Failed to write status line: {}", e);
        }
    }

    pub fn template(&self) -> &LocatorTemplate {
        &self.template
    }

    /// Consume the extractor and return the status sink.
    pub fn into_status(self) -> W {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::MockRetriever;
    use crate::fs_abstraction::MockFileSystem;
    use mockall::Sequence;

    const REPO: &str = "this-repo-is-a-ghost";
    const TEMPLATE: &str = "http://google.com/%s/";

    fn domains() -> Vec<&'static str> {
        vec!["facebook.com", "github.com", "google.com", "hello.world", "twitter.com", "world.hello"]
    }

    fn extractor(mock: MockRetriever) -> FeedExtractor<MockRetriever, Vec<u8>> {
        FeedExtractor::new(mock, LocatorTemplate::new(TEMPLATE).unwrap(), Vec::new())
    }

    fn status_of(extractor: FeedExtractor<MockRetriever, Vec<u8>>) -> String {
        String::from_utf8(extractor.into_status()).unwrap()
    }

    fn not_found(url: &str) -> crate::error::Result<String> {
        Err(FeedError::retrieval(url, "HTTP 404 Not Found"))
    }

    #[test]
    fn test_template_requires_one_placeholder() {
        assert!(LocatorTemplate::new("http://example.org/").is_err());
        assert!(LocatorTemplate::new("http://example.org/%s/%s/").is_err());
        assert!(LocatorTemplate::new(TEMPLATE).is_ok());
    }

    #[test]
    fn test_candidates_in_priority_order() {
        let ex = extractor(MockRetriever::new());
        let candidates = ex.candidates(REPO);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].variant, Variant::Clean);
        assert_eq!(candidates[0].url, "http://google.com/this-repo-is-a-ghost/clean.list");
        assert_eq!(candidates[1].variant, Variant::Raw);
        assert_eq!(candidates[1].url, "http://google.com/this-repo-is-a-ghost/domains.list");
    }

    #[test]
    fn test_extract_clean_succeeds() {
        let body = domains().join("\n");
        let mut mock = MockRetriever::new();
        mock.expect_retrieve()
            .withf(|url| url.ends_with("/clean.list"))
            .times(1)
            .returning(move |_| Ok(body.clone()));
        mock.expect_retrieve()
            .withf(|url| url.ends_with("/domains.list"))
            .times(0);

        let mut session = Session::new();
        let mut ex = extractor(mock);
        assert_eq!(ex.extract(&mut session, REPO), Outcome::Success(Variant::Clean));
        assert_eq!(session.domains(), domains().as_slice());
        assert_eq!(
            status_of(ex),
            format!("Extracting domains and ips from {} (clean.list) {}\n", REPO, DONE)
        );
    }

    #[test]
    fn test_extract_falls_back_to_raw() {
        let mut mock = MockRetriever::new();
        let mut seq = Sequence::new();
        mock.expect_retrieve()
            .withf(|url| url.ends_with("/clean.list"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(not_found);
        mock.expect_retrieve()
            .withf(|url| url.ends_with("/domains.list"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("facebook.com\ngithub.com".to_string()));

        let mut session = Session::new();
        let mut ex = extractor(mock);
        assert_eq!(ex.extract(&mut session, REPO), Outcome::Success(Variant::Raw));
        assert_eq!(session.domains(), ["facebook.com", "github.com"]);
        assert_eq!(
            status_of(ex),
            format!("Extracting domains and ips from {} (domain.list) {}\n", REPO, DONE)
        );
    }

    #[test]
    fn test_extract_both_fail() {
        let mut mock = MockRetriever::new();
        mock.expect_retrieve().times(2).returning(not_found);

        let mut session = Session::new();
        let mut ex = extractor(mock);
        assert_eq!(ex.extract(&mut session, REPO), Outcome::Failed);
        assert!(session.domains().is_empty());
        assert!(session.ips().is_empty());
        assert_eq!(
            status_of(ex),
            format!("Extracting domains and ips from {} (ERROR) {}\n", REPO, ERROR)
        );
    }

    #[test]
    fn test_extract_raw_body_normalized() {
        let mut mock = MockRetriever::new();
        mock.expect_retrieve()
            .returning(|_| Ok("# hosts\n0.0.0.0\tads.example.com\n127.0.0.1 localhost\n85.45.26.36 # c2\n".to_string()));

        let mut session = Session::new();
        let mut ex = extractor(mock);
        ex.extract(&mut session, REPO);
        assert_eq!(session.domains(), ["ads.example.com"]);
        assert_eq!(session.ips(), ["85.45.26.36"]);
    }

    #[test]
    fn test_extract_all_continues_after_failure() {
        let mut mock = MockRetriever::new();
        mock.expect_retrieve()
            .withf(|url| url.contains("/ghost/"))
            .times(2)
            .returning(not_found);
        mock.expect_retrieve()
            .withf(|url| url.contains("/alive/"))
            .times(1)
            .returning(|_| Ok("github.com\n".to_string()));

        let mut session = Session::new();
        let mut ex = extractor(mock);
        let failed = ex.extract_all(&mut session, &["ghost", "alive"]);
        assert_eq!(failed, ["ghost"]);
        assert_eq!(session.domains(), ["github.com"]);

        let status = status_of(ex);
        let lines: Vec<&str> = status.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("ghost (ERROR) error"));
        assert!(lines[1].contains("alive (clean.list) done"));
    }

    #[test]
    fn test_load_whitelist() {
        let mut mock = MockRetriever::new();
        mock.expect_retrieve()
            .withf(|url| url == "http://google.com/whitelist/domains.list")
            .times(1)
            .returning(|_| Ok("google.com\ngithub.com\n".to_string()));

        let mut session = Session::new();
        let mut ex = extractor(mock);
        assert!(ex.load_whitelist(&mut session, "whitelist"));
        assert_eq!(
            session.whitelist.pattern(),
            r"^google\.com$|^www\.google\.com$|^github\.com$|^www\.github\.com$"
        );
        assert_eq!(status_of(ex), format!("Getting whitelist {}\n", DONE));
    }

    #[test]
    fn test_load_whitelist_failure() {
        let mut mock = MockRetriever::new();
        mock.expect_retrieve().returning(not_found);

        let mut session = Session::new();
        let mut ex = extractor(mock);
        assert!(!ex.load_whitelist(&mut session, "whitelist"));
        assert_eq!(session.whitelist.pattern(), "");
        assert!(!session.whitelist.is_active());
        assert_eq!(status_of(ex), format!("Getting whitelist {}\n", ERROR));
    }

    #[test]
    fn test_load_whitelist_file() {
        let mut fs = MockFileSystem::new();
        fs.expect_read_to_string()
            .withf(|p| p == Path::new("/etc/hostsfeed/whitelist.list"))
            .returning(|_| Ok("ALL github.com\n".to_string()));

        let mut session = Session::new();
        let mut ex = extractor(MockRetriever::new());
        assert!(ex.load_whitelist_file(&fs, &mut session, Path::new("/etc/hostsfeed/whitelist.list")));
        assert!(session.whitelist.is_whitelisted("api.github.com"));
        assert_eq!(status_of(ex), format!("Getting whitelist {}\n", DONE));
    }

    #[test]
    fn test_load_whitelist_file_missing() {
        let mut fs = MockFileSystem::new();
        fs.expect_read_to_string()
            .returning(|_| Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing")));

        let mut session = Session::new();
        let mut ex = extractor(MockRetriever::new());
        assert!(!ex.load_whitelist_file(&fs, &mut session, Path::new("/nope")));
        assert_eq!(status_of(ex), format!("Getting whitelist {}\n", ERROR));
    }

    #[test]
    fn test_whitelist_then_extract() {
        let mut mock = MockRetriever::new();
        mock.expect_retrieve()
            .withf(|url| url.ends_with("/whitelist/domains.list"))
            .returning(|_| Ok("google.com\nwww.facebook.com\nALL github.com\n".to_string()));
        mock.expect_retrieve()
            .withf(|url| url.ends_with("/feed/clean.list"))
            .returning(|_| {
                Ok("google.com\nwww.google.com\nfacebook.com\nwww.facebook.com\napi.github.com\ngithub.com\nads.example.com\n".to_string())
            });

        let mut session = Session::new();
        let mut ex = extractor(mock);
        ex.load_whitelist(&mut session, "whitelist");
        ex.extract(&mut session, "feed");
        assert_eq!(session.domains(), ["ads.example.com"]);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::Success(Variant::Clean).label(), "clean.list");
        assert_eq!(Outcome::Success(Variant::Raw).label(), "domain.list");
        assert_eq!(Variant::Raw.resource(), "domains.list");
        assert_eq!(Outcome::Failed.label(), "ERROR");
        assert_eq!(Outcome::Failed.token(), ERROR);
    }
}
