// ABOUTME: Configuration for document fetching and search sessions.
// ABOUTME: HttpSourceBuilder provides a fluent API for constructing HttpSource instances.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::TransportError;
use crate::source::HttpSource;

/// Desktop browser User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/50.0.2661.102 Safari/537.36";

/// Transport settings for `HttpSource`.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    pub user_agent: String,
    /// `None` keeps the HTTP client's own default.
    pub timeout: Option<Duration>,
    pub headers: HashMap<String, String>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            headers: HashMap::new(),
        }
    }
}

/// Builder for `HttpSource`.
#[derive(Debug, Clone, Default)]
pub struct HttpSourceBuilder {
    opts: SourceOptions,
}

impl HttpSourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = Some(timeout);
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<HttpSource, TransportError> {
        HttpSource::new(self.opts)
    }
}

/// Per-session crawl options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Crawl exactly this many pages instead of the discovered count.
    pub page_limit: Option<u32>,
    /// Skip detail-page enrichment for listings whose primary fields fail the filter.
    pub prefilter: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            page_limit: None,
            prefilter: true,
        }
    }
}

impl SearchOptions {
    pub fn with_page_limit(mut self, pages: u32) -> Self {
        self.page_limit = Some(pages);
        self
    }

    pub fn with_prefilter(mut self, prefilter: bool) -> Self {
        self.prefilter = prefilter;
        self
    }
}
