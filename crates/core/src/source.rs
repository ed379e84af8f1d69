// ABOUTME: Document sources: the blocking HTTP fetcher and an in-memory page store.
// ABOUTME: Non-2xx statuses and connection failures surface as TransportError.

use std::cell::RefCell;
use std::collections::HashMap;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use scraper::Html;

use crate::error::{TransportError, TransportKind};
use crate::options::{HttpSourceBuilder, SourceOptions};

/// Anything that can turn a URL into a parsed document.
pub trait DocumentSource {
    fn fetch(&self, url: &str) -> Result<Html, TransportError>;
}

impl<S: DocumentSource + ?Sized> DocumentSource for &S {
    fn fetch(&self, url: &str) -> Result<Html, TransportError> {
        (**self).fetch(url)
    }
}

/// Fetches pages over HTTP with a browser User-Agent.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn builder() -> HttpSourceBuilder {
        HttpSourceBuilder::new()
    }

    pub fn new(opts: SourceOptions) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        for (key, value) in &opts.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| TransportError::new("", TransportKind::Client, e))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::new("", TransportKind::Client, e))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .user_agent(&opts.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .deflate(true);
        if let Some(timeout) = opts.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::new("", TransportKind::Client, e))?;
        Ok(Self { client })
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<Html, TransportError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| TransportError::new(url, TransportKind::Request, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::status(url, status.as_u16()));
        }

        let body = resp
            .text()
            .map_err(|e| TransportError::new(url, TransportKind::Body, e))?;
        tracing::debug!(url, bytes = body.len(), "fetched document");
        Ok(Html::parse_document(&body))
    }
}

/// Serves pre-loaded HTML keyed by exact URL. Unknown URLs answer 404.
#[derive(Debug, Default)]
pub struct MemorySource {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.insert(url.into(), html.into());
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.insert(url, html);
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// How many times `url` was requested.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|u| *u == url).count()
    }
}

impl DocumentSource for MemorySource {
    fn fetch(&self, url: &str) -> Result<Html, TransportError> {
        self.requests.borrow_mut().push(url.to_string());
        match self.pages.get(url) {
            Some(html) => Ok(Html::parse_document(html)),
            None => Err(TransportError::status(url, 404)),
        }
    }
}
