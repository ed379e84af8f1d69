// ABOUTME: Error types for the listing crawler.
// ABOUTME: Transport, structure, configuration, search-session and snapshot errors.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::profile::Category;

/// What went wrong while fetching a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// The HTTP client could not be constructed.
    Client,
    /// Connection, DNS, TLS or timeout failure.
    Request,
    /// The server answered with a non-2xx status.
    Status(u16),
    /// The response body could not be read.
    Body,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Client => write!(f, "client error"),
            TransportKind::Request => write!(f, "request error"),
            TransportKind::Status(code) => write!(f, "HTTP status {}", code),
            TransportKind::Body => write!(f, "body error"),
        }
    }
}

/// A document fetch failed (network or HTTP).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fetch {url}: {kind}: {message}")]
pub struct TransportError {
    pub url: String,
    pub kind: TransportKind,
    pub message: String,
}

impl TransportError {
    pub fn new(url: impl Into<String>, kind: TransportKind, message: impl fmt::Display) -> Self {
        Self {
            url: url.into(),
            kind,
            message: message.to_string(),
        }
    }

    /// Creates a non-2xx status error.
    pub fn status(url: impl Into<String>, code: u16) -> Self {
        Self::new(url, TransportKind::Status(code), "unexpected status")
    }

    /// Returns the HTTP status if the failure was a status error.
    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            TransportKind::Status(code) => Some(code),
            _ => None,
        }
    }
}

/// An expected markup element is absent or unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("markup structure: {element}: {detail}")]
pub struct StructureError {
    pub element: String,
    pub detail: String,
}

impl StructureError {
    pub fn new(element: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            detail: detail.into(),
        }
    }
}

/// Invalid search setup. Always raised before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown category '{0}': expected one of flat, industrial, commercial")]
    UnknownCategory(String),

    #[error("category '{0}' requires both min_rooms and max_rooms in the filter")]
    MissingRoomBounds(Category),

    #[error("room bounds must be finite numbers")]
    NonFiniteRoomBounds,

    #[error("invalid site origin '{0}'")]
    InvalidOrigin(String),
}

/// Errors that abort a whole search session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Page count could not be read from the first page.
    #[error("page count discovery failed: {0}")]
    Discovery(#[from] StructureError),
}

/// Errors while saving or loading a session snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O: {0}")]
    Io(#[from] io::Error),

    #[error("snapshot format: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display_includes_status() {
        let err = TransportError::status("https://example.com/a", 503);
        assert_eq!(err.status_code(), Some(503));
        assert!(err.to_string().contains("HTTP status 503"));
        assert!(err.to_string().contains("https://example.com/a"));
    }

    #[test]
    fn config_error_names_category() {
        let err = ConfigError::MissingRoomBounds(Category::Flat);
        assert!(err.to_string().contains("flat"));
    }
}
