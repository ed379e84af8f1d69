// ABOUTME: Session-scoped diagnostics collector for recoverable extraction and fetch problems.
// ABOUTME: Each recorded entry is also emitted as a tracing event.

use std::fmt;

use serde::Serialize;

use crate::error::{StructureError, TransportError};
use crate::models::Field;

/// Category of a recorded problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "field")]
pub enum DiagnosticKind {
    /// A field's source element was absent or unparseable; the default was used.
    MissingField(Field),
    /// A page or detail fetch failed.
    Transport,
    /// An expected markup block was absent.
    Structure,
}

/// One recorded problem, located by page and listing where known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub page: Option<u32>,
    pub listing_id: Option<i64>,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(page) = self.page {
            write!(f, "[page {}] ", page)?;
        }
        if let Some(id) = self.listing_id {
            write!(f, "[listing {}] ", id)?;
        }
        write!(f, "{}", self.message)
    }
}

/// Where in the crawl a diagnostic originates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scope {
    pub page: Option<u32>,
    pub listing_id: Option<i64>,
}

impl Scope {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            listing_id: None,
        }
    }

    pub fn listing(self, listing_id: Option<i64>) -> Self {
        Self { listing_id, ..self }
    }
}

/// Accumulated diagnostics for one search session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        match diagnostic.kind {
            DiagnosticKind::Transport => tracing::error!(
                page = diagnostic.page,
                listing = diagnostic.listing_id,
                "{}",
                diagnostic.message
            ),
            _ => tracing::warn!(
                page = diagnostic.page,
                listing = diagnostic.listing_id,
                "{}",
                diagnostic.message
            ),
        }
        self.entries.push(diagnostic);
    }

    /// Records that `field` fell back to its default.
    pub fn missing(&mut self, scope: Scope, field: Field, message: impl Into<String>) {
        self.record(Diagnostic {
            page: scope.page,
            listing_id: scope.listing_id,
            kind: DiagnosticKind::MissingField(field),
            message: message.into(),
        });
    }

    pub fn transport(&mut self, scope: Scope, err: &TransportError) {
        self.record(Diagnostic {
            page: scope.page,
            listing_id: scope.listing_id,
            kind: DiagnosticKind::Transport,
            message: err.to_string(),
        });
    }

    pub fn structure(&mut self, scope: Scope, err: &StructureError) {
        self.record(Diagnostic {
            page: scope.page,
            listing_id: scope.listing_id,
            kind: DiagnosticKind::Structure,
            message: err.to_string(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Entries concerning one listing.
    pub fn for_listing(&self, listing_id: i64) -> Vec<&Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.listing_id == Some(listing_id))
            .collect()
    }
}
