// ABOUTME: Per-site capability trait for locating result cards and reading their fields.
// ABOUTME: Each supported listing site provides one implementation; immobilier.ch is built in.

//! Site-specific markup knowledge.
//!
//! The pipeline is site-agnostic: it drives pagination and filtering, and asks
//! a `ListingSite` where the cards are on a page, what the raw field texts of
//! a card are, and what a detail page contains. Supporting another site means
//! adding another implementation of the trait.

pub mod immobilier;

use scraper::{ElementRef, Html};

use crate::diagnostics::{Diagnostics, Scope};
use crate::error::StructureError;
use crate::models::{Enrichment, RawListingRecord};

pub use immobilier::ImmobilierCh;

/// One search-result card inside a parsed page.
#[derive(Debug, Clone, Copy)]
pub struct ListingFragment<'a> {
    element: ElementRef<'a>,
    data_id: Option<i64>,
}

impl<'a> ListingFragment<'a> {
    pub fn new(element: ElementRef<'a>, data_id: Option<i64>) -> Self {
        Self { element, data_id }
    }

    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }

    /// The card's `data-id`, if present and numeric.
    pub fn data_id(&self) -> Option<i64> {
        self.data_id
    }
}

/// Markup knowledge for one listing site.
pub trait ListingSite {
    /// Short site name used in logs.
    fn name(&self) -> &str;

    /// Result cards on a search page, in document order.
    fn locate_listings<'a>(&self, page: &'a Html) -> Vec<ListingFragment<'a>>;

    /// Whether the page carries a pagination control at all.
    fn has_pagination(&self, page: &Html) -> bool;

    /// Total number of result pages, read from the pagination control.
    fn locate_page_count(&self, first_page: &Html) -> Result<u32, StructureError>;

    /// Raw field texts of one card.
    fn extract_primary(
        &self,
        fragment: &ListingFragment<'_>,
        scope: Scope,
        diags: &mut Diagnostics,
    ) -> RawListingRecord;

    /// Secondary fields of a parsed detail page.
    fn extract_enrichment(&self, detail: &Html, scope: Scope, diags: &mut Diagnostics)
        -> Enrichment;
}
