// ABOUTME: Search session orchestration: pagination, per-listing extraction, filtering and enrichment.
// ABOUTME: Page and listing failures are recorded and skipped; only setup and page-count discovery abort.

use scraper::Html;

use crate::diagnostics::{Diagnostics, Scope};
use crate::enrich::enrich;
use crate::error::{SearchError, StructureError};
use crate::filter::{matches, FilterCriteria};
use crate::models::NormalizedListing;
use crate::normalize::normalize_primary;
use crate::options::SearchOptions;
use crate::profile::SearchProfile;
use crate::site::{ImmobilierCh, ListingSite};
use crate::source::DocumentSource;

/// Result of one search session.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Surviving listings in page-then-card order.
    pub listings: Vec<NormalizedListing>,
    /// Everything that was defaulted, skipped or failed along the way.
    pub diagnostics: Diagnostics,
    /// Result pages that were fetched and processed.
    pub pages_processed: u32,
}

/// Outcome of reading the first page when no page limit is given.
enum Discovery {
    /// Crawl this many pages; the first one is already parsed.
    Pages(u32, Html),
    /// Nothing to crawl.
    Empty,
}

/// Drives one site's paginated search through a document source.
pub struct Pipeline<S, W = ImmobilierCh> {
    source: S,
    site: W,
    options: SearchOptions,
}

impl<S: DocumentSource> Pipeline<S, ImmobilierCh> {
    /// Pipeline for immobilier.ch.
    pub fn new(source: S) -> Self {
        Self::with_site(source, ImmobilierCh)
    }
}

impl<S: DocumentSource, W: ListingSite> Pipeline<S, W> {
    pub fn with_site(source: S, site: W) -> Self {
        Self {
            source,
            site,
            options: SearchOptions::default(),
        }
    }

    pub fn options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs a full search session.
    ///
    /// Filter bounds are validated before any request is made. Without a
    /// page limit, the first page is fetched to discover the page count and
    /// then processed as page 1.
    pub fn search(
        &self,
        profile: &SearchProfile,
        filter: Option<&FilterCriteria>,
    ) -> Result<SearchOutcome, SearchError> {
        let category = profile.category();
        if let Some(filter) = filter {
            filter.validate(category)?;
        }
        let criteria = filter.map(|f| f.for_category(category));

        let mut outcome = SearchOutcome::default();

        let (page_count, mut first_page) = match self.options.page_limit {
            Some(limit) => (limit, None),
            None => match self.discover(profile, &mut outcome.diagnostics)? {
                Discovery::Pages(count, doc) => (count, Some(doc)),
                Discovery::Empty => return Ok(outcome),
            },
        };

        tracing::info!(
            site = self.site.name(),
            category = %category,
            pages = page_count,
            "crawling search pages"
        );

        for page in 1..=page_count {
            let preloaded = if page == 1 { first_page.take() } else { None };
            let doc = match preloaded {
                Some(doc) => doc,
                None => match self.source.fetch(&profile.page_url(page)) {
                    Ok(doc) => doc,
                    Err(err) => {
                        outcome.diagnostics.transport(Scope::page(page), &err);
                        continue;
                    }
                },
            };

            let before = outcome.listings.len();
            self.process_page(page, &doc, profile, criteria.as_ref(), &mut outcome);
            outcome.pages_processed += 1;
            tracing::info!(
                page,
                kept = outcome.listings.len() - before,
                total = outcome.listings.len(),
                "page processed"
            );
        }

        tracing::info!(
            listings = outcome.listings.len(),
            diagnostics = outcome.diagnostics.len(),
            "search finished"
        );
        Ok(outcome)
    }

    /// Reads the page count from page 1.
    ///
    /// A first page without cards ends the search. A first page with cards
    /// but no pagination control is a single-page result. A pagination
    /// control that cannot be read aborts the session.
    fn discover(
        &self,
        profile: &SearchProfile,
        diags: &mut Diagnostics,
    ) -> Result<Discovery, SearchError> {
        let url = profile.page_url(1);
        tracing::info!(url = %url, "discovering page count");

        let doc = match self.source.fetch(&url) {
            Ok(doc) => doc,
            Err(err) => {
                diags.transport(Scope::page(1), &err);
                return Ok(Discovery::Empty);
            }
        };

        if self.site.locate_listings(&doc).is_empty() {
            tracing::info!("first page has no listings");
            return Ok(Discovery::Empty);
        }

        if !self.site.has_pagination(&doc) {
            tracing::info!("no pagination control, treating as a single page");
            return Ok(Discovery::Pages(1, doc));
        }

        let count = self.site.locate_page_count(&doc)?;
        tracing::info!(pages = count, "page count discovered");
        Ok(Discovery::Pages(count, doc))
    }

    fn process_page(
        &self,
        page: u32,
        doc: &Html,
        profile: &SearchProfile,
        criteria: Option<&FilterCriteria>,
        outcome: &mut SearchOutcome,
    ) {
        let page_scope = Scope::page(page);
        let diags = &mut outcome.diagnostics;

        let fragments = self.site.locate_listings(doc);
        if fragments.is_empty() {
            diags.structure(
                page_scope,
                &StructureError::new("listing cards", "no listings found on page"),
            );
            return;
        }

        for fragment in &fragments {
            let scope = page_scope.listing(fragment.data_id());
            let raw = self.site.extract_primary(fragment, page_scope, diags);
            let primary = normalize_primary(&raw, profile, page_scope, diags);

            if self.options.prefilter {
                if let Some(criteria) = criteria {
                    if !matches(&primary, criteria) {
                        tracing::debug!(
                            listing = primary.id,
                            rent = primary.rent,
                            rooms = primary.rooms,
                            size = primary.size,
                            "rejected before enrichment"
                        );
                        continue;
                    }
                }
            }

            let enrichment = enrich(&self.source, &self.site, &primary.link, scope, diags);
            let listing = NormalizedListing::assemble(primary, enrichment);

            if criteria.map_or(true, |c| matches(&listing, c)) {
                tracing::debug!(listing = listing.id, "listing kept");
                outcome.listings.push(listing);
            }
        }
    }
}

/// Runs a search against immobilier.ch through `source`.
///
/// `page_limit` overrides the discovered page count when given.
pub fn search<S: DocumentSource>(
    source: S,
    profile: &SearchProfile,
    filter: Option<&FilterCriteria>,
    page_limit: Option<u32>,
) -> Result<SearchOutcome, SearchError> {
    let options = SearchOptions {
        page_limit,
        ..SearchOptions::default()
    };
    Pipeline::new(source).options(options).search(profile, filter)
}
