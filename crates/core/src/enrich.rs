// ABOUTME: Detail-page enrichment: fetches a listing's own page and reads secondary fields.
// ABOUTME: Empty links and failed fetches yield an all-defaults enrichment, never an error.

use crate::diagnostics::{Diagnostics, Scope};
use crate::models::Enrichment;
use crate::site::ListingSite;
use crate::source::DocumentSource;

/// Fetches `link` and extracts images, description, charges and contact.
///
/// Failures impoverish this one record only: the fetch error is recorded
/// and `Enrichment::default()` is returned.
pub fn enrich<S, W>(
    source: &S,
    site: &W,
    link: &str,
    scope: Scope,
    diags: &mut Diagnostics,
) -> Enrichment
where
    S: DocumentSource + ?Sized,
    W: ListingSite + ?Sized,
{
    if link.is_empty() {
        tracing::debug!(listing = scope.listing_id, "no detail link, skipping enrichment");
        return Enrichment::default();
    }

    match source.fetch(link) {
        Ok(detail) => site.extract_enrichment(&detail, scope, diags),
        Err(err) => {
            diags.transport(scope, &err);
            Enrichment::default()
        }
    }
}
