// ABOUTME: immobilier.ch markup: result cards, pagination control and detail pages.
// ABOUTME: Missing blocks are recorded as diagnostics and leave the affected fields empty.

use scraper::Html;

use crate::diagnostics::{Diagnostics, Scope};
use crate::error::StructureError;
use crate::extract::{
    contact_lines, element_text, extract_first, find_all_by_class, find_all_by_tag,
    find_by_class, find_by_id, image_map, last_paragraph, paragraphs_text, FieldSelector,
};
use crate::models::{Contact, Enrichment, Field, RawListingRecord};
use crate::normalize::charges_from_rows;
use crate::site::{ListingFragment, ListingSite};

const CARD: &str = "filter-item";
const CARD_CONTAINER: &str = "filter-item-container";
const CONTENT_BLOCK: &str = "filter-item-content";
const CHARACTERISTIC_BLOCK: &str = "filter-item-characteristic";
const LINK_ID_PREFIX: &str = "link-result-item-";
const PAGINATION: &str = "pages";

const RENT: FieldSelector = FieldSelector::first("title");
const ROOMS: FieldSelector = FieldSelector::first("object-type");
const SIZE: FieldSelector = FieldSelector::first("space");

const DETAIL_MAIN_ID: &str = "main";
const CAROUSEL: &str = "im__banner__slider";
const DESCRIPTION_BODY: &str = "im__postContent__body";
const INFO_TABLE: &str = "im__assets__table";
const CONTACT_BLOCK: &str = "im__contact";

/// The immobilier.ch rental search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmobilierCh;

impl ImmobilierCh {
    pub fn new() -> Self {
        Self
    }
}

impl ListingSite for ImmobilierCh {
    fn name(&self) -> &str {
        "immobilier.ch"
    }

    fn locate_listings<'a>(&self, page: &'a Html) -> Vec<ListingFragment<'a>> {
        find_all_by_class(page.root_element(), CARD)
            .into_iter()
            .map(|card| {
                let data_id = card
                    .value()
                    .attr("data-id")
                    .and_then(|v| v.trim().parse::<i64>().ok());
                ListingFragment::new(card, data_id)
            })
            .collect()
    }

    fn has_pagination(&self, page: &Html) -> bool {
        pagination_list(page).is_some()
    }

    fn locate_page_count(&self, first_page: &Html) -> Result<u32, StructureError> {
        let list = pagination_list(first_page)
            .ok_or_else(|| StructureError::new("ul.pages", "pagination control not found"))?;

        let entries = find_all_by_tag(list, "li");
        if entries.is_empty() {
            return Err(StructureError::new("ul.pages li", "pagination has no entries"));
        }

        // Trailing "next" arrows carry no number; the last numeric label is the page count.
        entries
            .iter()
            .rev()
            .find_map(|li| element_text(*li).parse::<u32>().ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| StructureError::new("ul.pages li", "no numeric page label"))
    }

    fn extract_primary(
        &self,
        fragment: &ListingFragment<'_>,
        scope: Scope,
        diags: &mut Diagnostics,
    ) -> RawListingRecord {
        let id = fragment.data_id();
        let scope = scope.listing(id);
        let card = fragment.element();
        let container = find_by_class(card, CARD_CONTAINER).unwrap_or(card);

        let anchor = match id {
            Some(id) => find_by_id(container, &format!("{}{}", LINK_ID_PREFIX, id)),
            None => find_all_by_tag(container, "a").into_iter().find(|a| {
                a.value()
                    .id()
                    .is_some_and(|v| v.starts_with(LINK_ID_PREFIX))
            }),
        };
        let href = anchor.and_then(|a| a.value().attr("href")).map(str::to_string);

        let content = find_by_class(container, CONTENT_BLOCK);
        if content.is_none() {
            diags.structure(
                scope,
                &StructureError::new(CONTENT_BLOCK, "card has no content block"),
            );
        }
        let characteristics = find_by_class(container, CHARACTERISTIC_BLOCK);
        if characteristics.is_none() {
            diags.structure(
                scope,
                &StructureError::new(CHARACTERISTIC_BLOCK, "card has no characteristics block"),
            );
        }

        // No characteristics block means no rooms either, whatever the content block says.
        let rooms = characteristics.and_then(|_| extract_first(container, &ROOMS));

        RawListingRecord {
            id,
            href,
            rent: content.and_then(|c| extract_first(c, &RENT)),
            rooms,
            size: characteristics.and_then(|c| extract_first(c, &SIZE)),
            address: content.and_then(last_paragraph),
        }
    }

    fn extract_enrichment(
        &self,
        detail: &Html,
        scope: Scope,
        diags: &mut Diagnostics,
    ) -> Enrichment {
        let root = detail.root_element();
        let main = find_by_id(root, DETAIL_MAIN_ID).unwrap_or(root);
        let mut enrichment = Enrichment::default();

        match find_by_class(main, CAROUSEL) {
            Some(carousel) => enrichment.images = image_map(carousel),
            None => diags.missing(scope, Field::Images, "no image carousel on detail page"),
        }

        match find_by_class(main, DESCRIPTION_BODY) {
            Some(body) => enrichment.description = paragraphs_text(body),
            None => diags.missing(scope, Field::Description, "no description body on detail page"),
        }

        let rows = info_rows(main);
        match charges_from_rows(&rows) {
            Some(charges) => enrichment.charges = charges,
            None => diags.missing(scope, Field::Charges, "no charges row, defaulting to 0"),
        }

        match find_by_class(main, CONTACT_BLOCK) {
            Some(block) => {
                let (name, lines) = contact_lines(block);
                enrichment.contact = Contact {
                    company_name: name.unwrap_or_default(),
                    company_address: lines,
                };
            }
            None => diags.missing(scope, Field::Contact, "no contact block on detail page"),
        }

        enrichment
    }
}

fn pagination_list(page: &Html) -> Option<scraper::ElementRef<'_>> {
    find_all_by_class(page.root_element(), PAGINATION)
        .into_iter()
        .find(|el| el.value().name() == "ul")
}

/// Text lines of the detail page's info table: table rows, or list items.
fn info_rows(main: scraper::ElementRef<'_>) -> Vec<String> {
    let Some(table) = find_by_class(main, INFO_TABLE) else {
        return Vec::new();
    };
    let mut rows = find_all_by_tag(table, "tr");
    if rows.is_empty() {
        rows = find_all_by_tag(table, "li");
    }
    rows.into_iter()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}
