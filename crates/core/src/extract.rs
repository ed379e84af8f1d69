// ABOUTME: Class-name based field lookups over scraper element trees.
// ABOUTME: Lookups return None when nothing matches; they never fail.

//! Field extraction utilities.
//!
//! Elements are addressed by exact class-token match (`class="a b"` matches
//! both `a` and `b`), by id, or by tag name. Only descendants of the given
//! root are searched, never the root itself.
//!
//! Key behaviors:
//! - `FieldSelector::first` returns the first match in document order.
//! - `FieldSelector::all` returns every match in document order.
//! - Text is whitespace-normalized; an element with no text yields `""`,
//!   which is distinct from no element at all (`None`).

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Node, Selector};

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));
static IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("valid selector"));
static STRONG: Lazy<Selector> =
    Lazy::new(|| Selector::parse("strong, b").expect("valid selector"));

/// Attributes holding an image URL, most specific first.
const IMAGE_URL_ATTRS: &[&str] = &["data-lazy", "data-src", "src"];

/// Addresses an element by class name, first match or all matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelector {
    pub class: &'static str,
    pub multiple: bool,
}

impl FieldSelector {
    pub const fn first(class: &'static str) -> Self {
        Self {
            class,
            multiple: false,
        }
    }

    pub const fn all(class: &'static str) -> Self {
        Self {
            class,
            multiple: true,
        }
    }
}

/// Collapses runs of whitespace into single spaces and trims.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized text content of an element.
pub fn element_text(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

fn has_class(el: &ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn descendant_elements<'a>(root: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    root.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// First descendant carrying `class`.
pub fn find_by_class<'a>(root: ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    descendant_elements(root).find(|el| has_class(el, class))
}

/// All descendants carrying `class`, in document order.
pub fn find_all_by_class<'a>(root: ElementRef<'a>, class: &str) -> Vec<ElementRef<'a>> {
    descendant_elements(root)
        .filter(|el| has_class(el, class))
        .collect()
}

/// First descendant whose `id` attribute equals `id`.
pub fn find_by_id<'a>(root: ElementRef<'a>, id: &str) -> Option<ElementRef<'a>> {
    descendant_elements(root).find(|el| el.value().id() == Some(id))
}

/// All descendants with the given tag name, in document order.
pub fn find_all_by_tag<'a>(root: ElementRef<'a>, tag: &str) -> Vec<ElementRef<'a>> {
    descendant_elements(root)
        .filter(|el| el.value().name().eq_ignore_ascii_case(tag))
        .collect()
}

/// Extracts the text of the element(s) addressed by `selector`.
///
/// Returns `None` when no element matches. With a `first` selector the vec
/// holds exactly one value.
pub fn extract(root: ElementRef<'_>, selector: &FieldSelector) -> Option<Vec<String>> {
    if selector.multiple {
        let values: Vec<String> = find_all_by_class(root, selector.class)
            .into_iter()
            .map(element_text)
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values)
        }
    } else {
        find_by_class(root, selector.class).map(|el| vec![element_text(el)])
    }
}

/// Convenience wrapper returning only the first extracted value.
pub fn extract_first(root: ElementRef<'_>, selector: &FieldSelector) -> Option<String> {
    extract(root, selector).and_then(|v| v.into_iter().next())
}

/// Text of the last paragraph under `block`, where listing cards keep the address.
pub fn last_paragraph(block: ElementRef<'_>) -> Option<String> {
    block.select(&PARAGRAPH).last().map(element_text)
}

/// Paragraph texts under `body` joined with newlines. Empty paragraphs are skipped.
pub fn paragraphs_text(body: ElementRef<'_>) -> String {
    body.select(&PARAGRAPH)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pairs each image's alt label with its lazy-load URL.
///
/// Images without any URL attribute are skipped. Unlabelled images get a
/// positional `image-{n}` label. Duplicate labels keep the last URL.
pub fn image_map(container: ElementRef<'_>) -> BTreeMap<String, String> {
    let mut images = BTreeMap::new();
    for (idx, img) in container.select(&IMAGE).enumerate() {
        let url = IMAGE_URL_ATTRS
            .iter()
            .filter_map(|attr| img.value().attr(attr))
            .map(str::trim)
            .find(|v| !v.is_empty());
        let Some(url) = url else {
            continue;
        };
        let label = img
            .value()
            .attr("alt")
            .map(normalize_whitespace)
            .filter(|alt| !alt.is_empty())
            .unwrap_or_else(|| format!("image-{}", idx + 1));
        images.insert(label, url.to_string());
    }
    images
}

/// Splits a contact block into its emphasized name and remaining text lines.
///
/// The first `<strong>`/`<b>` run is the name. Every other non-empty text
/// node, in document order, becomes one address line.
pub fn contact_lines(block: ElementRef<'_>) -> (Option<String>, Vec<String>) {
    let name_el = block.select(&STRONG).next();
    let name = name_el.map(element_text).filter(|n| !n.is_empty());
    let name_id = name_el.map(|el| el.id());

    let mut lines = Vec::new();
    for node in block.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        if let Some(name_id) = name_id {
            if node.ancestors().any(|a| a.id() == name_id) {
                continue;
            }
        }
        let line = normalize_whitespace(text);
        if !line.is_empty() {
            lines.push(line);
        }
    }
    (name, lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scraper::Html;

    const SAMPLE_HTML: &str = r#"
        <html><body>
        <div class="card featured" id="root">
            <span class="title">  CHF 1'450.-/mois </span>
            <span class="tag">A</span>
            <span class="tag">B</span>
            <span class="empty"></span>
            <div class="filter-item-content-extra">not a match for content</div>
            <a id="link-result-item-7" href="/fr/louer/7">Voir</a>
            <div class="body">
                <p>Premier paragraphe.</p>
                <p>   </p>
                <p>Rue du Mont-Blanc 12, 1201 Genève</p>
            </div>
        </div>
        </body></html>
    "#;

    fn with_root<T>(html: &str, f: impl FnOnce(ElementRef<'_>) -> T) -> T {
        let doc = Html::parse_document(html);
        f(doc.root_element())
    }

    #[test]
    fn first_selector_returns_normalized_text() {
        with_root(SAMPLE_HTML, |root| {
            let got = extract_first(root, &FieldSelector::first("title"));
            assert_eq!(got, Some("CHF 1'450.-/mois".to_string()));
        });
    }

    #[test]
    fn all_selector_returns_every_match_in_order() {
        with_root(SAMPLE_HTML, |root| {
            let got = extract(root, &FieldSelector::all("tag"));
            assert_eq!(got, Some(vec!["A".to_string(), "B".to_string()]));
        });
    }

    #[test]
    fn missing_class_is_none_and_empty_element_is_empty_string() {
        with_root(SAMPLE_HTML, |root| {
            assert_eq!(extract(root, &FieldSelector::first("nope")), None);
            assert_eq!(extract(root, &FieldSelector::all("nope")), None);
            assert_eq!(
                extract_first(root, &FieldSelector::first("empty")),
                Some(String::new())
            );
        });
    }

    #[test]
    fn class_match_is_exact_token() {
        with_root(SAMPLE_HTML, |root| {
            assert!(find_by_class(root, "featured").is_some());
            assert!(find_by_class(root, "filter-item-content").is_none());
            assert!(find_by_class(root, "feat").is_none());
        });
    }

    #[test]
    fn find_by_id_and_tag() {
        with_root(SAMPLE_HTML, |root| {
            let link = find_by_id(root, "link-result-item-7").unwrap();
            assert_eq!(link.value().attr("href"), Some("/fr/louer/7"));
            assert_eq!(find_all_by_tag(root, "P").len(), 3);
        });
    }

    #[test]
    fn last_paragraph_and_joined_paragraphs() {
        with_root(SAMPLE_HTML, |root| {
            let body = find_by_class(root, "body").unwrap();
            assert_eq!(
                last_paragraph(body),
                Some("Rue du Mont-Blanc 12, 1201 Genève".to_string())
            );
            assert_eq!(
                paragraphs_text(body),
                "Premier paragraphe.\nRue du Mont-Blanc 12, 1201 Genève"
            );
            let title = find_by_class(root, "title").unwrap();
            assert_eq!(last_paragraph(title), None);
        });
    }

    #[test]
    fn image_map_pairs_alt_with_lazy_url() {
        let html = r#"<div class="slider">
            <img alt="Salon" data-lazy="https://img/salon.jpg" src="placeholder.gif">
            <img alt="Cuisine" data-lazy="https://img/cuisine.jpg">
            <img alt="Salon" data-lazy="https://img/salon-2.jpg">
            <img src="https://img/plain.jpg">
            <img alt="No url">
        </div>"#;
        with_root(html, |root| {
            let slider = find_by_class(root, "slider").unwrap();
            let images = image_map(slider);
            assert_eq!(images.len(), 3);
            assert_eq!(images["Salon"], "https://img/salon-2.jpg");
            assert_eq!(images["Cuisine"], "https://img/cuisine.jpg");
            assert_eq!(images["image-4"], "https://img/plain.jpg");
        });
    }

    #[test]
    fn contact_lines_split_name_and_address() {
        let html = r#"<div class="contact">
            <strong> Régie  Immo SA </strong><br>
            Rue du Rhône 1<br>
            <span>1204 Genève</span>
            <strong>Second</strong>
        </div>"#;
        with_root(html, |root| {
            let block = find_by_class(root, "contact").unwrap();
            let (name, lines) = contact_lines(block);
            assert_eq!(name, Some("Régie Immo SA".to_string()));
            assert_eq!(lines, vec!["Rue du Rhône 1", "1204 Genève", "Second"]);
        });
    }

    #[test]
    fn contact_lines_without_emphasis() {
        let html = r#"<div class="contact">Line one<br>Line two</div>"#;
        with_root(html, |root| {
            let block = find_by_class(root, "contact").unwrap();
            let (name, lines) = contact_lines(block);
            assert_eq!(name, None);
            assert_eq!(lines, vec!["Line one", "Line two"]);
        });
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  hello   world  "), "hello world");
        assert_eq!(normalize_whitespace("no\textra\nspaces"), "no extra spaces");
        assert_eq!(normalize_whitespace(""), "");
    }
}
