// ABOUTME: Typed normalization of raw listing text into numeric and string fields.
// ABOUTME: Unparseable or absent values fall back to documented defaults and are recorded.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::{Diagnostics, Scope};
use crate::models::{Field, PrimaryFields, RawListingRecord};
use crate::profile::SearchProfile;

/// First run of digits, optionally followed by a decimal point and one decimal digit.
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.?\d?").expect("valid regex"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Swiss thousand separators: apostrophes and (narrow) no-break spaces.
const THOUSAND_SEPARATORS: &[char] = &['\'', '\u{2019}', '\u{a0}', '\u{202f}'];
/// Extra punctuation seen inside rent amounts.
const RENT_PUNCTUATION: &[char] = &['\u{2018}', '\u{b4}', '`'];

/// Labels of the info row holding monthly charges.
const CHARGES_LABELS: &[&str] = &["charges", "frais accessoires", "nebenkosten"];

fn strip_separators(text: &str) -> String {
    text.chars()
        .filter(|c| !THOUSAND_SEPARATORS.contains(c))
        .collect()
}

/// Parses the first decimal number (one fractional digit at most) in `text`.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let cleaned = strip_separators(text);
    let found = NUMBER.find(&cleaned)?;
    found.as_str().trim_end_matches('.').parse::<f64>().ok()
}

/// Parses the first number in `text`, truncated to whole units.
pub fn parse_whole(text: &str) -> Option<u32> {
    parse_decimal(text).map(|v| v.trunc() as u32)
}

/// Parses a rent amount such as `CHF 1'450.-/mois` or `CHF 1 450.-`.
pub fn parse_rent(text: &str) -> Option<u32> {
    let cleaned: String = text
        .chars()
        .filter(|c| !RENT_PUNCTUATION.contains(c))
        .collect();
    parse_whole(&join_spaced_digits(&cleaned))
}

/// Drops plain spaces sitting between two digits (`1 450` becomes `1450`).
///
/// Only rent gets this: room and size labels put a space between unrelated
/// numbers, e.g. `3 pièces 2 salles d'eau`.
fn join_spaced_digits(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            let between_digits = **c == ' '
                && *i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            !between_digits
        })
        .map(|(_, c)| *c)
        .collect()
}

/// Parses a room count such as `4.5 pièces`.
pub fn parse_rooms(text: &str) -> Option<f64> {
    parse_decimal(text)
}

/// Scans info rows for a charges line and returns its first digit run.
///
/// A row counts only when it opens with a charges label, so rent rows such
/// as `Loyer charges comprises` are skipped. Returns `None` when no row
/// qualifies or the labelled rows carry no digits.
pub fn charges_from_rows<S: AsRef<str>>(rows: &[S]) -> Option<u32> {
    rows.iter().find_map(|row| {
        let row = strip_separators(row.as_ref());
        let lower = row.trim_start().to_lowercase();
        let label = CHARGES_LABELS.iter().find(|label| lower.starts_with(*label))?;
        let rest = lower.get(label.len()..)?;
        DIGITS.find(rest).and_then(|m| m.as_str().parse::<u32>().ok())
    })
}

/// Normalizes the numeric `raw` value, recording a diagnostic on fallback.
fn number_or_default<T: Default>(
    raw: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
    field: Field,
    scope: Scope,
    diags: &mut Diagnostics,
) -> T {
    match raw {
        None => {
            diags.missing(scope, field, format!("no {} element, defaulting to 0", field));
            T::default()
        }
        Some(text) => match parse(text) {
            Some(value) => value,
            None => {
                diags.missing(
                    scope,
                    field,
                    format!("unparseable {} '{}', defaulting to 0", field, text),
                );
                T::default()
            }
        },
    }
}

/// Turns a raw card record into typed primary fields.
///
/// Numeric fields are skipped (left at their default, with no diagnostic)
/// for categories that do not carry them, so industrial and commercial
/// cards without a room count are not reported.
pub fn normalize_primary(
    raw: &RawListingRecord,
    profile: &SearchProfile,
    scope: Scope,
    diags: &mut Diagnostics,
) -> PrimaryFields {
    let scope = scope.listing(raw.id);

    if raw.id.is_none() {
        diags.missing(scope, Field::Id, "card has no usable data-id");
    }

    let link = match raw.href.as_deref() {
        Some(href) => profile.resolve_link(href).unwrap_or_else(|| {
            diags.missing(scope, Field::Link, format!("unresolvable link '{}'", href));
            String::new()
        }),
        None => {
            diags.missing(scope, Field::Link, "no detail link on card");
            String::new()
        }
    };

    let rent = number_or_default(raw.rent.as_deref(), parse_rent, Field::Rent, scope, diags);
    let rooms = if profile.category().has_rooms() || raw.rooms.is_some() {
        number_or_default(raw.rooms.as_deref(), parse_rooms, Field::Rooms, scope, diags)
    } else {
        0.0
    };
    let size = number_or_default(raw.size.as_deref(), parse_whole, Field::Size, scope, diags);

    let address = match raw.address.as_deref() {
        Some(address) => address.to_string(),
        None => {
            diags.missing(scope, Field::Address, "no address paragraph");
            String::new()
        }
    };

    PrimaryFields {
        id: raw.id,
        link,
        rent,
        rooms,
        size,
        address,
    }
}
