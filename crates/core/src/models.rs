// ABOUTME: Record types flowing through the crawler: raw extraction, enrichment and final listings.
// ABOUTME: NormalizedListing is the output unit; numeric fields are always populated.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Listing attributes that extraction can fail on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Id,
    Link,
    Rent,
    Rooms,
    Size,
    Charges,
    Address,
    Images,
    Description,
    Contact,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::Id => "id",
            Field::Link => "link",
            Field::Rent => "rent",
            Field::Rooms => "rooms",
            Field::Size => "size",
            Field::Charges => "charges",
            Field::Address => "address",
            Field::Images => "images",
            Field::Description => "description",
            Field::Contact => "contact",
        };
        write!(f, "{}", s)
    }
}

/// Agency or landlord block of a detail page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub company_name: String,
    pub company_address: Vec<String>,
}

/// Text pulled from one result card, before typed normalization.
/// `None` marks a field whose source element was not found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListingRecord {
    pub id: Option<i64>,
    pub href: Option<String>,
    pub rent: Option<String>,
    pub rooms: Option<String>,
    pub size: Option<String>,
    pub address: Option<String>,
}

/// Secondary fields read from a listing's detail page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub images: BTreeMap<String, String>,
    pub description: String,
    pub charges: u32,
    pub contact: Contact,
}

/// Primary fields after normalization, used for pre-filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimaryFields {
    pub id: Option<i64>,
    pub link: String,
    pub rent: u32,
    pub rooms: f64,
    pub size: u32,
    pub address: String,
}

/// Final, typed listing record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedListing {
    pub id: Option<i64>,
    pub link: String,
    pub rent: u32,
    pub rooms: f64,
    pub size: u32,
    pub charges: u32,
    pub address: String,
    pub images: BTreeMap<String, String>,
    pub description: String,
    pub contact: Contact,
}

impl NormalizedListing {
    /// Assembles a listing from its primary fields and detail-page enrichment.
    pub fn assemble(primary: PrimaryFields, enrichment: Enrichment) -> Self {
        Self {
            id: primary.id,
            link: primary.link,
            rent: primary.rent,
            rooms: primary.rooms,
            size: primary.size,
            charges: enrichment.charges,
            address: primary.address,
            images: enrichment.images,
            description: enrichment.description,
            contact: enrichment.contact,
        }
    }
}
