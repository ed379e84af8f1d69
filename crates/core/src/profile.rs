// ABOUTME: Search profiles mapping a listing category to its search URL scheme.
// ABOUTME: Builds page URLs as {base_url}page-{n}{params} and resolves detail links.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Origin of the immobilier.ch site.
pub const DEFAULT_ORIGIN: &str = "https://www.immobilier.ch";

/// Listing category a search is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Flat,
    Industrial,
    Commercial,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Flat, Category::Industrial, Category::Commercial];

    /// Whether listings of this category carry a room count that filters apply to.
    pub fn has_rooms(self) -> bool {
        matches!(self, Category::Flat)
    }

    fn path(self) -> &'static str {
        match self {
            Category::Flat => "/fr/carte/louer/appartement-maison/geneve/",
            Category::Industrial => "/fr/carte/louer/industriel/geneve/",
            Category::Commercial => "/fr/carte/louer/commercial/geneve/",
        }
    }

    fn params(self) -> &'static str {
        match self {
            Category::Flat => "?t=rent&c=1;2&p=s40&nb=false&gr=1",
            Category::Industrial => "?t=rent&c=7&p=s40&nb=false&gr=2",
            Category::Commercial => "?t=rent&c=4&p=s40&nb=false",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Flat => "flat",
            Category::Industrial => "industrial",
            Category::Commercial => "commercial",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Category {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flat" | "flats" => Ok(Category::Flat),
            "industrial" => Ok(Category::Industrial),
            "commercial" => Ok(Category::Commercial),
            _ => Err(ConfigError::UnknownCategory(s.to_string())),
        }
    }
}

/// Immutable search configuration: one category, one base URL + params pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchProfile {
    category: Category,
    origin: String,
    base_url: String,
    params: String,
}

impl SearchProfile {
    /// Profile for the category on the live site.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            origin: DEFAULT_ORIGIN.to_string(),
            base_url: format!("{}{}", DEFAULT_ORIGIN, category.path()),
            params: category.params().to_string(),
        }
    }

    /// Re-roots the category's path and params on another origin (mirror, local server).
    pub fn with_origin(self, origin: &str) -> Result<Self, ConfigError> {
        let parsed =
            Url::parse(origin).map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))?;
        if parsed.host_str().is_none() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidOrigin(origin.to_string()));
        }
        let origin = origin.trim_end_matches('/').to_string();
        Ok(Self {
            base_url: format!("{}{}", origin, self.category.path()),
            origin,
            ..self
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn params(&self) -> &str {
        &self.params
    }

    /// URL of the n-th results page (1-based).
    pub fn page_url(&self, page: u32) -> String {
        format!("{}page-{}{}", self.base_url, page, self.params)
    }

    /// Resolves a relative detail href against the site origin.
    /// Returns `None` for empty or unresolvable hrefs.
    pub fn resolve_link(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        if href.starts_with("http://") || href.starts_with("https://") {
            return Some(href.to_string());
        }
        let base = Url::parse(&self.origin).ok()?;
        base.join(href).ok().map(|u| u.to_string())
    }
}
