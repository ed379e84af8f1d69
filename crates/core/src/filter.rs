// ABOUTME: Inclusive range filtering on rent, size and room count.
// ABOUTME: Pure and deterministic; applies to primary fields and to finished listings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::{NormalizedListing, PrimaryFields};
use crate::profile::Category;

/// Inclusive bounds a listing must fall within.
///
/// Room bounds are optional so that categories without a room concept can
/// omit them; `validate` rejects a room-filtering category without them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub min_rent: u32,
    pub max_rent: u32,
    pub min_size: u32,
    pub max_size: u32,
    pub min_rooms: Option<f64>,
    pub max_rooms: Option<f64>,
}

impl FilterCriteria {
    /// Rent and size bounds, no room bounds.
    pub fn new(min_rent: u32, max_rent: u32, min_size: u32, max_size: u32) -> Self {
        Self {
            min_rent,
            max_rent,
            min_size,
            max_size,
            min_rooms: None,
            max_rooms: None,
        }
    }

    pub fn with_rooms(mut self, min_rooms: f64, max_rooms: f64) -> Self {
        self.min_rooms = Some(min_rooms);
        self.max_rooms = Some(max_rooms);
        self
    }

    /// Checks that `category` gets every bound it filters on, and that room
    /// bounds are real numbers.
    pub fn validate(&self, category: Category) -> Result<(), ConfigError> {
        let room_bounds = [self.min_rooms, self.max_rooms];
        if room_bounds.iter().flatten().any(|bound| !bound.is_finite()) {
            return Err(ConfigError::NonFiniteRoomBounds);
        }
        if category.has_rooms() && (self.min_rooms.is_none() || self.max_rooms.is_none()) {
            return Err(ConfigError::MissingRoomBounds(category));
        }
        Ok(())
    }

    /// Drops room bounds for categories without a room concept.
    pub fn for_category(self, category: Category) -> Self {
        if category.has_rooms() {
            self
        } else {
            Self {
                min_rooms: None,
                max_rooms: None,
                ..self
            }
        }
    }
}

/// Numeric view of a record for filtering.
pub trait Filterable {
    fn rent(&self) -> u32;
    fn rooms(&self) -> f64;
    fn size(&self) -> u32;
}

impl Filterable for PrimaryFields {
    fn rent(&self) -> u32 {
        self.rent
    }
    fn rooms(&self) -> f64 {
        self.rooms
    }
    fn size(&self) -> u32 {
        self.size
    }
}

impl Filterable for NormalizedListing {
    fn rent(&self) -> u32 {
        self.rent
    }
    fn rooms(&self) -> f64 {
        self.rooms
    }
    fn size(&self) -> u32 {
        self.size
    }
}

/// Whether `record` lies within every bound of `criteria`.
///
/// An absent room bound leaves that side of the room range open.
pub fn matches<R: Filterable + ?Sized>(record: &R, criteria: &FilterCriteria) -> bool {
    let rent = record.rent();
    let size = record.size();
    let rooms = record.rooms();

    let rent_ok = criteria.min_rent <= rent && rent <= criteria.max_rent;
    let size_ok = criteria.min_size <= size && size <= criteria.max_size;
    let rooms_ok = criteria.min_rooms.map_or(true, |min| min <= rooms)
        && criteria.max_rooms.map_or(true, |max| rooms <= max);

    rent_ok && size_ok && rooms_ok
}
