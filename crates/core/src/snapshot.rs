// ABOUTME: Timestamped snapshots of a search session's listings, stored as JSON.
// ABOUTME: Supports saving, loading and re-filtering results offline.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::filter::{matches, FilterCriteria};
use crate::models::NormalizedListing;
use crate::profile::Category;

const FILE_STAMP_FORMAT: &str = "%d-%m-%y_%H-%M-%S";

/// A session's result set with its capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub captured_at: DateTime<Utc>,
    pub payload: Vec<NormalizedListing>,
}

impl Snapshot {
    /// Captures `listings` with the current time.
    pub fn capture(listings: Vec<NormalizedListing>) -> Self {
        Self {
            captured_at: Utc::now(),
            payload: listings,
        }
    }

    /// File name for a snapshot taken now, e.g. `immoCH_17-10-26_14-05-09.search.json`.
    ///
    /// The stamp is local wall-clock time; `captured_at` stays in UTC.
    pub fn default_file_name(prefix: &str) -> String {
        format!(
            "{}_{}.search.json",
            prefix,
            Local::now().format(FILE_STAMP_FORMAT)
        )
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Listings of the payload that pass `criteria` for `category`.
    pub fn filtered(&self, criteria: &FilterCriteria, category: Category) -> Vec<&NormalizedListing> {
        let criteria = criteria.for_category(category);
        self.payload
            .iter()
            .filter(|listing| matches(*listing, &criteria))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Contact;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample() -> Snapshot {
        let mut images = BTreeMap::new();
        images.insert("Façade".to_string(), "https://cdn/facade.jpg".to_string());
        Snapshot::capture(vec![
            NormalizedListing {
                id: Some(1),
                link: "https://www.immobilier.ch/fr/1".to_string(),
                rent: 1800,
                rooms: 3.5,
                size: 65,
                charges: 150,
                address: "Rue A 1".to_string(),
                images,
                description: "Ligne 1\nLigne 2".to_string(),
                contact: Contact {
                    company_name: "Régie".to_string(),
                    company_address: vec!["Rue B 2".to_string()],
                },
            },
            NormalizedListing {
                id: None,
                rent: 2500,
                rooms: 5.0,
                size: 110,
                ..Default::default()
            },
        ])
    }

    #[test]
    fn save_and_load_preserve_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(Snapshot::default_file_name("immoCH"));
        let snapshot = sample();

        snapshot.save(&path).unwrap();
        let loaded = Snapshot::load(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn json_uses_captured_at_and_payload_keys() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("capturedAt").is_some());
        assert_eq!(value["payload"].as_array().unwrap().len(), 2);
        assert_eq!(value["payload"][1]["id"], serde_json::Value::Null);
    }

    #[test]
    fn filtered_replays_criteria() {
        let snapshot = sample();
        let criteria = FilterCriteria::new(500, 2000, 40, 120).with_rooms(2.0, 4.0);
        let kept = snapshot.filtered(&criteria, Category::Flat);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, Some(1));
    }

    #[test]
    fn load_reports_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.search.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Snapshot::load(&path), Err(SnapshotError::Json(_))));
        assert!(matches!(
            Snapshot::load(dir.path().join("missing.json")),
            Err(SnapshotError::Io(_))
        ));
    }

    #[test]
    fn default_file_name_has_prefix_and_extension() {
        let name = Snapshot::default_file_name("immoCH");
        assert!(name.starts_with("immoCH_"));
        assert!(name.ends_with(".search.json"));
    }

    #[test]
    fn default_file_name_uses_local_time() {
        let before = Local::now().naive_local();
        let name = Snapshot::default_file_name("immoCH");
        let after = Local::now().naive_local();

        let stamp = name
            .strip_prefix("immoCH_")
            .and_then(|rest| rest.strip_suffix(".search.json"))
            .unwrap();
        let parsed = chrono::NaiveDateTime::parse_from_str(stamp, FILE_STAMP_FORMAT).unwrap();
        let slack = chrono::Duration::seconds(1);
        assert!(parsed >= before - slack && parsed <= after + slack, "{}", stamp);
    }
}
