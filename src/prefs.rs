//! On-device preference persistence, independent of the hosted backend.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The full preference document as stored on disk. Every save rewrites the
/// whole document, so concurrent writers resolve to last-writer-wins.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceDocument {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    favorites: BTreeSet<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_viewed_property: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_name: Option<String>,
}

/// Synchronous key-value store for favorites and small scalar preferences.
///
/// Reads fall back to defaults when the file is missing or corrupted, never
/// to an error. Writes are treated as durable by callers; a failed write
/// leaves a log entry and nothing else.
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The persisted favorite set, empty when unset or unreadable.
    ///
    /// Ids may reference listings no longer present in the latest snapshot;
    /// stale entries are filtered at render time, not purged here.
    pub fn favorites(&self) -> BTreeSet<i32> {
        self.read().favorites
    }

    /// Replaces the persisted favorite set.
    pub fn save_favorites(&self, favorites: &BTreeSet<i32>) {
        let mut document = self.read();
        document.favorites = favorites.clone();
        self.write(&document);
    }

    /// Adds `property_id` to the favorites if absent, removes it otherwise.
    /// Returns whether the id is a favorite after the toggle.
    pub fn toggle_favorite(&self, property_id: i32) -> bool {
        let mut document = self.read();
        let added = document.favorites.insert(property_id);
        if !added {
            document.favorites.remove(&property_id);
        }
        self.write(&document);
        added
    }

    /// Drops the favorites entry entirely.
    pub fn clear_favorites(&self) {
        let mut document = self.read();
        document.favorites.clear();
        self.write(&document);
    }

    /// Last opened listing id, `-1` when none was recorded.
    pub fn last_viewed_property(&self) -> i32 {
        self.read().last_viewed_property.unwrap_or(-1)
    }

    pub fn save_last_viewed_property(&self, property_id: i32) {
        let mut document = self.read();
        document.last_viewed_property = Some(property_id);
        self.write(&document);
    }

    /// Stored display name, empty when unset.
    pub fn user_name(&self) -> String {
        self.read().user_name.unwrap_or_default()
    }

    pub fn set_user_name(&self, name: &str) {
        let mut document = self.read();
        document.user_name = Some(name.to_string());
        self.write(&document);
    }

    fn read(&self) -> PreferenceDocument {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) => {
                if error.kind() != ErrorKind::NotFound {
                    warn!(path = %self.path.display(), %error, "preference read failed, using defaults");
                }
                return PreferenceDocument::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|error| {
            warn!(path = %self.path.display(), %error, "corrupted preference document, using defaults");
            PreferenceDocument::default()
        })
    }

    fn write(&self, document: &PreferenceDocument) {
        let serialized = match serde_json::to_string_pretty(document) {
            Ok(serialized) => serialized,
            Err(error) => {
                warn!(path = %self.path.display(), %error, "preference document failed to serialize");
                return;
            }
        };
        if let Err(error) = fs::write(&self.path, serialized) {
            warn!(path = %self.path.display(), %error, "preference write failed");
        }
    }
}
