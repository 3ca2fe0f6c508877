//! Recent searches, newest first, persisted as JSON.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::models::{AddressParts, GeocodedAddress};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSearch {
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub address: AddressParts,
    pub timestamp: DateTime<Utc>,
}

impl RecentSearch {
    /// The stored address, ready to resolve again without geocoding.
    pub fn to_address(&self) -> GeocodedAddress {
        GeocodedAddress::new(self.display_name.clone(), self.lat, self.lon, self.address.clone())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HistoryFile {
    recent_searches: Vec<RecentSearch>,
}

/// Recent-searches list capped at `limit` entries, unique by display name.
#[derive(Debug, Clone)]
pub struct SearchHistory {
    entries: Vec<RecentSearch>,
    limit: usize,
}

impl SearchHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Load from disk; a missing file gives an empty history.
    pub fn load<P: AsRef<Path>>(path: P, limit: usize) -> Result<Self> {
        let path = path.as_ref();
        let mut history = Self::new(limit);

        if !path.exists() {
            debug!("No history file at {}", path.display());
            return Ok(history);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read history file: {}", path.display()))?;
        let file: HistoryFile =
            serde_json::from_str(&content).context("Failed to parse history file")?;

        history.entries = file.recent_searches;
        history.entries.truncate(history.limit);
        info!("Loaded {} recent searches", history.entries.len());
        Ok(history)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = HistoryFile {
            recent_searches: self.entries.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write history file: {}", path.display()))?;
        Ok(())
    }

    /// Record a search now.
    pub fn add(&mut self, address: &GeocodedAddress) {
        self.add_at(address, Utc::now());
    }

    /// Move-to-front insert: an existing entry with the same display name is
    /// replaced, then the list is cut back to the limit.
    pub fn add_at(&mut self, address: &GeocodedAddress, timestamp: DateTime<Utc>) {
        self.entries
            .retain(|s| s.display_name != address.display_name);

        self.entries.insert(
            0,
            RecentSearch {
                display_name: address.display_name.clone(),
                lat: address.lat,
                lon: address.lon,
                address: address.address.clone(),
                timestamp,
            },
        );

        self.entries.truncate(self.limit);
    }

    pub fn entries(&self) -> &[RecentSearch] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&RecentSearch> {
        self.entries.get(index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn addr(name: &str) -> GeocodedAddress {
        GeocodedAddress::new(name, 33.4, -112.0, AddressParts::default())
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_newest_first() {
        let mut h = SearchHistory::new(10);
        h.add_at(&addr("a"), ts(0));
        h.add_at(&addr("b"), ts(1));
        let names: Vec<&str> = h.entries().iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_moves_to_front() {
        let mut h = SearchHistory::new(10);
        h.add_at(&addr("a"), ts(0));
        h.add_at(&addr("b"), ts(1));
        h.add_at(&addr("a"), ts(2));

        assert_eq!(h.len(), 2);
        assert_eq!(h.entries()[0].display_name, "a");
        assert_eq!(h.entries()[0].timestamp, ts(2));
    }

    #[test]
    fn test_capped_at_limit() {
        let mut h = SearchHistory::new(3);
        for i in 0..5 {
            h.add_at(&addr(&format!("addr {}", i)), ts(i));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.entries()[0].display_name, "addr 4");
        assert_eq!(h.entries()[2].display_name, "addr 2");
    }

    #[test]
    fn test_persist_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut h = SearchHistory::new(10);
        h.add_at(&addr("Tempe, AZ"), ts(0));
        h.save(&path).unwrap();

        let loaded = SearchHistory::load(&path, 10).unwrap();
        assert_eq!(loaded.entries(), h.entries());
        assert_eq!(loaded.get(0).unwrap().to_address(), addr("Tempe, AZ"));

        // A smaller limit trims on load
        let mut h = SearchHistory::new(10);
        for i in 0..4 {
            h.add_at(&addr(&i.to_string()), ts(i));
        }
        h.save(&path).unwrap();
        assert_eq!(SearchHistory::load(&path, 2).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let h = SearchHistory::load(dir.path().join("none.json"), 10).unwrap();
        assert!(h.is_empty());
    }
}
