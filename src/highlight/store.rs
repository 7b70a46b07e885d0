// Persisted seen-item records.
// A JSON-backed map from item identifier to last-seen timestamp with a
// retention window. Handles TTL checking and atomic filesystem writes.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Result, UpliftError};

/// Retention for seen-item records: 4 days.
pub const DEFAULT_TTL: Duration = Duration::from_secs(4 * 24 * 60 * 60);

/// On-disk shape of the store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SeenFile {
    entries: BTreeMap<String, DateTime<Utc>>,
}

/// Persisted map from item identifier to last-seen timestamp. Entries
/// older than the retention window count as unseen and are eligible for
/// pruning.
#[derive(Debug)]
pub struct SeenStore {
    path: PathBuf,
    entries: BTreeMap<String, DateTime<Utc>>,
    ttl: Duration,
}

impl SeenStore {
    /// Open the store for a named script under the platform cache directory.
    pub fn open(script: &str) -> Result<Self> {
        let path = default_path(script)
            .ok_or_else(|| UpliftError::Other("no cache directory available".to_string()))?;
        Self::load(path)
    }

    /// Load the store from an explicit path. A missing file is an empty
    /// store; a corrupt file is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let file: SeenFile = serde_json::from_str(&contents)?;
            file.entries
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries,
            ttl: DEFAULT_TTL,
        })
    }

    /// Override the retention window.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether `id` has an unexpired record as of `now`.
    pub fn seen(&self, id: &str, now: DateTime<Utc>) -> bool {
        self.entries
            .get(id)
            .is_some_and(|&at| !expired(at, now, self.ttl))
    }

    /// Record `id` as seen at `now`, refreshing any existing entry.
    pub fn record(&mut self, id: impl Into<String>, now: DateTime<Utc>) {
        self.entries.insert(id.into(), now);
    }

    /// Drop the record for `id`, if any.
    pub fn forget(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Drop expired records, returning how many were removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, at| !expired(*at, now, ttl));
        let removed = before - self.entries.len();
        if removed > 0 {
            log::debug!("pruned {} expired seen records", removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the store as JSON, atomically via a temp file.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = SeenFile {
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let temp_path = self.path.with_extension("tmp");
        let mut out = fs::File::create(&temp_path)?;
        out.write_all(json.as_bytes())?;
        out.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

fn expired(at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    let elapsed = now
        .signed_duration_since(at)
        .to_std()
        .unwrap_or(Duration::MAX);
    elapsed > ttl
}

fn default_path(script: &str) -> Option<PathBuf> {
    ProjectDirs::from("", "", "uplift")
        .map(|dirs| dirs.cache_dir().join("seen").join(format!("{}.json", script)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn days(n: i64) -> chrono::Duration {
        chrono::Duration::days(n)
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("seen.json");
        let now = Utc::now();

        let mut store = SeenStore::load(&path).unwrap();
        store.record("42", now);
        store.save().unwrap();

        let reloaded = SeenStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.seen("42", now));
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = SeenStore::load(temp_dir.path().join("absent.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("seen.json");
        fs::write(&path, "not json").unwrap();

        assert!(SeenStore::load(&path).is_err());
    }

    #[test]
    fn test_expired_entry_is_not_seen() {
        let temp_dir = TempDir::new().unwrap();
        let now = Utc::now();

        let mut store = SeenStore::load(temp_dir.path().join("seen.json")).unwrap();
        store.record("42", now - days(5));

        assert!(!store.seen("42", now));
        assert!(store.seen("42", now - days(2)));
    }

    #[test]
    fn test_record_refreshes_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let now = Utc::now();

        let mut store = SeenStore::load(temp_dir.path().join("seen.json")).unwrap();
        store.record("42", now - days(3));
        store.record("42", now);

        assert!(store.seen("42", now + days(3)));
    }

    #[test]
    fn test_prune_drops_only_expired() {
        let _ = env_logger::builder().is_test(true).try_init();
        let temp_dir = TempDir::new().unwrap();
        let now = Utc::now();

        let mut store = SeenStore::load(temp_dir.path().join("seen.json")).unwrap();
        store.record("old", now - days(5));
        store.record("recent", now - days(1));

        assert_eq!(store.prune(now), 1);
        assert_eq!(store.len(), 1);
        assert!(store.seen("recent", now));
    }

    #[test]
    fn test_forget() {
        let temp_dir = TempDir::new().unwrap();
        let now = Utc::now();

        let mut store = SeenStore::load(temp_dir.path().join("seen.json")).unwrap();
        store.record("42", now);

        assert!(store.forget("42"));
        assert!(!store.forget("42"));
        assert!(!store.seen("42", now));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("seen.json");

        let mut store = SeenStore::load(&path).unwrap();
        store.record("42", Utc::now());
        store.save().unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_custom_ttl() {
        let temp_dir = TempDir::new().unwrap();
        let now = Utc::now();

        let mut store = SeenStore::load(temp_dir.path().join("seen.json"))
            .unwrap()
            .with_ttl(Duration::from_secs(60));
        store.record("42", now - chrono::Duration::seconds(120));

        assert!(!store.seen("42", now));
    }
}
