//! RocksDB-backed history of saved name choices
//!
//! Persists the names a user decided to keep, with an in-memory cache for
//! listing and deletion. Values are bincode under a `hist:` key prefix.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rocksdb::{IteratorMode, Options, DB};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{RecommendError, Result};

const HIST_PREFIX: &str = "hist:";

/// Default cap on listed records
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// One saved name choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    /// None for anonymous users
    pub user_id: Option<String>,
    pub english_name: String,
    pub korean_name: String,
    pub saved_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Create a record timestamped now
    pub fn new(
        user_id: Option<String>,
        english_name: impl Into<String>,
        korean_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            english_name: english_name.into(),
            korean_name: korean_name.into(),
            saved_at: Utc::now(),
        }
    }
}

/// RocksDB-based history store
pub struct HistoryStore {
    db: Arc<DB>,
    cache: Arc<DashMap<Uuid, HistoryRecord>>,
}

impl HistoryStore {
    /// Open (or create) a history store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_max_background_jobs(2);
        opts.set_bytes_per_sync(1048576); // 1MB
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let db = DB::open(&opts, path)?;

        log::info!("HistoryStore opened at: {}", path.display());

        let store = Self {
            db: Arc::new(db),
            cache: Arc::new(DashMap::new()),
        };

        store.load_cache()?;
        Ok(store)
    }

    /// Load existing records into cache on startup
    fn load_cache(&self) -> Result<()> {
        let mut count = 0;
        let mut skipped = 0;
        let iter = self.db.iterator(IteratorMode::Start);

        for item in iter {
            let (key, value) = item?;
            let key_str = String::from_utf8_lossy(&key);

            if key_str.starts_with(HIST_PREFIX) {
                // Gracefully handle deserialization errors
                match bincode::deserialize::<HistoryRecord>(&value) {
                    Ok(record) => {
                        self.cache.insert(record.id, record);
                        count += 1;
                    }
                    Err(e) => {
                        log::warn!("Failed to deserialize record {}: {}. Skipping.", key_str, e);
                        skipped += 1;
                    }
                }
            }
        }

        if count > 0 {
            log::info!("Loaded {} history records from disk", count);
        }
        if skipped > 0 {
            log::warn!("Skipped {} records due to deserialization errors", skipped);
        }

        Ok(())
    }

    /// Persist a saved name choice, returning its id
    pub async fn save(&self, record: HistoryRecord) -> Result<Uuid> {
        let id = record.id;
        let key = format!("{}{}", HIST_PREFIX, id);

        self.db
            .put(key.as_bytes(), bincode::serialize(&record)?)?;
        self.db.flush()?;
        self.cache.insert(id, record);

        Ok(id)
    }

    /// Get a record by id
    pub fn get(&self, id: &Uuid) -> Option<HistoryRecord> {
        self.cache.get(id).map(|e| e.clone())
    }

    /// List records, newest first.
    ///
    /// With a `user_id` only that user's records are returned; without one,
    /// every record is.
    pub fn list(&self, user_id: Option<&str>, limit: usize) -> Vec<HistoryRecord> {
        let mut records: Vec<HistoryRecord> = self
            .cache
            .iter()
            .filter(|entry| match user_id {
                Some(uid) => entry.value().user_id.as_deref() == Some(uid),
                None => true,
            })
            .map(|e| e.value().clone())
            .collect();

        records.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        records.truncate(limit);
        records
    }

    /// Delete a record, scoped to the owning user when `user_id` is given
    pub fn delete(&self, id: &Uuid, user_id: Option<&str>) -> Result<()> {
        let owned = match self.cache.get(id) {
            Some(entry) => match user_id {
                Some(uid) => entry.value().user_id.as_deref() == Some(uid),
                None => true,
            },
            None => false,
        };

        if !owned {
            return Err(RecommendError::not_found(id.to_string()));
        }

        self.cache.remove(id);
        let key = format!("{}{}", HIST_PREFIX, id);
        self.db.delete(key.as_bytes())?;
        self.db.flush()?;

        Ok(())
    }

    /// Number of cached records
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// True when no records are stored
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_and_get() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::open(dir.path()).unwrap();

        let record = HistoryRecord::new(Some("user-1".into()), "Alice", "하린");
        let id = store.save(record.clone()).await.unwrap();

        let loaded = store.get(&id).unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_list_newest_first_and_user_scoped() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::open(dir.path()).unwrap();

        let mut first = HistoryRecord::new(Some("user-1".into()), "Alice", "하린");
        first.saved_at = Utc::now() - chrono::Duration::hours(2);
        let mut second = HistoryRecord::new(Some("user-1".into()), "Alice", "서연");
        second.saved_at = Utc::now() - chrono::Duration::hours(1);
        let other = HistoryRecord::new(Some("user-2".into()), "Bob", "지훈");

        store.save(first.clone()).await.unwrap();
        store.save(second.clone()).await.unwrap();
        store.save(other).await.unwrap();

        let records = store.list(Some("user-1"), DEFAULT_LIST_LIMIT);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].korean_name, "서연");
        assert_eq!(records[1].korean_name, "하린");

        let all = store.list(None, DEFAULT_LIST_LIMIT);
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_list_limit() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::open(dir.path()).unwrap();

        for i in 0..5 {
            let record = HistoryRecord::new(None, format!("name{}", i), "하린");
            store.save(record).await.unwrap();
        }

        assert_eq!(store.list(None, 3).len(), 3);
    }

    #[tokio::test]
    async fn test_delete_scoping() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::open(dir.path()).unwrap();

        let record = HistoryRecord::new(Some("user-1".into()), "Alice", "하린");
        let id = store.save(record).await.unwrap();

        // Wrong user cannot delete
        let err = store.delete(&id, Some("user-2")).unwrap_err();
        assert!(matches!(err, RecommendError::NotFound(_)));
        assert!(store.get(&id).is_some());

        store.delete(&id, Some("user-1")).unwrap();
        assert!(store.get(&id).is_none());

        // Already gone
        let err = store.delete(&id, None).unwrap_err();
        assert!(matches!(err, RecommendError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reload_from_disk() {
        let dir = TempDir::new().unwrap();
        let id;
        {
            let store = HistoryStore::open(dir.path()).unwrap();
            let record = HistoryRecord::new(None, "Alice", "하린");
            id = store.save(record).await.unwrap();
        }

        let reopened = HistoryStore::open(dir.path()).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get(&id).unwrap().korean_name, "하린");
    }
}
