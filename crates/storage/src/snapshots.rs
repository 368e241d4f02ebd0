//! Versioned snapshot records for state stores
//!
//! Each state store persists its full state as a single record under a
//! well-known key. Records are wrapped in a versioned envelope with a
//! content checksum so corruption and schema drift surface on load instead
//! of as mystery state later.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::kv::{KvError, KvStore};

/// Snapshot error types
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Key-value store error
    #[error("Key-value store error: {0}")]
    Kv(#[from] KvError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Corruption detected
    #[error("Corruption detected: {0}")]
    Corruption(String),

    /// Version mismatch
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version
        expected: u32,
        /// Found version
        found: u32,
    },
}

/// Result type for snapshot operations
pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Versioned snapshot envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VersionedRecord<T> {
    /// Schema version of the payload
    version: u32,
    /// Checksum for corruption detection
    checksum: String,
    /// The actual snapshot data
    data: T,
}

impl<T: Serialize> VersionedRecord<T> {
    fn new(version: u32, data: T) -> Result<Self> {
        let data_json = serde_json::to_string(&data)?;
        let checksum = format!("{:x}", md5::compute(&data_json));

        Ok(Self { version, checksum, data })
    }

    fn verify_checksum(&self) -> Result<()> {
        let data_json = serde_json::to_string(&self.data)?;
        let computed = format!("{:x}", md5::compute(&data_json));

        if computed != self.checksum {
            return Err(SnapshotError::Corruption(format!(
                "Checksum mismatch: expected {}, got {}",
                self.checksum, computed
            )));
        }

        Ok(())
    }
}

/// Snapshot store over the key-value layer
///
/// Thin handle; clones share the underlying store.
#[derive(Clone)]
pub struct SnapshotStore {
    kv: Arc<KvStore>,
}

impl SnapshotStore {
    /// Create a snapshot store over an opened key-value store
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }

    /// Persist a snapshot under `key`
    pub fn save<T>(&self, key: &str, version: u32, data: &T) -> Result<()>
    where
        T: Serialize + Clone,
    {
        let record = VersionedRecord::new(version, data.clone())?;
        self.kv.set(key, &record)?;
        tracing::debug!(key, version, "saved snapshot");
        Ok(())
    }

    /// Load the snapshot stored under `key`, if any
    ///
    /// Returns `Ok(None)` when no record exists. A record that fails its
    /// checksum or carries a different schema version is an error; callers
    /// decide whether to fall back to defaults.
    pub fn load<T>(&self, key: &str, version: u32) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let record: Option<VersionedRecord<T>> = self.kv.get(key)?;

        let Some(record) = record else {
            return Ok(None);
        };

        record.verify_checksum()?;

        if record.version != version {
            return Err(SnapshotError::VersionMismatch {
                expected: version,
                found: record.version,
            });
        }

        Ok(Some(record.data))
    }

    /// Remove the snapshot stored under `key`
    pub fn clear(&self, key: &str) -> Result<bool> {
        Ok(self.kv.remove(key)?)
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.kv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
    struct TestState {
        counter: i32,
        name: String,
    }

    fn store() -> SnapshotStore {
        SnapshotStore::new(Arc::new(KvStore::in_memory().unwrap()))
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let snapshots = store();
        let state = TestState { counter: 42, name: "draft".to_string() };

        snapshots.save("test-state", 1, &state).unwrap();

        let loaded: Option<TestState> = snapshots.load("test-state", 1).unwrap();
        assert_eq!(loaded, Some(state));
    }

    #[test]
    fn test_load_missing_key() {
        let snapshots = store();
        let loaded: Option<TestState> = snapshots.load("absent", 1).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_version_mismatch() {
        let snapshots = store();
        let state = TestState { counter: 7, name: "old".to_string() };

        snapshots.save("test-state", 1, &state).unwrap();

        let result: Result<Option<TestState>> = snapshots.load("test-state", 2);
        assert!(matches!(
            result,
            Err(SnapshotError::VersionMismatch { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_corruption_detection() {
        let kv = Arc::new(KvStore::in_memory().unwrap());
        let snapshots = SnapshotStore::new(Arc::clone(&kv));

        let state = TestState { counter: 42, name: "draft".to_string() };
        snapshots.save("test-state", 1, &state).unwrap();

        // Tamper with the stored payload without recomputing the checksum
        let mut raw: serde_json::Value = kv.get("test-state").unwrap().unwrap();
        raw["data"]["counter"] = serde_json::json!(99);
        kv.set("test-state", &raw).unwrap();

        let result: Result<Option<TestState>> = snapshots.load("test-state", 1);
        assert!(matches!(result, Err(SnapshotError::Corruption(_))));
    }

    #[test]
    fn test_clear() {
        let snapshots = store();
        let state = TestState::default();

        snapshots.save("test-state", 1, &state).unwrap();
        assert!(snapshots.clear("test-state").unwrap());
        assert!(!snapshots.clear("test-state").unwrap());

        let loaded: Option<TestState> = snapshots.load("test-state", 1).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_overwrite_keeps_latest() {
        let snapshots = store();

        snapshots
            .save("test-state", 1, &TestState { counter: 1, name: "a".to_string() })
            .unwrap();
        snapshots
            .save("test-state", 1, &TestState { counter: 2, name: "b".to_string() })
            .unwrap();

        let loaded: Option<TestState> = snapshots.load("test-state", 1).unwrap();
        assert_eq!(loaded.unwrap().counter, 2);
    }
}
