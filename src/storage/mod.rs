//! Snapshot persistence for offline fallback.
//!
//! One JSON blob under a fixed key: the last agenda fetch that succeeded,
//! stamped with its save time. It is read back when every live source
//! fails, so stale data beats no data.

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Match;

// Re-export for convenience
pub use local::LocalCache;

/// Storage key of the last-known-good snapshot.
pub const SNAPSHOT_KEY: &str = "agenda.json";

/// Keyed byte store for cached agenda data.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Write a value, replacing any previous one under the key.
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Read a value back, `None` when the key was never written.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

/// Last-known-good agenda with its save timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// ISO 8601 timestamp of the save
    pub saved_at: DateTime<Utc>,
    /// Total match count
    pub count: usize,
    /// The matches, in the order the aggregator produced them
    pub matches: Vec<Match>,
}

impl Snapshot {
    pub fn new(matches: Vec<Match>) -> Self {
        Self {
            saved_at: Utc::now(),
            count: matches.len(),
            matches,
        }
    }
}

/// Persist the given matches as the new last-known-good snapshot.
pub async fn save_snapshot(store: &dyn CacheStore, matches: &[Match]) -> Result<()> {
    let snapshot = Snapshot::new(matches.to_vec());
    let bytes = serde_json::to_vec_pretty(&snapshot)?;
    store.write_bytes(SNAPSHOT_KEY, &bytes).await
}

/// Load the last-known-good snapshot, `None` when none was ever saved.
pub async fn load_snapshot(store: &dyn CacheStore) -> Result<Option<Snapshot>> {
    match store.read_bytes(SNAPSHOT_KEY).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}
