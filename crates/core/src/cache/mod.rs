//! Sync cache - remembers which cross-seeds were processed and when.
//!
//! Entries older than the expiry window are treated as absent but are never
//! removed from the backing store.

mod json;

pub use json::JsonFileCache;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while persisting the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Trait for sync cache storage.
pub trait SyncCache: Send + Sync {
    /// Re-read the backing store. A missing or malformed store yields an
    /// empty cache.
    fn reload(&self);

    /// True iff an entry exists for `hash` and `now < synced_at + expiry`.
    fn is_fresh(&self, hash: &str, now: DateTime<Utc>) -> bool;

    /// Set the entry for `hash` to `at` and persist the whole cache.
    fn record(&self, hash: &str, at: DateTime<Utc>) -> Result<(), CacheError>;

    /// When `hash` was last synced, regardless of expiry.
    fn last_synced(&self, hash: &str) -> Option<DateTime<Utc>>;

    /// Number of stored entries, stale ones included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
