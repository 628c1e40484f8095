//! JSON file implementation of the sync cache.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::{CacheError, SyncCache};

/// Cache stored as a JSON object mapping info hash to an ISO-8601 timestamp.
///
/// Every [`record`](SyncCache::record) rewrites the whole file.
pub struct JsonFileCache {
    path: PathBuf,
    expiry: TimeDelta,
    entries: Mutex<BTreeMap<String, DateTime<Utc>>>,
}

impl JsonFileCache {
    /// Open the cache at `path`, loading whatever is there.
    pub fn open(path: impl Into<PathBuf>, expiry: TimeDelta) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        Self {
            path,
            expiry,
            entries: Mutex::new(entries),
        }
    }

    /// Open with an expiry window given in days.
    pub fn with_expiry_days(path: impl Into<PathBuf>, days: i64) -> Self {
        Self::open(path, TimeDelta::try_days(days).unwrap_or(TimeDelta::MAX))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn expiry(&self) -> TimeDelta {
        self.expiry
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, DateTime<Utc>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, entries: &BTreeMap<String, DateTime<Utc>>) -> Result<(), CacheError> {
        let encoded: BTreeMap<&str, String> = entries
            .iter()
            .map(|(hash, at)| (hash.as_str(), at.to_rfc3339()))
            .collect();
        let json = serde_json::to_string_pretty(&encoded)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SyncCache for JsonFileCache {
    fn reload(&self) {
        let loaded = read_entries(&self.path);
        *self.entries() = loaded;
    }

    fn is_fresh(&self, hash: &str, now: DateTime<Utc>) -> bool {
        match self.entries().get(hash) {
            Some(synced_at) => synced_at
                .checked_add_signed(self.expiry)
                .is_none_or(|deadline| now < deadline),
            None => false,
        }
    }

    fn record(&self, hash: &str, at: DateTime<Utc>) -> Result<(), CacheError> {
        let mut entries = self.entries();
        entries.insert(hash.to_string(), at);
        self.persist(&entries)
    }

    fn last_synced(&self, hash: &str) -> Option<DateTime<Utc>> {
        self.entries().get(hash).copied()
    }

    fn len(&self) -> usize {
        self.entries().len()
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, DateTime<Utc>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            debug!("No readable cache at {}: {}", path.display(), e);
            return BTreeMap::new();
        }
    };

    let object = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            warn!("Cache file {} is not a JSON object, starting empty", path.display());
            return BTreeMap::new();
        }
        Err(e) => {
            warn!("Cache file {} is malformed ({}), starting empty", path.display(), e);
            return BTreeMap::new();
        }
    };

    object
        .into_iter()
        .filter_map(|(hash, value)| {
            match value.as_str().and_then(parse_timestamp) {
                Some(at) => Some((hash, at)),
                None => {
                    warn!("Dropping cache entry {} with unreadable timestamp {}", hash, value);
                    None
                }
            }
        })
        .collect()
}

/// Parse an RFC 3339 timestamp, or a naive ISO-8601 one taken as local time.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    let naive = raw.parse::<NaiveDateTime>().ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
}
