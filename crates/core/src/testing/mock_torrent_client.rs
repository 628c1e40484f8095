//! Mock torrent client for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::torrent_client::{
    ShareLimits, TorrentClient, TorrentClientError, TorrentFilters, TorrentInfo,
};

/// A recorded set_share_limits call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedShareLimits {
    pub hash: String,
    pub limits: ShareLimits,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct MockTorrent {
    info: TorrentInfo,
    tags: Vec<String>,
}

/// Mock implementation of the TorrentClient trait.
///
/// Serves pre-populated torrents by exact category or by tag, in insertion
/// order, and records every call.
///
/// # Example
///
/// ```rust,ignore
/// let client = MockTorrentClient::new();
/// client.add_torrent(fixtures::torrent("x1", "Foo", "movies.cross-seed", 1000), &["cross-seed"]).await;
/// client.add_torrent(fixtures::torrent("o1", "Foo", "movies", 500), &[]).await;
///
/// // ... run a sync cycle ...
///
/// let calls = client.share_limit_calls().await;
/// assert_eq!(calls[0].hash, "x1");
/// ```
#[derive(Debug, Default)]
pub struct MockTorrentClient {
    torrents: Arc<RwLock<Vec<MockTorrent>>>,
    share_limit_calls: Arc<RwLock<Vec<RecordedShareLimits>>>,
    list_calls: Arc<RwLock<Vec<TorrentFilters>>>,
    login_calls: Arc<RwLock<u32>>,
    fail_login: Arc<RwLock<bool>>,
    fail_set_limits: Arc<RwLock<bool>>,
    failing_tags: Arc<RwLock<HashSet<String>>>,
    failing_categories: Arc<RwLock<HashSet<String>>>,
}

impl MockTorrentClient {
    /// Create a new mock torrent client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a torrent carrying `tags`.
    pub async fn add_torrent(&self, info: TorrentInfo, tags: &[&str]) {
        self.torrents.write().await.push(MockTorrent {
            info,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        });
    }

    /// Get all recorded set_share_limits calls.
    pub async fn share_limit_calls(&self) -> Vec<RecordedShareLimits> {
        self.share_limit_calls.read().await.clone()
    }

    /// Get all recorded list_torrents filters.
    pub async fn list_calls(&self) -> Vec<TorrentFilters> {
        self.list_calls.read().await.clone()
    }

    pub async fn login_count(&self) -> u32 {
        *self.login_calls.read().await
    }

    /// Clear recorded calls.
    pub async fn clear_recorded(&self) {
        self.share_limit_calls.write().await.clear();
        self.list_calls.write().await.clear();
        *self.login_calls.write().await = 0;
    }

    pub async fn set_fail_login(&self, fail: bool) {
        *self.fail_login.write().await = fail;
    }

    pub async fn set_fail_set_limits(&self, fail: bool) {
        *self.fail_set_limits.write().await = fail;
    }

    /// Make listing by this tag fail.
    pub async fn fail_tag(&self, tag: impl Into<String>) {
        self.failing_tags.write().await.insert(tag.into());
    }

    /// Make listing by this category fail.
    pub async fn fail_category(&self, category: impl Into<String>) {
        self.failing_categories.write().await.insert(category.into());
    }
}

#[async_trait]
impl TorrentClient for MockTorrentClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn login(&self) -> Result<(), TorrentClientError> {
        *self.login_calls.write().await += 1;
        if *self.fail_login.read().await {
            return Err(TorrentClientError::AuthenticationFailed(
                "mock login failure".to_string(),
            ));
        }
        Ok(())
    }

    async fn list_torrents(
        &self,
        filters: &TorrentFilters,
    ) -> Result<Vec<TorrentInfo>, TorrentClientError> {
        self.list_calls.write().await.push(filters.clone());

        if let Some(tag) = &filters.tag {
            if self.failing_tags.read().await.contains(tag) {
                return Err(TorrentClientError::ConnectionFailed(format!(
                    "mock failure listing tag {}",
                    tag
                )));
            }
        }
        if let Some(category) = &filters.category {
            if self.failing_categories.read().await.contains(category) {
                return Err(TorrentClientError::ApiError(format!(
                    "mock failure listing category {}",
                    category
                )));
            }
        }

        let torrents = self.torrents.read().await;
        Ok(torrents
            .iter()
            .filter(|t| {
                filters
                    .category
                    .as_ref()
                    .is_none_or(|c| &t.info.category == c)
            })
            .filter(|t| filters.tag.as_ref().is_none_or(|tag| t.tags.contains(tag)))
            .map(|t| t.info.clone())
            .collect())
    }

    async fn set_share_limits(
        &self,
        hash: &str,
        limits: ShareLimits,
    ) -> Result<(), TorrentClientError> {
        if *self.fail_set_limits.read().await {
            return Err(TorrentClientError::ApiError("HTTP 500".to_string()));
        }

        self.share_limit_calls.write().await.push(RecordedShareLimits {
            hash: hash.to_string(),
            limits,
            timestamp: Utc::now(),
        });

        let mut torrents = self.torrents.write().await;
        if let Some(t) = torrents.iter_mut().find(|t| t.info.hash == hash) {
            t.info.seeding_time_limit = limits.seeding_time_limit;
            t.info.ratio_limit = limits.ratio_limit;
        }
        Ok(())
    }
}
