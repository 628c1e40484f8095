//! Types for torrent client operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel limit value meaning "no limit".
pub const NO_LIMIT: i64 = -1;

/// Sentinel limit value meaning "use the client's global limit".
pub const GLOBAL_LIMIT: i64 = -2;

/// Errors that can occur during torrent client operations.
#[derive(Debug, Error)]
pub enum TorrentClientError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,
}

impl From<reqwest::Error> for TorrentClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TorrentClientError::Timeout
        } else if e.is_connect() {
            TorrentClientError::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            TorrentClientError::InvalidResponse(e.to_string())
        } else {
            TorrentClientError::ApiError(e.to_string())
        }
    }
}

/// State of a torrent, as far as seeding is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorrentState {
    /// Still fetching data.
    Downloading,
    /// Complete and uploading (or ready to).
    Seeding,
    /// Stopped by the user or by a share limit.
    Paused,
    /// Verifying data or moving files.
    Checking,
    /// Waiting for a queue slot.
    Queued,
    /// Errored or missing files.
    Error,
    /// Anything the client reports that we do not know.
    Unknown,
}

impl TorrentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TorrentState::Downloading => "downloading",
            TorrentState::Seeding => "seeding",
            TorrentState::Paused => "paused",
            TorrentState::Checking => "checking",
            TorrentState::Queued => "queued",
            TorrentState::Error => "error",
            TorrentState::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TorrentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A torrent as reported by the client.
///
/// Fetched fresh every cycle; nothing here is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentInfo {
    /// Info hash (lowercase hex).
    pub hash: String,
    /// Torrent name, the key used to pair a cross-seed with its original.
    pub name: String,
    /// Category, possibly dot-delimited ("movies.cross-seed"). Empty if none.
    pub category: String,
    pub state: TorrentState,
    /// When the client started tracking the torrent.
    pub added_on: DateTime<Utc>,
    /// Seeding time limit in minutes, or [`NO_LIMIT`] / [`GLOBAL_LIMIT`].
    pub seeding_time_limit: i64,
    /// Share ratio limit, or `-1.0` / `-2.0` sentinels.
    pub ratio_limit: f64,
}

/// Share limits pushed to the client for one torrent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShareLimits {
    /// Minutes, or [`NO_LIMIT`].
    pub seeding_time_limit: i64,
    pub ratio_limit: f64,
}

/// Filters for listing torrents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TorrentFilters {
    /// Exact category match.
    pub category: Option<String>,
    /// Torrents carrying this tag.
    pub tag: Option<String>,
}

impl TorrentFilters {
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Default::default()
        }
    }

    pub fn by_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Default::default()
        }
    }
}

/// Trait for torrent client backends.
#[async_trait]
pub trait TorrentClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Establish a session reused by subsequent calls.
    async fn login(&self) -> Result<(), TorrentClientError>;

    /// List all torrents matching the filters.
    async fn list_torrents(
        &self,
        filters: &TorrentFilters,
    ) -> Result<Vec<TorrentInfo>, TorrentClientError>;

    /// Set seeding time and ratio limits for one torrent.
    async fn set_share_limits(
        &self,
        hash: &str,
        limits: ShareLimits,
    ) -> Result<(), TorrentClientError>;
}
