//! qBittorrent Web API client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::Config;

use super::{
    ShareLimits, TorrentClient, TorrentClientError, TorrentFilters, TorrentInfo, TorrentState,
    NO_LIMIT,
};

/// qBittorrent client implementation.
///
/// The SID cookie lives in the reqwest cookie jar; `authenticated` only
/// tracks whether a login has succeeded since the last 403.
pub struct QBittorrentClient {
    client: Client,
    url: String,
    username: String,
    password: String,
    authenticated: RwLock<bool>,
}

impl QBittorrentClient {
    /// Create a new qBittorrent client.
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TorrentClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| TorrentClientError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            username: username.into(),
            password: password.into(),
            authenticated: RwLock::new(false),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TorrentClientError> {
        Self::new(
            config.url.as_str(),
            config.username.as_str(),
            config.password.as_str(),
            Duration::from_secs(config.timeout_secs as u64),
        )
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    async fn authenticate(&self) -> Result<(), TorrentClientError> {
        let params = [
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ];

        let response = self
            .client
            .post(self.endpoint("/api/v2/auth/login"))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() && body.trim() == "Ok." {
            debug!("qBittorrent login successful");
            *self.authenticated.write().await = true;
            Ok(())
        } else if body.contains("Fails.") || status == StatusCode::FORBIDDEN {
            Err(TorrentClientError::AuthenticationFailed(
                "Invalid credentials".to_string(),
            ))
        } else {
            Err(TorrentClientError::AuthenticationFailed(format!(
                "Unexpected response (HTTP {}): {}",
                status,
                body.chars().take(100).collect::<String>()
            )))
        }
    }

    /// Ensure we have a valid session, logging in if needed.
    async fn ensure_authenticated(&self) -> Result<(), TorrentClientError> {
        if *self.authenticated.read().await {
            return Ok(());
        }
        self.authenticate().await
    }

    /// Send an authenticated request, logging in again once on 403.
    async fn send<F>(&self, build: F) -> Result<String, TorrentClientError>
    where
        F: Fn() -> RequestBuilder,
    {
        self.ensure_authenticated().await?;

        let mut response = build().send().await?;

        if response.status() == StatusCode::FORBIDDEN {
            warn!("qBittorrent session expired, re-authenticating");
            *self.authenticated.write().await = false;
            self.authenticate().await?;
            response = build().send().await?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(TorrentClientError::ApiError(format!("HTTP {}", status)));
        }

        Ok(response.text().await?)
    }
}

/// qBittorrent `/torrents/info` entry. Only the fields we use.
#[derive(Debug, Deserialize)]
struct QBTorrentInfo {
    hash: String,
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    added_on: i64,
    #[serde(default = "default_seeding_time_limit")]
    seeding_time_limit: i64,
    #[serde(default = "default_ratio_limit")]
    ratio_limit: f64,
}

fn default_seeding_time_limit() -> i64 {
    NO_LIMIT
}

fn default_ratio_limit() -> f64 {
    NO_LIMIT as f64
}

impl QBTorrentInfo {
    fn into_torrent_info(self) -> TorrentInfo {
        TorrentInfo {
            hash: self.hash.to_lowercase(),
            name: self.name,
            category: self.category,
            state: parse_qb_state(&self.state),
            added_on: DateTime::from_timestamp(self.added_on, 0).unwrap_or_default(),
            seeding_time_limit: self.seeding_time_limit,
            ratio_limit: self.ratio_limit,
        }
    }
}

/// Parse qBittorrent state string to TorrentState.
fn parse_qb_state(state: &str) -> TorrentState {
    match state {
        "downloading" | "forcedDL" | "metaDL" | "forcedMetaDL" | "allocating" | "stalledDL" => {
            TorrentState::Downloading
        }
        "uploading" | "forcedUP" | "stalledUP" => TorrentState::Seeding,
        "pausedDL" | "pausedUP" | "stoppedDL" | "stoppedUP" => TorrentState::Paused,
        "checkingDL" | "checkingUP" | "checkingResumeData" | "moving" => TorrentState::Checking,
        "queuedDL" | "queuedUP" => TorrentState::Queued,
        "error" | "missingFiles" => TorrentState::Error,
        _ => TorrentState::Unknown,
    }
}

fn parse_torrent_list(body: &str) -> Result<Vec<TorrentInfo>, TorrentClientError> {
    let torrents: Vec<QBTorrentInfo> = serde_json::from_str(body).map_err(|e| {
        TorrentClientError::InvalidResponse(format!("Failed to parse torrent list: {}", e))
    })?;
    Ok(torrents.into_iter().map(|t| t.into_torrent_info()).collect())
}

#[async_trait]
impl TorrentClient for QBittorrentClient {
    fn name(&self) -> &str {
        "qbittorrent"
    }

    async fn login(&self) -> Result<(), TorrentClientError> {
        self.authenticate().await
    }

    async fn list_torrents(
        &self,
        filters: &TorrentFilters,
    ) -> Result<Vec<TorrentInfo>, TorrentClientError> {
        let mut query = vec![("filter", "all")];
        if let Some(category) = &filters.category {
            query.push(("category", category.as_str()));
        }
        if let Some(tag) = &filters.tag {
            query.push(("tag", tag.as_str()));
        }

        let url = self.endpoint("/api/v2/torrents/info");
        let body = self.send(|| self.client.get(&url).query(&query)).await?;
        parse_torrent_list(&body)
    }

    async fn set_share_limits(
        &self,
        hash: &str,
        limits: ShareLimits,
    ) -> Result<(), TorrentClientError> {
        let seeding_time_limit = limits.seeding_time_limit.to_string();
        let ratio_limit = limits.ratio_limit.to_string();
        let inactive_limit = NO_LIMIT.to_string();
        let params = [
            ("hashes", hash),
            ("seedingTimeLimit", seeding_time_limit.as_str()),
            ("ratioLimit", ratio_limit.as_str()),
            ("inactiveSeedingTimeLimit", inactive_limit.as_str()),
        ];

        let url = self.endpoint("/api/v2/torrents/setShareLimits");
        self.send(|| self.client.post(&url).form(&params)).await?;
        Ok(())
    }
}
