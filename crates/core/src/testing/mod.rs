//! Testing utilities and mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use seedsync_core::testing::{fixtures, MockTorrentClient};
//!
//! let client = MockTorrentClient::new();
//! client.add_torrent(fixtures::torrent("x1", "Foo", "movies.cross-seed", 1000), &["cross-seed"]).await;
//! ```

mod mock_torrent_client;

pub use mock_torrent_client::{MockTorrentClient, RecordedShareLimits};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::DateTime;

    use crate::torrent_client::{TorrentInfo, TorrentState, NO_LIMIT};

    /// A seeding torrent added at `added_on` (unix seconds) with no limits.
    pub fn torrent(hash: &str, name: &str, category: &str, added_on: i64) -> TorrentInfo {
        TorrentInfo {
            hash: hash.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            state: TorrentState::Seeding,
            added_on: DateTime::from_timestamp(added_on, 0).unwrap_or_default(),
            seeding_time_limit: NO_LIMIT,
            ratio_limit: NO_LIMIT as f64,
        }
    }

    /// Same as [`torrent`] with share limits set.
    pub fn limited_torrent(
        hash: &str,
        name: &str,
        category: &str,
        added_on: i64,
        seeding_time_limit: i64,
        ratio_limit: f64,
    ) -> TorrentInfo {
        TorrentInfo {
            seeding_time_limit,
            ratio_limit,
            ..torrent(hash, name, category, added_on)
        }
    }
}
