//! Share limit derivation for cross-seeds.
//!
//! A cross-seed is usually added later than its original. Copying the
//! original's seeding time limit verbatim would let the cross-seed run past
//! the moment the original stops, so the limit is re-based: both torrents
//! stop being time limited at the same wall-clock instant.

use chrono::{DateTime, TimeDelta, Utc};

use crate::torrent_client::{ShareLimits, TorrentInfo, NO_LIMIT};

/// Seeding time limit (minutes) for a cross-seed added at `cross_added_on`,
/// ending where the original's limit ends.
///
/// Returns [`NO_LIMIT`] when that instant is not after `cross_added_on`, or
/// when the original has no limit of its own (`-1` or the client's `-2`).
/// Half minutes round to even.
pub fn adjusted_seeding_time_limit(
    original_added_on: DateTime<Utc>,
    cross_added_on: DateTime<Utc>,
    original_limit_minutes: i64,
) -> i64 {
    if original_limit_minutes < 0 {
        return NO_LIMIT;
    }

    let Some(boundary) = TimeDelta::try_minutes(original_limit_minutes)
        .and_then(|limit| original_added_on.checked_add_signed(limit))
    else {
        return NO_LIMIT;
    };

    let remaining = boundary - cross_added_on;
    let minutes = (remaining.num_milliseconds() as f64 / 60_000.0).round_ties_even() as i64;

    if minutes <= 0 {
        NO_LIMIT
    } else {
        minutes
    }
}

/// Limits to push to `cross_seed`: the re-based time limit and the
/// original's ratio limit unchanged.
pub fn derive_share_limits(original: &TorrentInfo, cross_seed: &TorrentInfo) -> ShareLimits {
    ShareLimits {
        seeding_time_limit: adjusted_seeding_time_limit(
            original.added_on,
            cross_seed.added_on,
            original.seeding_time_limit,
        ),
        ratio_limit: original.ratio_limit,
    }
}
