//! Types for the sync runner.

use crate::torrent_client::ShareLimits;

/// What happened to one cross-seed during a cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TorrentOutcome {
    /// Synced within the expiry window; no client calls made.
    Cached,
    /// The original's category could not be listed.
    LookupFailed,
    /// No torrent with the same name in the base category.
    Unmatched,
    /// Limits pushed to the client.
    Updated(ShareLimits),
    /// Limits only logged (dry run), cache still recorded.
    DryRun(ShareLimits),
    /// The client rejected the new limits.
    ApplyFailed,
}

impl TorrentOutcome {
    /// Whether this counts as an update for the "no torrents updated" notice.
    pub fn is_update(&self) -> bool {
        matches!(self, TorrentOutcome::Updated(_) | TorrentOutcome::DryRun(_))
    }
}

/// Summary of one sync cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Whether login succeeded.
    pub logged_in: bool,
    /// Tagged torrents seen, counting a torrent once per tag it was found under.
    pub seen: usize,
    pub updated: usize,
    pub dry_run: usize,
    pub skipped_cached: usize,
    pub unmatched: usize,
    pub lookup_failed: usize,
    pub apply_failed: usize,
    /// Tags whose listing failed.
    pub tag_failures: usize,
    /// How many times "No torrents updated" was emitted.
    pub no_update_notices: usize,
}

impl CycleReport {
    pub(crate) fn count(&mut self, outcome: &TorrentOutcome) {
        self.seen += 1;
        match outcome {
            TorrentOutcome::Cached => self.skipped_cached += 1,
            TorrentOutcome::LookupFailed => self.lookup_failed += 1,
            TorrentOutcome::Unmatched => self.unmatched += 1,
            TorrentOutcome::Updated(_) => self.updated += 1,
            TorrentOutcome::DryRun(_) => self.dry_run += 1,
            TorrentOutcome::ApplyFailed => self.apply_failed += 1,
        }
    }

    /// Whether anything was updated (or would have been, in a dry run).
    pub fn any_updated(&self) -> bool {
        self.updated + self.dry_run > 0
    }
}
