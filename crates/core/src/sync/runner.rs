//! Sync runner implementation.
//!
//! One cycle: log in, then for each tag list the tagged torrents and for each
//! one not in the cache find its original, derive limits, apply, record.
//! Client failures are logged and treated as "no data"; nothing aborts a cycle.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cache::SyncCache;
use crate::limits::derive_share_limits;
use crate::matcher::{base_category, find_original};
use crate::torrent_client::{ShareLimits, TorrentClient, TorrentFilters, TorrentInfo};

use super::config::SyncOptions;
use super::types::{CycleReport, TorrentOutcome};

/// Keeps cross-seeds' share limits in step with their originals.
pub struct SeedLimitSync {
    options: SyncOptions,
    client: Arc<dyn TorrentClient>,
    cache: Arc<dyn SyncCache>,
}

impl SeedLimitSync {
    pub fn new(
        options: SyncOptions,
        client: Arc<dyn TorrentClient>,
        cache: Arc<dyn SyncCache>,
    ) -> Self {
        Self {
            options,
            client,
            cache,
        }
    }

    /// Run cycles until the process is stopped, or once if no interval is set.
    pub async fn run_forever(&self) {
        loop {
            let report = self.run_cycle().await;
            debug!("Cycle report: {:?}", report);

            let Some(interval) = self.options.interval else {
                return;
            };
            info!(
                "Waiting for {} minutes before next run",
                interval.as_secs() / 60
            );
            tokio::time::sleep(interval).await;
        }
    }

    /// Run a single sync cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        match self.client.login().await {
            Ok(()) => {
                info!("Login to {} successful", self.client.name());
                report.logged_in = true;
            }
            Err(e) => warn!("Login to {} failed: {}", self.client.name(), e),
        }

        self.cache.reload();

        // Not reset per tag: once anything was updated, later tags with no
        // updates stay quiet.
        let mut updated = false;

        for tag in &self.options.tags {
            let torrents = match self.client.list_torrents(&TorrentFilters::by_tag(tag)).await {
                Ok(torrents) => torrents,
                Err(e) => {
                    warn!("Could not list torrents tagged {:?}: {}", tag, e);
                    report.tag_failures += 1;
                    Vec::new()
                }
            };
            debug!("{} torrents tagged {:?}", torrents.len(), tag);

            for torrent in &torrents {
                let outcome = self.sync_torrent(torrent).await;
                updated |= outcome.is_update();
                report.count(&outcome);
            }

            if !updated {
                info!("No torrents updated");
                report.no_update_notices += 1;
            }
        }

        report
    }

    /// Process one cross-seed.
    pub async fn sync_torrent(&self, cross_seed: &TorrentInfo) -> TorrentOutcome {
        if self.cache.is_fresh(&cross_seed.hash, Utc::now()) {
            debug!("Skipping {} ({}), recently synced", cross_seed.name, cross_seed.hash);
            return TorrentOutcome::Cached;
        }

        info!(
            name = %cross_seed.name,
            state = %cross_seed.state,
            hash = %cross_seed.hash,
            "Processing cross-seed"
        );

        let category = base_category(&cross_seed.category);
        let candidates = match self
            .client
            .list_torrents(&TorrentFilters::by_category(category))
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Could not list torrents in category {:?}: {}", category, e);
                return TorrentOutcome::LookupFailed;
            }
        };

        let Some(original) = find_original(cross_seed, &candidates) else {
            debug!(
                "No original named {:?} in category {:?}",
                cross_seed.name, category
            );
            return TorrentOutcome::Unmatched;
        };
        info!("Found original torrent: {}", original.hash);

        let limits = derive_share_limits(original, cross_seed);
        let outcome = self.apply(cross_seed, limits).await;
        if outcome.is_update() {
            self.record(&cross_seed.hash);
        }
        outcome
    }

    async fn apply(&self, cross_seed: &TorrentInfo, limits: ShareLimits) -> TorrentOutcome {
        if self.options.dry_run {
            info!(
                "Dry run: would set seed limits for torrent {} with seedingTimeLimit {} and ratioLimit {}",
                cross_seed.hash, limits.seeding_time_limit, limits.ratio_limit
            );
            return TorrentOutcome::DryRun(limits);
        }

        match self.client.set_share_limits(&cross_seed.hash, limits).await {
            Ok(()) => {
                info!(
                    "Seed limits set for torrent {} (seedingTimeLimit {}, ratioLimit {})",
                    cross_seed.hash, limits.seeding_time_limit, limits.ratio_limit
                );
                TorrentOutcome::Updated(limits)
            }
            Err(e) => {
                warn!("Failed to set seed limits for {}: {}", cross_seed.hash, e);
                TorrentOutcome::ApplyFailed
            }
        }
    }

    fn record(&self, hash: &str) {
        if let Err(e) = self.cache.record(hash, Utc::now()) {
            warn!("Failed to write sync cache for {}: {}", hash, e);
        }
    }
}
