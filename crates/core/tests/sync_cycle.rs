//! Sync cycle integration tests.
//!
//! These drive `SeedLimitSync` against the mock torrent client and a real
//! JSON cache file: tag listing -> matching -> limit derivation -> apply -> cache.

use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;

use seedsync_core::{
    testing::{fixtures, MockTorrentClient},
    JsonFileCache, SeedLimitSync, SyncCache, SyncOptions, TorrentClient, TorrentFilters,
    TorrentOutcome, NO_LIMIT,
};

const MINUTE: i64 = 60;

/// Test helper wiring the mock client and a temp cache file.
struct TestHarness {
    client: Arc<MockTorrentClient>,
    cache: Arc<JsonFileCache>,
    temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cache = Arc::new(JsonFileCache::with_expiry_days(
            temp_dir.path().join("torrent_cache.json"),
            14,
        ));

        Self {
            client: Arc::new(MockTorrentClient::new()),
            cache,
            temp_dir,
        }
    }

    fn sync(&self, tags: &[&str], dry_run: bool) -> SeedLimitSync {
        let options = SyncOptions::new(tags.iter().map(|t| t.to_string()).collect())
            .with_dry_run(dry_run);
        SeedLimitSync::new(
            options,
            Arc::clone(&self.client) as Arc<dyn TorrentClient>,
            Arc::clone(&self.cache) as Arc<dyn SyncCache>,
        )
    }

    fn reopen_cache(&self) -> JsonFileCache {
        JsonFileCache::with_expiry_days(self.temp_dir.path().join("torrent_cache.json"), 14)
    }

    /// Cross-seed "Foo" at minute 1000, original at minute 500 with 50 minutes.
    async fn add_foo_pair(&self) {
        self.client
            .add_torrent(
                fixtures::torrent("x1", "Foo", "movies.cross-seed", 1000 * MINUTE),
                &["cross-seed"],
            )
            .await;
        self.client
            .add_torrent(
                fixtures::limited_torrent("o1", "Foo", "movies", 500 * MINUTE, 50, 2.0),
                &[],
            )
            .await;
    }
}

#[tokio::test]
async fn test_cross_seed_past_original_boundary_gets_no_time_limit() {
    let harness = TestHarness::new();
    harness.add_foo_pair().await;

    let report = harness.sync(&["cross-seed"], false).run_cycle().await;

    let calls = harness.client.share_limit_calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].hash, "x1");
    assert_eq!(calls[0].limits.seeding_time_limit, NO_LIMIT);
    assert_eq!(calls[0].limits.ratio_limit, 2.0);

    assert!(harness.cache.is_fresh("x1", Utc::now()));
    assert!(harness.reopen_cache().is_fresh("x1", Utc::now()));

    assert!(report.logged_in);
    assert_eq!(report.seen, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(report.no_update_notices, 0);
}

#[tokio::test]
async fn test_cross_seed_gets_remaining_time_of_original() {
    let harness = TestHarness::new();
    harness
        .client
        .add_torrent(
            fixtures::torrent("x1", "Bar", "tv.cross-seed", 30 * MINUTE),
            &["cross-seed"],
        )
        .await;
    harness
        .client
        .add_torrent(fixtures::limited_torrent("o1", "Bar", "tv", 0, 100, -1.0), &[])
        .await;

    harness.sync(&["cross-seed"], false).run_cycle().await;

    let calls = harness.client.share_limit_calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].limits.seeding_time_limit, 70);
    assert_eq!(calls[0].limits.ratio_limit, -1.0);
}

#[tokio::test]
async fn test_cached_torrent_is_skipped_without_lookup() {
    let harness = TestHarness::new();
    harness.add_foo_pair().await;
    let sync = harness.sync(&["cross-seed"], false);

    sync.run_cycle().await;
    harness.client.clear_recorded().await;

    let report = sync.run_cycle().await;

    assert!(harness.client.share_limit_calls().await.is_empty());
    assert_eq!(
        harness.client.list_calls().await,
        vec![TorrentFilters::by_tag("cross-seed")]
    );
    assert_eq!(report.skipped_cached, 1);
    assert_eq!(report.updated, 0);
    assert_eq!(report.no_update_notices, 1);
}

#[tokio::test]
async fn test_expired_cache_entry_is_processed_again() {
    let harness = TestHarness::new();
    harness.add_foo_pair().await;
    harness
        .cache
        .record("x1", Utc::now() - chrono::TimeDelta::days(15))
        .unwrap();

    let report = harness.sync(&["cross-seed"], false).run_cycle().await;

    assert_eq!(report.updated, 1);
    assert_eq!(harness.client.share_limit_calls().await.len(), 1);
}

#[tokio::test]
async fn test_dry_run_records_cache_without_writing_limits() {
    let harness = TestHarness::new();
    harness.add_foo_pair().await;

    let report = harness.sync(&["cross-seed"], true).run_cycle().await;

    assert!(harness.client.share_limit_calls().await.is_empty());
    assert_eq!(report.dry_run, 1);
    assert_eq!(report.no_update_notices, 0);
    assert!(harness.cache.is_fresh("x1", Utc::now()));

    // A live run right after still skips the torrent until the entry expires.
    let report = harness.sync(&["cross-seed"], false).run_cycle().await;
    assert!(harness.client.share_limit_calls().await.is_empty());
    assert_eq!(report.skipped_cached, 1);
}

#[tokio::test]
async fn test_unmatched_cross_seed_is_skipped_silently() {
    let harness = TestHarness::new();
    harness
        .client
        .add_torrent(
            fixtures::torrent("x1", "Foo", "movies.cross-seed", 1000),
            &["cross-seed"],
        )
        .await;
    harness
        .client
        .add_torrent(fixtures::torrent("o1", "Foo (2019)", "movies", 500), &[])
        .await;

    let report = harness.sync(&["cross-seed"], false).run_cycle().await;

    assert!(harness.client.share_limit_calls().await.is_empty());
    assert!(harness.cache.last_synced("x1").is_none());
    assert_eq!(report.unmatched, 1);
    assert_eq!(report.no_update_notices, 1);
}

#[tokio::test]
async fn test_same_name_in_other_base_category_never_matches() {
    let harness = TestHarness::new();
    harness
        .client
        .add_torrent(fixtures::torrent("x1", "Foo", "movies.x", 1000), &["cross-seed"])
        .await;
    harness
        .client
        .add_torrent(fixtures::limited_torrent("o1", "Foo", "tv", 500, 50, 1.0), &[])
        .await;

    let report = harness.sync(&["cross-seed"], false).run_cycle().await;

    assert_eq!(report.unmatched, 1);
    assert!(harness.client.share_limit_calls().await.is_empty());
    assert!(harness
        .client
        .list_calls()
        .await
        .contains(&TorrentFilters::by_category("movies")));
}

#[tokio::test]
async fn test_first_matching_original_wins() {
    let harness = TestHarness::new();
    harness
        .client
        .add_torrent(fixtures::torrent("x1", "Foo", "movies.cross-seed", 0), &["cross-seed"])
        .await;
    harness
        .client
        .add_torrent(fixtures::limited_torrent("o1", "Foo", "movies", 0, 10, 1.0), &[])
        .await;
    harness
        .client
        .add_torrent(fixtures::limited_torrent("o2", "Foo", "movies", 0, 20, 3.0), &[])
        .await;

    harness.sync(&["cross-seed"], false).run_cycle().await;

    let calls = harness.client.share_limit_calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].limits.seeding_time_limit, 10);
    assert_eq!(calls[0].limits.ratio_limit, 1.0);
}

#[tokio::test]
async fn test_login_failure_does_not_stop_cycle() {
    let harness = TestHarness::new();
    harness.add_foo_pair().await;
    harness.client.set_fail_login(true).await;

    let report = harness.sync(&["cross-seed"], false).run_cycle().await;

    assert!(!report.logged_in);
    assert_eq!(report.updated, 1);
    assert_eq!(harness.client.login_count().await, 1);
}

#[tokio::test]
async fn test_failed_tag_listing_moves_on_to_next_tag() {
    let harness = TestHarness::new();
    harness
        .client
        .add_torrent(
            fixtures::torrent("x1", "Foo", "movies.cross-seed", 1000 * MINUTE),
            &["xseed"],
        )
        .await;
    harness
        .client
        .add_torrent(
            fixtures::limited_torrent("o1", "Foo", "movies", 500 * MINUTE, 50, 2.0),
            &[],
        )
        .await;
    harness.client.fail_tag("cross-seed").await;

    let report = harness.sync(&["cross-seed", "xseed"], false).run_cycle().await;

    assert_eq!(report.tag_failures, 1);
    assert_eq!(report.updated, 1);
    // Nothing updated after the failed first tag, then an update under the second.
    assert_eq!(report.no_update_notices, 1);
}

#[tokio::test]
async fn test_failed_category_listing_skips_torrent() {
    let harness = TestHarness::new();
    harness.add_foo_pair().await;
    harness.client.fail_category("movies").await;

    let report = harness.sync(&["cross-seed"], false).run_cycle().await;

    assert_eq!(report.lookup_failed, 1);
    assert!(harness.cache.last_synced("x1").is_none());
    assert!(harness.client.share_limit_calls().await.is_empty());
}

#[tokio::test]
async fn test_failed_apply_is_not_cached() {
    let harness = TestHarness::new();
    harness.add_foo_pair().await;
    harness.client.set_fail_set_limits(true).await;

    let report = harness.sync(&["cross-seed"], false).run_cycle().await;

    assert_eq!(report.apply_failed, 1);
    assert_eq!(report.updated, 0);
    assert_eq!(report.no_update_notices, 1);
    assert!(harness.cache.last_synced("x1").is_none());

    harness.client.set_fail_set_limits(false).await;
    let report = harness.sync(&["cross-seed"], false).run_cycle().await;
    assert_eq!(report.updated, 1);
}

#[tokio::test]
async fn test_update_flag_carries_across_tags() {
    let harness = TestHarness::new();
    harness.add_foo_pair().await;

    let report = harness
        .sync(&["cross-seed", "empty-tag"], false)
        .run_cycle()
        .await;

    assert!(report.any_updated());
    assert_eq!(report.no_update_notices, 0);
}

#[tokio::test]
async fn test_no_update_notice_per_tag_until_first_update() {
    let harness = TestHarness::new();
    harness.add_foo_pair().await;

    let report = harness
        .sync(&["empty-tag", "other-empty", "cross-seed", "last-empty"], false)
        .run_cycle()
        .await;

    assert_eq!(report.updated, 1);
    assert_eq!(report.no_update_notices, 2);
}

#[tokio::test]
async fn test_torrent_under_two_tags_is_synced_once() {
    let harness = TestHarness::new();
    harness
        .client
        .add_torrent(
            fixtures::torrent("x1", "Foo", "movies.cross-seed", 1000),
            &["cross-seed", "xseed"],
        )
        .await;
    harness
        .client
        .add_torrent(fixtures::limited_torrent("o1", "Foo", "movies", 0, 600, 1.0), &[])
        .await;

    let report = harness.sync(&["cross-seed", "xseed"], false).run_cycle().await;

    assert_eq!(report.seen, 2);
    assert_eq!(report.updated, 1);
    assert_eq!(report.skipped_cached, 1);
    assert_eq!(harness.client.share_limit_calls().await.len(), 1);
}

#[tokio::test]
async fn test_sync_torrent_outcome() {
    let harness = TestHarness::new();
    harness.add_foo_pair().await;
    let sync = harness.sync(&["cross-seed"], true);
    let cross = fixtures::torrent("x1", "Foo", "movies.cross-seed", 1000 * MINUTE);

    match sync.sync_torrent(&cross).await {
        TorrentOutcome::DryRun(limits) => {
            assert_eq!(limits.seeding_time_limit, NO_LIMIT);
            assert_eq!(limits.ratio_limit, 2.0);
        }
        other => panic!("expected DryRun, got {:?}", other),
    }
    assert_eq!(sync.sync_torrent(&cross).await, TorrentOutcome::Cached);
}

#[tokio::test]
async fn test_run_forever_without_interval_runs_once() {
    let harness = TestHarness::new();
    harness.add_foo_pair().await;

    harness.sync(&["cross-seed"], false).run_forever().await;

    assert_eq!(harness.client.login_count().await, 1);
    assert_eq!(harness.client.share_limit_calls().await.len(), 1);
}
