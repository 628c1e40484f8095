pub mod cache;
pub mod config;
pub mod limits;
pub mod matcher;
pub mod sync;
pub mod testing;
pub mod torrent_client;

pub use cache::{CacheError, JsonFileCache, SyncCache};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use limits::{adjusted_seeding_time_limit, derive_share_limits};
pub use matcher::{base_category, find_original};
pub use sync::{CycleReport, SeedLimitSync, SyncOptions, TorrentOutcome};
pub use torrent_client::{
    QBittorrentClient, ShareLimits, TorrentClient, TorrentClientError, TorrentFilters,
    TorrentInfo, TorrentState, GLOBAL_LIMIT, NO_LIMIT,
};
