//! Cross-seed share limit sync.
//!
//! Runs as a polling loop: each cycle walks the configured tags, pairs every
//! cross-seed with its original and pushes re-based share limits to the
//! client. A cache suppresses repeat work inside the expiry window.

mod config;
mod runner;
mod types;

pub use config::SyncOptions;
pub use runner::SeedLimitSync;
pub use types::{CycleReport, TorrentOutcome};
