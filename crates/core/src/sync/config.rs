//! Sync runner options.

use std::time::Duration;

use crate::config::Config;

/// The part of [`Config`] the sync runner acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Tags marking cross-seeds, processed in this order.
    pub tags: Vec<String>,

    /// Log the limits that would be set instead of setting them.
    /// Cache entries are still written.
    pub dry_run: bool,

    /// Pause between cycles. `None` runs a single cycle.
    pub interval: Option<Duration>,
}

impl SyncOptions {
    pub fn new(tags: Vec<String>) -> Self {
        Self {
            tags,
            dry_run: false,
            interval: None,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_interval(mut self, interval: Option<Duration>) -> Self {
        self.interval = interval;
        self
    }
}

impl From<&Config> for SyncOptions {
    fn from(config: &Config) -> Self {
        let interval = if config.is_scheduled() {
            Some(Duration::from_secs(
                (config.schedule_minutes as u64).saturating_mul(60),
            ))
        } else {
            None
        };

        Self {
            tags: config.tags.clone(),
            dry_run: config.dry_run,
            interval,
        }
    }
}
