use std::time::Duration;

use super::Defaults;
use crate::RawEnvironment;

/// Firehose subscription limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionConfig {
    pub max_buffer: usize,
    pub repo_backfill_limit: Duration,
}

pub(super) fn build(raw: &RawEnvironment, defaults: &Defaults) -> SubscriptionConfig {
    SubscriptionConfig {
        max_buffer: raw
            .max_subscription_buffer
            .unwrap_or(defaults.max_subscription_buffer),
        repo_backfill_limit: raw
            .repo_backfill_limit_ms
            .map_or(defaults.repo_backfill_limit, Duration::from_millis),
    }
}

// Passed through as given; URL shape is the consumer's concern.
pub(super) fn build_crawlers(raw: &RawEnvironment) -> Vec<String> {
    raw.crawlers.clone().unwrap_or_default()
}
