// Copyright (c) 2026 Swirl Foundation

//! Client tuning knobs.

use std::time::Duration;

/// Timing configuration for one round client.
///
/// Defaults suit a coordinator with multi-minute phases; tests shrink them.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// How often to reissue credentials during connection confirmation.
    /// Must be comfortably shorter than the confirmation phase.
    pub keep_alive_interval: Duration,

    /// First retry delay after a transport failure.
    pub backoff_base: Duration,

    /// Retry delays double up to this cap.
    pub backoff_cap: Duration,

    /// How often to poll for the unsigned transaction during signing.
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            keep_alive_interval: Duration::from_secs(10),
            backoff_base: Duration::from_millis(250),
            backoff_cap: Duration::from_secs(5),
            poll_interval: Duration::from_millis(500),
        }
    }
}
