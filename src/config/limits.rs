//! Queue, retry, keepalive and flood limits.

use std::time::Duration;

use serde::Deserialize;

use super::defaults::*;

/// Resource bounds and timers.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Outbound queue capacity in lines (default: 50).
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Suffixed nick retries before slow retry (default: 3).
    #[serde(default = "default_nick_retries")]
    pub nick_retries: u8,
    /// Seconds between base nick retries once stalled (default: 60).
    #[serde(default = "default_nick_slow_retry_secs")]
    pub nick_slow_retry_secs: u64,
    /// Seconds to wait for JOIN acknowledgements (default: 10).
    #[serde(default = "default_join_wait_secs")]
    pub join_wait_secs: u64,
    /// Seconds of silence before a keepalive PING (default: 120).
    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,
    /// Seconds after that PING before the link is declared dead (default: 60).
    /// Total silence before disconnect = ping + keepalive.
    #[serde(default = "default_keepalive_timeout_secs")]
    pub keepalive_timeout_secs: u64,
    /// Engine tick period in milliseconds (default: 50).
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// First reconnect delay in milliseconds (default: 1000).
    #[serde(default = "default_reconnect_min_ms")]
    pub reconnect_min_ms: u64,
    /// Reconnect delay ceiling in milliseconds (default: 60000).
    #[serde(default = "default_reconnect_max_ms")]
    pub reconnect_max_ms: u64,
    /// Outbound flood control. Off when absent.
    #[serde(default)]
    pub flood: Option<FloodConfig>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            nick_retries: default_nick_retries(),
            nick_slow_retry_secs: default_nick_slow_retry_secs(),
            join_wait_secs: default_join_wait_secs(),
            ping_interval_secs: default_ping_interval_secs(),
            keepalive_timeout_secs: default_keepalive_timeout_secs(),
            tick_ms: default_tick_ms(),
            reconnect_min_ms: default_reconnect_min_ms(),
            reconnect_max_ms: default_reconnect_max_ms(),
            flood: None,
        }
    }
}

impl LimitsConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn reconnect_bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.reconnect_min_ms),
            Duration::from_millis(self.reconnect_max_ms),
        )
    }
}

/// Token bucket for outbound lines: `burst` lines at once, then one line
/// per `period_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FloodConfig {
    #[serde(default = "default_flood_burst")]
    pub burst: u32,
    #[serde(default = "default_flood_period_ms")]
    pub period_ms: u64,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            burst: default_flood_burst(),
            period_ms: default_flood_period_ms(),
        }
    }
}

impl FloodConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}
