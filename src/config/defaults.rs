//! Default value functions for configuration.
//!
//! These reproduce the reference deployment and back both the serde
//! defaults and the `Default` impls.

// =============================================================================
// Client Defaults
// =============================================================================

pub fn default_nick() -> String {
    "nanobot".to_string()
}

pub fn default_username() -> String {
    "nanobot".to_string()
}

pub fn default_realname() -> String {
    "Nano Bot".to_string()
}

pub fn default_user_mode() -> String {
    "8".to_string()
}

pub fn default_channels() -> Vec<String> {
    vec!["#nanochan".to_string()]
}

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_port() -> u16 {
    6667
}

// =============================================================================
// Auth Defaults
// =============================================================================

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

pub fn default_auth_password() -> String {
    "letmein".to_string()
}

/// Stored identity size, terminator included.
pub fn default_max_identity_len() -> usize {
    32
}

pub fn default_command_prefix() -> char {
    '!'
}

/// Refused identities remembered for one-shot notices.
pub fn default_notify_memory() -> usize {
    16
}

// =============================================================================
// Limits Defaults
// =============================================================================

pub fn default_queue_capacity() -> usize {
    50
}

pub fn default_nick_retries() -> u8 {
    3
}

pub fn default_nick_slow_retry_secs() -> u64 {
    60
}

pub fn default_join_wait_secs() -> u64 {
    10
}

pub fn default_ping_interval_secs() -> u64 {
    120
}

pub fn default_keepalive_timeout_secs() -> u64 {
    60
}

pub fn default_tick_ms() -> u64 {
    50
}

pub fn default_reconnect_min_ms() -> u64 {
    1_000
}

pub fn default_reconnect_max_ms() -> u64 {
    60_000
}

pub fn default_flood_burst() -> u32 {
    5
}

pub fn default_flood_period_ms() -> u64 {
    2_000
}
