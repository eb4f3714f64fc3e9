//! Configuration validation.
//!
//! Validates configuration at startup, before any network activity.

use nanoirc_proto::{ChannelExt, NickExt};
use thiserror::Error;

use super::Config;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("client.nick {0:?} is not a valid nickname")]
    InvalidNick(String),
    #[error("client.username is required")]
    MissingUsername,
    #[error("client.username {0:?} must not contain spaces")]
    InvalidUsername(String),
    #[error("client.realname is required")]
    MissingRealname,
    #[error("client.channels entry {0:?} is not a valid channel name")]
    InvalidChannel(String),
    #[error("server needs exactly one of address or host")]
    AmbiguousEndpoint,
    #[error("server.port must be non-zero")]
    ZeroPort,
    #[error("network.mode = \"static\" requires network.{0}")]
    MissingStaticField(&'static str),
    #[error("auth.password is required when auth is enabled")]
    MissingAuthPassword,
    #[error("auth.max_identity_len must be at least 2, got {0}")]
    IdentityLenTooSmall(usize),
    #[error("auth.prefix {0:?} must be a printable, non-space character")]
    InvalidCommandPrefix(char),
    #[error("auth.ttl_secs must be non-zero")]
    ZeroAuthTtl,
    #[error("auth.notify_memory must be non-zero")]
    ZeroNotifyMemory,
    #[error("limits.{0} must be non-zero")]
    ZeroLimit(&'static str),
    #[error("limits.reconnect_min_ms ({min}) exceeds limits.reconnect_max_ms ({max})")]
    BackoffRange { min: u64, max: u64 },
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Client identity
    let client = &config.client;
    if !client.nick.is_valid_nick() {
        errors.push(ValidationError::InvalidNick(client.nick.clone()));
    }
    if client.username.is_empty() {
        errors.push(ValidationError::MissingUsername);
    } else if client.username.contains([' ', '\r', '\n']) {
        errors.push(ValidationError::InvalidUsername(client.username.clone()));
    }
    if client.realname.is_empty() {
        errors.push(ValidationError::MissingRealname);
    }
    for channel in &client.channels {
        if !channel.is_channel_name() {
            errors.push(ValidationError::InvalidChannel(channel.clone()));
        }
    }

    // Server endpoint
    if config.server.endpoint().is_none() {
        errors.push(ValidationError::AmbiguousEndpoint);
    }
    if config.server.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    // Link addressing
    for field in config.network.missing_static_fields() {
        errors.push(ValidationError::MissingStaticField(field));
    }

    // Authorization
    let auth = &config.auth;
    if auth.enabled && auth.password.is_empty() {
        errors.push(ValidationError::MissingAuthPassword);
    }
    if auth.max_identity_len < 2 {
        errors.push(ValidationError::IdentityLenTooSmall(auth.max_identity_len));
    }
    if auth.prefix.is_whitespace() || auth.prefix.is_control() {
        errors.push(ValidationError::InvalidCommandPrefix(auth.prefix));
    }
    if auth.ttl_secs == Some(0) {
        errors.push(ValidationError::ZeroAuthTtl);
    }
    if auth.notify_memory == 0 {
        errors.push(ValidationError::ZeroNotifyMemory);
    }

    // Limits
    let limits = &config.limits;
    for (name, value) in [
        ("queue_capacity", limits.queue_capacity as u64),
        ("tick_ms", limits.tick_ms),
        ("ping_interval_secs", limits.ping_interval_secs),
        ("keepalive_timeout_secs", limits.keepalive_timeout_secs),
        ("nick_slow_retry_secs", limits.nick_slow_retry_secs),
        ("reconnect_min_ms", limits.reconnect_min_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroLimit(name));
        }
    }
    if limits.reconnect_min_ms > limits.reconnect_max_ms {
        errors.push(ValidationError::BackoffRange {
            min: limits.reconnect_min_ms,
            max: limits.reconnect_max_ms,
        });
    }
    if let Some(flood) = &limits.flood {
        if flood.burst == 0 {
            errors.push(ValidationError::ZeroLimit("flood.burst"));
        }
        if flood.period_ms == 0 {
            errors.push(ValidationError::ZeroLimit("flood.period_ms"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
