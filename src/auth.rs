//! Command authorization gate.
//!
//! One identity at a time may run gated commands. An identity is the
//! sender's full `nick!user@host` prefix, bounded to the configured storage
//! size. Passwords are compared as SHA-256 digests with a constant-time
//! equality check, so neither content nor length leaks through timing.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use crate::config::AuthConfig;

/// Authorization state of the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Unauthorized,
    Authorized {
        identity: String,
    },
    /// The authorization lifetime ran out. Behaves as unauthorized.
    Expired,
}

/// Gate deciding who may run gated commands.
#[derive(Debug)]
pub struct AuthGate {
    enabled: bool,
    secret: [u8; 32],
    max_identity_len: usize,
    ttl: Option<Duration>,
    notify_denied: bool,
    status: AuthStatus,
    authorized_at: Option<Instant>,
    /// Identities already told they were refused, oldest first.
    notified: VecDeque<String>,
    notify_memory: usize,
}

fn digest(input: &str) -> [u8; 32] {
    Sha256::digest(input.as_bytes()).into()
}

/// Truncate `identity` at a char boundary to at most `max_len - 1` bytes.
pub fn bound_identity(identity: &str, max_len: usize) -> &str {
    let limit = max_len.saturating_sub(1);
    if identity.len() <= limit {
        return identity;
    }
    let mut end = limit;
    while !identity.is_char_boundary(end) {
        end -= 1;
    }
    &identity[..end]
}

impl AuthGate {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            enabled: config.enabled,
            secret: digest(&config.password),
            max_identity_len: config.max_identity_len,
            ttl: config.ttl(),
            notify_denied: config.notify_denied,
            status: AuthStatus::Unauthorized,
            authorized_at: None,
            notified: VecDeque::new(),
            notify_memory: config.notify_memory,
        }
    }

    pub fn status(&self) -> &AuthStatus {
        &self.status
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Try to authorize `identity`. A match replaces any previous holder;
    /// a mismatch changes nothing.
    pub fn attempt_auth(&mut self, identity: &str, password: &str, now: Instant) -> bool {
        let matched: bool = digest(password)[..].ct_eq(&self.secret[..]).into();
        if !matched {
            debug!(identity, "authorization refused");
            return false;
        }

        let identity = bound_identity(identity, self.max_identity_len).to_string();
        self.notified.retain(|n| *n != identity);
        info!(%identity, "authorized");
        self.status = AuthStatus::Authorized { identity };
        self.authorized_at = Some(now);
        true
    }

    /// Whether `identity` may run gated commands now.
    pub fn is_authorized(&mut self, identity: &str, now: Instant) -> bool {
        if !self.enabled {
            return true;
        }
        self.expire(now);

        match &self.status {
            AuthStatus::Authorized { identity: held } => {
                held.as_str() == bound_identity(identity, self.max_identity_len)
            }
            AuthStatus::Unauthorized | AuthStatus::Expired => false,
        }
    }

    /// Apply the lifetime policy.
    pub fn expire(&mut self, now: Instant) {
        let (Some(ttl), Some(at)) = (self.ttl, self.authorized_at) else {
            return;
        };
        if now.saturating_duration_since(at) >= ttl {
            if let AuthStatus::Authorized { identity } = &self.status {
                info!(%identity, "authorization expired");
            }
            self.status = AuthStatus::Expired;
            self.authorized_at = None;
        }
    }

    /// Drop the current authorization.
    pub fn logout(&mut self) {
        if let AuthStatus::Authorized { identity } = &self.status {
            info!(%identity, "logged out");
        }
        self.status = AuthStatus::Unauthorized;
        self.authorized_at = None;
    }

    /// Whether a refusal notice should go to `identity`. True at most once
    /// per identity until it authorizes or the session resets. Only the
    /// last `notify_memory` identities are remembered.
    pub fn should_notify_denied(&mut self, identity: &str) -> bool {
        if !self.notify_denied {
            return false;
        }
        let identity = bound_identity(identity, self.max_identity_len);
        if self.notified.iter().any(|n| n == identity) {
            return false;
        }
        if self.notified.len() >= self.notify_memory {
            self.notified.pop_front();
        }
        self.notified.push_back(identity.to_string());
        true
    }

    /// Forget authorization and refusal notices.
    pub fn reset(&mut self) {
        self.status = AuthStatus::Unauthorized;
        self.authorized_at = None;
        self.notified.clear();
    }
}
