//! The single mutable session state.
//!
//! Registration and authorization write it; command handlers read it.
//! Everything here except `started_at` and the lifetime counters is
//! cleared when the connection drops.

use std::time::Instant;

use nanoirc_proto::{Phase, RegistrationMachine};

use crate::auth::AuthGate;
use crate::config::Config;

#[derive(Debug)]
pub struct Session {
    pub registration: RegistrationMachine,
    pub auth: AuthGate,
    /// When the engine was created. Survives reconnects.
    pub started_at: Instant,
    /// Successful transport connections so far.
    pub connections: u64,
    /// Inbound lines parsed, over the engine's lifetime.
    pub lines_in: u64,
    /// Inbound lines that failed UTF-8 or message parsing.
    pub malformed: u64,
}

impl Session {
    pub fn new(config: &Config, now: Instant) -> Self {
        Self {
            registration: RegistrationMachine::new(config.registration()),
            auth: AuthGate::new(&config.auth),
            started_at: now,
            connections: 0,
            lines_in: 0,
            malformed: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.registration.phase()
    }

    pub fn nick(&self) -> &str {
        self.registration.current_nick()
    }

    /// Forget everything tied to the connection.
    pub fn reset(&mut self) {
        self.registration.disconnect();
        self.auth.reset();
    }
}
