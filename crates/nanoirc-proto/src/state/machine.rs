//! Registration machine core: lifecycle entry points and timers.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::command::Command;
use crate::message::{Message, MessageRef};

use super::{DisconnectReason, Phase, RegistrationAction, RegistrationConfig};

/// Sans-IO state machine for connection registration.
///
/// Drives `PASS`/`NICK`/`USER`, nick collision retries, channel joins and
/// keepalive. Everything that arrives is fed through [`feed`], and
/// [`poll`] runs the timers once per tick.
///
/// [`feed`]: RegistrationMachine::feed
/// [`poll`]: RegistrationMachine::poll
#[derive(Clone, Debug)]
pub struct RegistrationMachine {
    pub(super) config: RegistrationConfig,
    pub(super) phase: Phase,
    /// Nick we are currently using or trying.
    pub(super) nick: String,
    pub(super) nick_attempts: u8,
    pub(super) stalled: bool,
    pub(super) last_nick_attempt: Option<Instant>,
    /// Channels whose JOIN is still unacknowledged.
    pub(super) pending_joins: Vec<String>,
    pub(super) joined: Vec<String>,
    pub(super) join_started: Option<Instant>,
    pub(super) last_activity: Option<Instant>,
    pub(super) ping_sent_at: Option<Instant>,
    pub(super) registered_at: Option<Instant>,
    /// Server name from the 001 prefix, used as the keepalive PING token.
    pub(super) server_name: Option<String>,
}

impl RegistrationMachine {
    /// Create a machine in [`Phase::Disconnected`].
    #[must_use]
    pub fn new(config: RegistrationConfig) -> Self {
        let nick = config.nickname.clone();
        Self {
            config,
            phase: Phase::Disconnected,
            nick,
            nick_attempts: 0,
            stalled: false,
            last_nick_attempt: None,
            pending_joins: Vec::new(),
            joined: Vec::new(),
            join_started: None,
            last_activity: None,
            ping_sent_at: None,
            registered_at: None,
            server_name: None,
        }
    }

    /// The configuration this machine was built with.
    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The nickname in use (or being tried).
    pub fn current_nick(&self) -> &str {
        &self.nick
    }

    /// Channels the server has confirmed, in join order.
    pub fn joined_channels(&self) -> &[String] {
        &self.joined
    }

    /// Whether nick retries are exhausted and slow retry is running.
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Nick collisions seen during this registration.
    pub fn nick_attempts(&self) -> u8 {
        self.nick_attempts
    }

    /// When 001 arrived, if it has.
    pub fn registered_at(&self) -> Option<Instant> {
        self.registered_at
    }

    /// Mark a connection attempt as started.
    pub fn begin(&mut self) {
        if self.phase != Phase::Disconnected {
            self.disconnect();
        }
        self.phase = Phase::Connecting;
    }

    /// The transport is up: emit `PASS` (if configured), `NICK` and `USER`.
    #[must_use]
    pub fn on_connected(&mut self, now: Instant) -> Vec<RegistrationAction> {
        if self.phase.is_registered() || self.phase == Phase::AwaitingWelcome {
            warn!(phase = %self.phase, "on_connected while already registering");
            self.disconnect();
        }

        self.phase = Phase::AwaitingWelcome;
        self.nick = self.config.nickname.clone();
        self.last_activity = Some(now);
        self.last_nick_attempt = Some(now);

        let mut actions = Vec::with_capacity(3);
        if let Some(ref pass) = self.config.password {
            actions.push(send(Command::PASS(pass.clone())));
        }
        actions.push(send(Command::NICK(self.nick.clone())));
        actions.push(send(Command::USER(
            self.config.username.clone(),
            self.config.mode.clone(),
            self.config.realname.clone(),
        )));

        info!(nick = %self.nick, "registering");
        actions
    }

    /// Process one inbound message.
    #[must_use]
    pub fn feed(&mut self, now: Instant, msg: &MessageRef<'_>) -> Vec<RegistrationAction> {
        self.last_activity = Some(now);
        self.ping_sent_at = None;

        if msg.is_command("PING") {
            let token = msg.trailing().unwrap_or_default();
            return vec![RegistrationAction::SendPriority(Box::new(Message::pong(
                token,
            )))];
        }

        if msg.is_command("ERROR") {
            let reason = msg.trailing().unwrap_or_default().to_string();
            warn!(%reason, "server sent ERROR");
            self.disconnect();
            return vec![RegistrationAction::Disconnect(DisconnectReason::ServerError(
                reason,
            ))];
        }

        match self.phase {
            Phase::Disconnected | Phase::Connecting => Vec::new(),
            Phase::AwaitingWelcome => self.handle_awaiting_welcome(now, msg),
            Phase::JoiningChannels | Phase::Ready => self.handle_registered(msg),
        }
    }

    /// Run timers: keepalive PING and timeout, slow nick retry, join wait.
    #[must_use]
    pub fn poll(&mut self, now: Instant) -> Vec<RegistrationAction> {
        let mut actions = Vec::new();
        if matches!(self.phase, Phase::Disconnected | Phase::Connecting) {
            return actions;
        }

        if let Some(sent_at) = self.ping_sent_at {
            if now.saturating_duration_since(sent_at) >= self.config.keepalive_timeout {
                warn!("keepalive timeout");
                self.disconnect();
                actions.push(RegistrationAction::Disconnect(
                    DisconnectReason::KeepaliveTimeout,
                ));
                return actions;
            }
        } else if let Some(last) = self.last_activity {
            if now.saturating_duration_since(last) >= self.config.ping_interval {
                let token = self
                    .server_name
                    .clone()
                    .unwrap_or_else(|| self.nick.clone());
                debug!(%token, "idle, sending keepalive PING");
                self.ping_sent_at = Some(now);
                actions.push(send(Command::PING(token)));
            }
        }

        if self.phase == Phase::AwaitingWelcome && self.stalled {
            let due = self
                .last_nick_attempt
                .map_or(true, |at| now.saturating_duration_since(at) >= self.config.nick_slow_retry);
            if due {
                self.nick = self.config.nickname.clone();
                self.last_nick_attempt = Some(now);
                debug!(nick = %self.nick, "slow nick retry");
                actions.push(send(Command::NICK(self.nick.clone())));
            }
        }

        if self.phase == Phase::JoiningChannels {
            let expired = self
                .join_started
                .map_or(true, |at| now.saturating_duration_since(at) >= self.config.join_wait);
            if expired {
                for channel in &self.pending_joins {
                    warn!(%channel, "no join acknowledgement");
                }
                self.pending_joins.clear();
                actions.extend(self.finish_joining());
            }
        }

        actions
    }

    /// Drop all connection state. Configuration survives.
    pub fn disconnect(&mut self) {
        if self.phase != Phase::Disconnected {
            info!(phase = %self.phase, "session reset");
        }
        let config = std::mem::take(&mut self.config);
        *self = Self::new(config);
    }

    pub(super) fn finish_joining(&mut self) -> Option<RegistrationAction> {
        if self.phase != Phase::JoiningChannels || !self.pending_joins.is_empty() {
            return None;
        }
        self.phase = Phase::Ready;
        self.join_started = None;
        let order = &self.config.channels;
        self.joined.sort_by_key(|joined| {
            order
                .iter()
                .position(|c| c.eq_ignore_ascii_case(joined))
                .unwrap_or(usize::MAX)
        });
        info!(joined = ?self.joined, "ready");
        Some(RegistrationAction::Ready {
            joined: self.joined.clone(),
        })
    }
}

pub(super) fn send(command: Command) -> RegistrationAction {
    RegistrationAction::Send(Box::new(command.into()))
}
