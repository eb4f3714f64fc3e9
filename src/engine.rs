//! One-tick-per-call session driver.
//!
//! Each [`Engine::tick`] reads what the transport has, frames and parses
//! it, runs registration and command dispatch, advances the timers and
//! flushes the outbound queue. Nothing in here blocks or awaits; the caller
//! decides how often to tick.

use std::time::Instant;

use nanoirc_proto::{
    DisconnectReason, Frame, FramerStats, LineFramer, Message, MessageRef, Phase,
    RegistrationAction,
};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::commands::{Context, Registry, parse_command_line};
use crate::config::Config;
use crate::error::{OutboxError, TransportError};
use crate::outbox::Outbox;
use crate::session::Session;
use crate::transport::Transport;

/// Bytes requested from the transport per read.
pub const READ_CHUNK: usize = 512;

/// Reads per tick, so one busy tick cannot starve the timers.
const MAX_READS_PER_TICK: usize = 8;

/// What the caller should do after a tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// Keep ticking.
    Continue,
    /// A restart was requested and the QUIT has been written. Drop the
    /// transport and connect again.
    Reconnect,
    /// The session ended. Drop the transport and reconnect after a delay.
    Disconnected(DisconnectCause),
}

/// Why a session ended.
#[derive(Debug, Error)]
pub enum DisconnectCause {
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    #[error("{0}")]
    Protocol(DisconnectReason),
}

/// The bot's session engine.
pub struct Engine {
    framer: LineFramer,
    core: Core,
}

/// Everything but the framer, so a framed line can be borrowed while the
/// rest of the engine is mutated.
struct Core {
    session: Session,
    outbox: Outbox,
    registry: Registry,
    prefix: char,
    restart_pending: bool,
    disconnect: Option<DisconnectReason>,
}

impl Engine {
    pub fn new(config: &Config, now: Instant) -> Self {
        Self {
            framer: LineFramer::new(),
            core: Core {
                session: Session::new(config, now),
                outbox: Outbox::new(config.limits.queue_capacity, config.limits.flood, now),
                registry: Registry::new(),
                prefix: config.auth.prefix,
                restart_pending: false,
                disconnect: None,
            },
        }
    }

    pub fn session(&self) -> &Session {
        &self.core.session
    }

    pub fn outbox(&self) -> &Outbox {
        &self.core.outbox
    }

    pub fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.core.outbox
    }

    pub fn registry(&self) -> &Registry {
        &self.core.registry
    }

    pub fn framer_stats(&self) -> FramerStats {
        self.framer.stats()
    }

    /// A connection attempt is starting.
    pub fn connecting(&mut self) {
        self.core.session.registration.begin();
    }

    /// Queue a QUIT. The next tick writes it.
    pub fn shutdown(&mut self, reason: &str) -> Result<(), OutboxError> {
        info!(reason, "quitting");
        match self.core.outbox.enqueue(&Message::quit(reason)) {
            Ok(()) | Err(OutboxError::Overflow { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Run one cycle against `transport`.
    pub fn tick<T: Transport + ?Sized>(&mut self, now: Instant, transport: &mut T) -> TickOutcome {
        let phase = self.core.session.phase();

        if !transport.is_connected() {
            if matches!(phase, Phase::Disconnected | Phase::Connecting) {
                return TickOutcome::Continue;
            }
            self.reset();
            return TickOutcome::Disconnected(TransportError::Closed.into());
        }

        if matches!(phase, Phase::Disconnected | Phase::Connecting) {
            self.core.session.connections += 1;
            if phase == Phase::Disconnected {
                self.core.session.registration.begin();
            }
            let actions = self.core.session.registration.on_connected(now);
            self.core.apply(actions);
        }

        let mut buf = [0u8; READ_CHUNK];
        for _ in 0..MAX_READS_PER_TICK {
            match transport.recv(&mut buf) {
                Ok(0) => break,
                Ok(n) => self.ingest(now, &buf[..n]),
                Err(e) => {
                    self.reset();
                    return TickOutcome::Disconnected(e.into());
                }
            }
            if self.core.disconnect.is_some() {
                break;
            }
        }

        if self.core.disconnect.is_none() {
            let actions = self.core.session.registration.poll(now);
            self.core.apply(actions);
        }

        if let Some(reason) = self.core.disconnect.take() {
            self.reset();
            return TickOutcome::Disconnected(DisconnectCause::Protocol(reason));
        }

        if let Err(e) = self.core.outbox.flush(now, transport) {
            self.reset();
            return TickOutcome::Disconnected(e.into());
        }

        if self.core.restart_pending && self.core.outbox.is_empty() {
            info!("restarting session");
            self.reset();
            return TickOutcome::Reconnect;
        }

        TickOutcome::Continue
    }

    fn ingest(&mut self, now: Instant, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            let (used, frame) = self.framer.push(bytes);
            bytes = &bytes[used..];

            match frame {
                Some(Frame::Line(_)) => match self.framer.line_str() {
                    Ok(line) => self.core.handle_line(now, line, self.framer.stats()),
                    Err(e) => {
                        warn!(error = %e, "dropping undecodable line");
                        self.core.session.malformed += 1;
                    }
                },
                Some(Frame::TooLong { discarded }) => {
                    warn!(discarded, limit = self.framer.capacity(), "line too long");
                }
                None => {}
            }
        }
    }

    fn reset(&mut self) {
        self.core.session.reset();
        self.core.outbox.clear();
        self.core.restart_pending = false;
        self.core.disconnect = None;
        self.framer.reset();
    }
}

impl Core {
    fn handle_line(&mut self, now: Instant, line: &str, framer: FramerStats) {
        if self.disconnect.is_some() || line.is_empty() {
            return;
        }

        let msg = match MessageRef::parse(line) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(error = %e, line, "unparseable line");
                self.session.malformed += 1;
                return;
            }
        };
        self.session.lines_in += 1;
        trace!(line, "<<");

        let actions = self.session.registration.feed(now, &msg);
        self.apply(actions);

        if self.disconnect.is_none() && self.session.phase().is_registered() && msg.is_privmsg() {
            self.dispatch_command(now, &msg, framer);
        }
    }

    fn dispatch_command(&mut self, now: Instant, msg: &MessageRef<'_>, framer: FramerStats) {
        let Some(text) = msg.arg(1) else {
            return;
        };
        let Some((name, args)) = parse_command_line(text, self.prefix) else {
            return;
        };
        let (Some(identity), Some(nick), Some(reply_to)) = (
            msg.source_identity(),
            msg.source_nickname(),
            msg.response_target(),
        ) else {
            return;
        };

        let mut ctx = Context {
            nick,
            identity,
            reply_to,
            now,
            session: &mut self.session,
            outbox: &mut self.outbox,
            framer,
            registry: &self.registry,
            restart: false,
        };
        if let Err(e) = self.registry.dispatch(&mut ctx, name, args) {
            debug!(command = name, error = %e, "command not completed");
        }
        if ctx.restart {
            self.restart_pending = true;
        }
    }

    fn apply(&mut self, actions: Vec<RegistrationAction>) {
        for action in actions {
            match action {
                RegistrationAction::Send(msg) => self.queue(&msg, false),
                RegistrationAction::SendPriority(msg) => self.queue(&msg, true),
                RegistrationAction::Registered { nick } => {
                    info!(%nick, "registered with server");
                }
                RegistrationAction::Ready { joined } => {
                    info!(?joined, "session ready");
                }
                RegistrationAction::Stalled { attempts } => {
                    warn!(attempts, "nickname unavailable, retrying slowly");
                }
                RegistrationAction::Disconnect(reason) => {
                    self.disconnect = Some(reason);
                }
            }
        }
    }

    fn queue(&mut self, msg: &Message, priority: bool) {
        let result = if priority {
            self.outbox.enqueue_priority(msg)
        } else {
            self.outbox.enqueue(msg)
        };
        match result {
            Ok(()) | Err(OutboxError::Overflow { .. }) => {}
            Err(e) => warn!(error = %e, command = msg.command.name(), "message not queued"),
        }
    }
}
