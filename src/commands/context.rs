//! Command handler context and core types.

use std::time::Instant;

use nanoirc_proto::{FramerStats, Message};

use super::registry::Registry;
use crate::error::{HandlerResult, OutboxError};
use crate::outbox::Outbox;
use crate::session::Session;

/// A bot command.
pub trait Handler {
    /// Run the command. `args` is the trimmed text after the name.
    fn handle(&self, ctx: &mut Context<'_>, args: &str) -> HandlerResult;

    /// Argument synopsis for usage replies.
    fn usage(&self) -> &'static str;

    /// Whether the sender must be authorized.
    fn gated(&self) -> bool {
        true
    }
}

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Sender's nickname.
    pub nick: &'a str,
    /// Sender's full `nick!user@host`.
    pub identity: &'a str,
    /// Channel the command was said in, or the sender's nick.
    pub reply_to: &'a str,
    pub now: Instant,
    pub session: &'a mut Session,
    pub outbox: &'a mut Outbox,
    /// Framer counters at dispatch time.
    pub framer: FramerStats,
    /// Command table, for `help` and usage counters.
    pub registry: &'a Registry,
    /// Set by `restart`; the engine reconnects once the queue drains.
    pub restart: bool,
}

impl Context<'_> {
    /// Queue a message. Overflow evicts an older line and still succeeds.
    pub fn send(&mut self, msg: Message) -> HandlerResult {
        match self.outbox.enqueue(&msg) {
            Ok(()) | Err(OutboxError::Overflow { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Answer where the command came from.
    pub fn reply(&mut self, text: impl Into<String>) -> HandlerResult {
        let msg = Message::privmsg(self.reply_to, text);
        self.send(msg)
    }

    /// Answer the sender directly.
    pub fn reply_private(&mut self, text: impl Into<String>) -> HandlerResult {
        let msg = Message::privmsg(self.nick, text);
        self.send(msg)
    }
}
