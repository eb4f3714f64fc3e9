//! Command handler registry and dispatch.

use std::cell::Cell;
use std::collections::HashMap;

use nanoirc_proto::Message;
use tracing::{debug, debug_span, info, warn};

use super::channel::{JoinHandler, NickHandler, PartHandler, SayHandler};
use super::context::{Context, Handler};
use super::control::RestartHandler;
use super::info::{HelpHandler, PingHandler, StatusHandler, TimeHandler, UptimeHandler};
use super::login::{AuthHandler, LogoutHandler};
use crate::error::HandlerResult;

/// Registry of command handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
    /// Command usage counters.
    command_counts: HashMap<&'static str, Cell<u64>>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        // Authorization
        handlers.insert("auth", Box::new(AuthHandler));
        handlers.insert("logout", Box::new(LogoutHandler));

        // Information
        handlers.insert("help", Box::new(HelpHandler));
        handlers.insert("ping", Box::new(PingHandler));
        handlers.insert("uptime", Box::new(UptimeHandler));
        handlers.insert("time", Box::new(TimeHandler));
        handlers.insert("status", Box::new(StatusHandler));

        // Channel and identity
        handlers.insert("join", Box::new(JoinHandler));
        handlers.insert("part", Box::new(PartHandler));
        handlers.insert("say", Box::new(SayHandler));
        handlers.insert("nick", Box::new(NickHandler));

        // Session control
        handlers.insert("restart", Box::new(RestartHandler));

        let command_counts = handlers.keys().map(|&cmd| (cmd, Cell::new(0))).collect();

        Self {
            handlers,
            command_counts,
        }
    }

    /// Command names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Get command usage statistics, most used first.
    pub fn get_command_stats(&self) -> Vec<(&'static str, u64)> {
        let mut stats: Vec<_> = self
            .command_counts
            .iter()
            .map(|(cmd, count)| (*cmd, count.get()))
            .filter(|(_, count)| *count > 0)
            .collect();
        stats.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        stats
    }

    /// Run command `name` for the sender in `ctx`.
    ///
    /// Unknown names are ignored. Gated commands from unauthorized senders
    /// are ignored too, apart from an optional one-time notice.
    pub fn dispatch(&self, ctx: &mut Context<'_>, name: &str, args: &str) -> HandlerResult {
        let name = name.to_ascii_lowercase();
        let Some((&cmd, handler)) = self.handlers.get_key_value(name.as_str()) else {
            debug!(command = %name, "unknown command");
            return Ok(());
        };

        if handler.gated() && !ctx.session.auth.is_authorized(ctx.identity, ctx.now) {
            info!(command = cmd, identity = ctx.identity, "unauthorized command");
            if ctx.session.auth.should_notify_denied(ctx.identity) {
                let notice = Message::notice(ctx.nick, "permission denied");
                ctx.send(notice)?;
            }
            return Ok(());
        }

        if let Some(counter) = self.command_counts.get(cmd) {
            counter.set(counter.get() + 1);
        }

        let span = debug_span!("command", command = cmd, nick = ctx.nick, reply_to = ctx.reply_to);
        let _enter = span.enter();

        let result = handler.handle(ctx, args);
        if let Err(ref e) = result {
            warn!(command = cmd, error = %e, code = e.error_code(), "command failed");
            if let Some(text) = e.to_reply(handler.usage()) {
                ctx.reply(text)?;
                return Ok(());
            }
        }
        result
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
