//! Informational commands.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};

use super::context::{Context, Handler};
use crate::error::HandlerResult;

/// `1d 02:03:04` style.
pub(crate) fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let (days, rem) = (secs / 86_400, secs % 86_400);
    let (hours, rem) = (rem / 3_600, rem % 3_600);
    let (mins, secs) = (rem / 60, rem % 60);
    format!("{days}d {hours:02}:{mins:02}:{secs:02}")
}

/// `help`
pub struct HelpHandler;

impl Handler for HelpHandler {
    fn handle(&self, ctx: &mut Context<'_>, _args: &str) -> HandlerResult {
        let names = ctx.registry.names().join(" ");
        ctx.reply(format!("commands: {names}"))
    }

    fn usage(&self) -> &'static str {
        "help"
    }
}

/// `ping`
pub struct PingHandler;

impl Handler for PingHandler {
    fn handle(&self, ctx: &mut Context<'_>, _args: &str) -> HandlerResult {
        ctx.reply("pong")
    }

    fn usage(&self) -> &'static str {
        "ping"
    }
}

/// `uptime`
pub struct UptimeHandler;

impl Handler for UptimeHandler {
    fn handle(&self, ctx: &mut Context<'_>, _args: &str) -> HandlerResult {
        let up = format_duration(ctx.now.saturating_duration_since(ctx.session.started_at));
        let text = match ctx.session.registration.registered_at() {
            Some(at) => format!(
                "up {up}, connected {}",
                format_duration(ctx.now.saturating_duration_since(at))
            ),
            None => format!("up {up}"),
        };
        ctx.reply(text)
    }

    fn usage(&self) -> &'static str {
        "uptime"
    }
}

/// `time`: current UTC time, RFC 3339.
pub struct TimeHandler;

impl Handler for TimeHandler {
    fn handle(&self, ctx: &mut Context<'_>, _args: &str) -> HandlerResult {
        ctx.reply(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    fn usage(&self) -> &'static str {
        "time"
    }
}

/// `status`
pub struct StatusHandler;

impl Handler for StatusHandler {
    fn handle(&self, ctx: &mut Context<'_>, _args: &str) -> HandlerResult {
        let session = &ctx.session;
        let out = ctx.outbox.stats();
        let joined = session.registration.joined_channels().join(",");
        let text = format!(
            "phase={} nick={} channels={} queue={}/{} in={} malformed={} overflows={} sent={} dropped={}",
            session.phase(),
            session.nick(),
            if joined.is_empty() { "-" } else { joined.as_str() },
            ctx.outbox.len(),
            ctx.outbox.capacity(),
            session.lines_in,
            session.malformed,
            ctx.framer.overflows,
            out.sent,
            out.dropped,
        );
        ctx.reply(text)
    }

    fn usage(&self) -> &'static str {
        "status"
    }
}
