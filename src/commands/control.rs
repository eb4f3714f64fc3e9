//! Session control.

use nanoirc_proto::Message;

use super::context::{Context, Handler};
use crate::error::HandlerResult;

/// `restart`: QUIT, then reconnect once the queue has drained.
pub struct RestartHandler;

impl Handler for RestartHandler {
    fn handle(&self, ctx: &mut Context<'_>, _args: &str) -> HandlerResult {
        ctx.send(Message::quit(format!("restart requested by {}", ctx.nick)))?;
        ctx.restart = true;
        Ok(())
    }

    fn usage(&self) -> &'static str {
        "restart"
    }
}
