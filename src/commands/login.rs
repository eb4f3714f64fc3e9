//! Authorization commands.

use super::context::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};

/// `auth <password>`: the one command open to everyone.
pub struct AuthHandler;

impl Handler for AuthHandler {
    fn handle(&self, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
        if args.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }
        // Failures stay silent.
        if ctx.session.auth.attempt_auth(ctx.identity, args, ctx.now) {
            ctx.reply_private("authorized")?;
        }
        Ok(())
    }

    fn usage(&self) -> &'static str {
        "auth <password>"
    }

    fn gated(&self) -> bool {
        false
    }
}

/// `logout`
pub struct LogoutHandler;

impl Handler for LogoutHandler {
    fn handle(&self, ctx: &mut Context<'_>, _args: &str) -> HandlerResult {
        ctx.session.auth.logout();
        ctx.reply_private("logged out")
    }

    fn usage(&self) -> &'static str {
        "logout"
    }
}
