//! Channel and identity commands.

use nanoirc_proto::{ChannelExt, Command, Message, NickExt};

use super::context::{Context, Handler};
use super::split_word;
use crate::error::{HandlerError, HandlerResult};

/// `join <#channel>`
pub struct JoinHandler;

impl Handler for JoinHandler {
    fn handle(&self, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
        let (channel, _) = split_word(args);
        if channel.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }
        if !channel.is_channel_name() {
            return Err(HandlerError::InvalidChannel(channel.to_string()));
        }
        ctx.send(Message::join(channel))
    }

    fn usage(&self) -> &'static str {
        "join <#channel>"
    }
}

/// `part <#channel> [reason]`
pub struct PartHandler;

impl Handler for PartHandler {
    fn handle(&self, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
        let (channel, reason) = split_word(args);
        if channel.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }
        if !channel.is_channel_name() {
            return Err(HandlerError::InvalidChannel(channel.to_string()));
        }
        let reason = (!reason.is_empty()).then(|| reason.to_string());
        ctx.send(Command::PART(channel.to_string(), reason).into())
    }

    fn usage(&self) -> &'static str {
        "part <#channel> [reason]"
    }
}

/// `say <target> <text>`
pub struct SayHandler;

impl Handler for SayHandler {
    fn handle(&self, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
        let (target, text) = split_word(args);
        if target.is_empty() || text.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }
        ctx.send(Message::privmsg(target, text))
    }

    fn usage(&self) -> &'static str {
        "say <target> <text>"
    }
}

/// `nick <newnick>`
pub struct NickHandler;

impl Handler for NickHandler {
    fn handle(&self, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
        let (nick, _) = split_word(args);
        if nick.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }
        if !nick.is_valid_nick() {
            return Err(HandlerError::ErroneousNickname(nick.to_string()));
        }
        ctx.send(Message::nick(nick))
    }

    fn usage(&self) -> &'static str {
        "nick <newnick>"
    }
}
