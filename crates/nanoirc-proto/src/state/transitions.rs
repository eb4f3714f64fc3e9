//! Per-phase message handling.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::command::Command;
use crate::message::MessageRef;
use crate::nick::collision_nick;
use crate::response::Response;

use super::machine::{send, RegistrationMachine};
use super::{Phase, RegistrationAction};

impl RegistrationMachine {
    pub(super) fn handle_awaiting_welcome(
        &mut self,
        now: Instant,
        msg: &MessageRef<'_>,
    ) -> Vec<RegistrationAction> {
        let mut actions = Vec::new();

        match msg.response() {
            Some(Response::RPL_WELCOME) => {
                if let Some(nick) = msg.arg(0).filter(|n| !n.is_empty() && *n != "*") {
                    self.nick = nick.to_string();
                }
                self.server_name = msg.prefix.map(|p| p.raw.to_string());
                self.registered_at = Some(now);
                self.stalled = false;
                info!(nick = %self.nick, server = ?self.server_name, "registered");
                actions.push(RegistrationAction::Registered {
                    nick: self.nick.clone(),
                });

                self.phase = Phase::JoiningChannels;
                self.join_started = Some(now);
                self.pending_joins = self.config.channels.clone();
                for channel in &self.config.channels {
                    actions.push(send(Command::JOIN(channel.clone())));
                }
                actions.extend(self.finish_joining());
            }
            Some(code) if code.is_nick_rejection() => {
                if self.stalled {
                    debug!(nick = %self.nick, "base nick still unavailable");
                } else if self.nick_attempts < self.config.nick_retries {
                    self.nick_attempts += 1;
                    self.nick = collision_nick(&self.config.nickname, self.nick_attempts);
                    self.last_nick_attempt = Some(now);
                    debug!(code = code.code(), nick = %self.nick, "nick rejected, retrying");
                    actions.push(send(Command::NICK(self.nick.clone())));
                } else {
                    self.stalled = true;
                    self.last_nick_attempt = Some(now);
                    warn!(
                        attempts = self.nick_attempts,
                        "nick retries exhausted, falling back to slow retry"
                    );
                    actions.push(RegistrationAction::Stalled {
                        attempts: self.nick_attempts,
                    });
                }
            }
            Some(Response::ERR_PASSWDMISMATCH) | Some(Response::ERR_YOUREBANNEDCREEP) => {
                warn!(code = msg.command_name(), reason = ?msg.trailing(), "registration refused");
            }
            _ => {}
        }

        actions
    }

    pub(super) fn handle_registered(&mut self, msg: &MessageRef<'_>) -> Vec<RegistrationAction> {
        let from_self = msg
            .source_nickname()
            .is_some_and(|n| n.eq_ignore_ascii_case(&self.nick));

        if let Some(code) = msg.response() {
            if code.is_join_failure() {
                if let Some(channel) = msg.arg(1) {
                    warn!(%channel, code = code.code(), "join failed");
                    self.pending_joins.retain(|c| !c.eq_ignore_ascii_case(channel));
                    return self.finish_joining().into_iter().collect();
                }
            }
            return Vec::new();
        }

        let upper = msg.command_name().to_ascii_uppercase();
        match upper.as_str() {
            "JOIN" if from_self => {
                let Some(channel) = msg.arg(0) else {
                    return Vec::new();
                };
                self.pending_joins.retain(|c| !c.eq_ignore_ascii_case(channel));
                if !self.joined.iter().any(|c| c.eq_ignore_ascii_case(channel)) {
                    debug!(%channel, "joined");
                    self.joined.push(channel.to_string());
                }
                self.finish_joining().into_iter().collect()
            }
            "PART" if from_self => {
                if let Some(channel) = msg.arg(0) {
                    debug!(%channel, "parted");
                    self.joined.retain(|c| !c.eq_ignore_ascii_case(channel));
                }
                Vec::new()
            }
            "KICK" => {
                if let (Some(channel), Some(victim)) = (msg.arg(0), msg.arg(1)) {
                    if victim.eq_ignore_ascii_case(&self.nick) {
                        warn!(%channel, by = ?msg.source_nickname(), "kicked");
                        self.joined.retain(|c| !c.eq_ignore_ascii_case(channel));
                        self.pending_joins.retain(|c| !c.eq_ignore_ascii_case(channel));
                        return self.finish_joining().into_iter().collect();
                    }
                }
                Vec::new()
            }
            "NICK" if from_self => {
                if let Some(nick) = msg.arg(0) {
                    info!(old = %self.nick, new = %nick, "nick changed");
                    self.nick = nick.to_string();
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}
