use std::str::FromStr;

use crate::command::util::{check_middle_param, check_param};
use crate::command::Command;
use crate::error::{self, MessageParseError, ProtocolError};
use crate::prefix::is_valid_prefix_str;

use super::MessageRef;

/// An owned IRC message, usually one the client is about to send.
///
/// ```
/// use nanoirc_proto::Message;
///
/// let msg = Message::privmsg("#nanochan", "pong!");
/// assert_eq!(msg.encode().unwrap(), "PRIVMSG #nanochan :pong!\r\n");
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    /// Message source, if any. Clients normally leave this empty.
    pub prefix: Option<String>,
    /// The IRC command and its parameters.
    pub command: Command,
}

impl Message {
    /// Create a new message from raw components.
    #[must_use = "message creation result should be handled"]
    pub fn new(
        prefix: Option<&str>,
        command: &str,
        args: Vec<&str>,
    ) -> Result<Message, MessageParseError> {
        if let Some(p) = prefix {
            if !is_valid_prefix_str(p) {
                return Err(MessageParseError::InvalidArgument(format!(
                    "invalid prefix {p:?}"
                )));
            }
        }

        Ok(Message {
            prefix: prefix.map(str::to_owned),
            command: Command::new(command, args)?,
        })
    }

    /// `PRIVMSG target :text`
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Self {
        Command::PRIVMSG(target.into(), text.into()).into()
    }

    /// `NOTICE target :text`
    pub fn notice(target: impl Into<String>, text: impl Into<String>) -> Self {
        Command::NOTICE(target.into(), text.into()).into()
    }

    /// `JOIN channel`
    pub fn join(channel: impl Into<String>) -> Self {
        Command::JOIN(channel.into()).into()
    }

    /// `PART channel`
    pub fn part(channel: impl Into<String>) -> Self {
        Command::PART(channel.into(), None).into()
    }

    /// `NICK nickname`
    pub fn nick(nick: impl Into<String>) -> Self {
        Command::NICK(nick.into()).into()
    }

    /// `PING :token`
    pub fn ping(token: impl Into<String>) -> Self {
        Command::PING(token.into()).into()
    }

    /// `PONG :token`
    pub fn pong(token: impl Into<String>) -> Self {
        Command::PONG(token.into()).into()
    }

    /// `QUIT :message`
    pub fn quit(message: impl Into<String>) -> Self {
        Command::QUIT(Some(message.into())).into()
    }

    /// Serialize to a wire line terminated by CRLF.
    ///
    /// Fails if a parameter would break framing (embedded CR, LF, or NUL)
    /// or a non-final parameter contains a space or starts with `:`.
    pub fn encode(&self) -> Result<String, MessageParseError> {
        let params = self.command.params();
        if let Some((last, middle)) = params.split_last() {
            for p in middle {
                check_middle_param(p)?;
            }
            check_param(last)?;
        }

        let mut line = self.to_string();
        line.push_str("\r\n");
        Ok(line)
    }
}

impl From<Command> for Message {
    fn from(cmd: Command) -> Message {
        Message {
            prefix: None,
            command: cmd,
        }
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> error::Result<Message> {
        MessageRef::parse(s)
            .map(|m| m.to_message())
            .map_err(|cause| ProtocolError::InvalidMessage {
                string: s.to_owned(),
                cause,
            })
    }
}
