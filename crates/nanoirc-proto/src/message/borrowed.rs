//! Zero-copy borrowed message type.
//!
//! ```
//! use nanoirc_proto::MessageRef;
//!
//! let msg = MessageRef::parse(":nick!user@host PRIVMSG #channel :Hello!").unwrap();
//!
//! assert_eq!(msg.command_name(), "PRIVMSG");
//! assert_eq!(msg.source_nickname(), Some("nick"));
//! assert_eq!(msg.trailing(), Some("Hello!"));
//! ```

use std::fmt::{self, Display, Formatter};

use crate::chan::ChannelExt;
use crate::command::util::needs_colon_prefix;
use crate::command::{Command, CommandRef};
use crate::error::MessageParseError;
use crate::prefix::PrefixRef;
use crate::response::Response;

use super::nom_parser::ParsedMessage;
use super::Message;

/// An inbound IRC message borrowing from the framer's line buffer.
///
/// Nothing is allocated while parsing. Convert with [`MessageRef::to_message`]
/// when the message has to outlive the buffer.
#[derive(Clone, PartialEq, Debug)]
pub struct MessageRef<'a> {
    /// Raw tags string (without the leading `@`), if present.
    pub tags: Option<&'a str>,
    /// Parsed message prefix, if present.
    pub prefix: Option<PrefixRef<'a>>,
    /// The command with its arguments.
    pub command: CommandRef<'a>,
    /// The line as handed to [`MessageRef::parse`].
    pub raw: &'a str,
}

impl<'a> MessageRef<'a> {
    /// Parse one line. A trailing CR/LF is tolerated.
    #[must_use = "parsing result should be handled"]
    pub fn parse(s: &'a str) -> Result<MessageRef<'a>, MessageParseError> {
        let trimmed = s.trim_end_matches(['\r', '\n']);
        if trimmed.trim_start_matches(' ').is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let parsed = ParsedMessage::parse(trimmed).map_err(|(position, kind)| {
            MessageParseError::ParseContext {
                position,
                context: format!("{kind:?}"),
            }
        })?;

        Ok(MessageRef {
            tags: parsed.tags,
            prefix: parsed.prefix.map(PrefixRef::parse),
            command: CommandRef::new(parsed.command, parsed.params),
            raw: s,
        })
    }

    /// Get the command name as received.
    #[inline]
    pub fn command_name(&self) -> &'a str {
        self.command.name
    }

    /// Case-insensitive command name comparison.
    #[inline]
    pub fn is_command(&self, name: &str) -> bool {
        self.command.name.eq_ignore_ascii_case(name)
    }

    /// Get the command arguments.
    #[inline]
    pub fn args(&self) -> &[&'a str] {
        &self.command.args
    }

    /// Get a specific argument by index.
    #[inline]
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.command.args.get(index).copied()
    }

    /// The last argument, which carries free text for PRIVMSG and friends.
    #[inline]
    pub fn trailing(&self) -> Option<&'a str> {
        self.command.args.last().copied()
    }

    /// Get the source nickname from the prefix.
    ///
    /// Returns `None` if there's no prefix or if the prefix is a server name.
    pub fn source_nickname(&self) -> Option<&'a str> {
        self.prefix.as_ref().and_then(|p| p.nickname())
    }

    /// The full prefix (`nick!user@host`) as sent by the server.
    pub fn source_identity(&self) -> Option<&'a str> {
        self.prefix.as_ref().map(|p| p.raw)
    }

    /// Where a reply to this message should go.
    ///
    /// Channel messages are answered in the channel, private messages go
    /// back to the sender's nickname.
    pub fn response_target(&self) -> Option<&'a str> {
        let target = self.arg(0)?;
        if target.is_channel_name() {
            Some(target)
        } else {
            self.source_nickname()
        }
    }

    /// Whether this is a `PRIVMSG`.
    #[inline]
    pub fn is_privmsg(&self) -> bool {
        self.is_command("PRIVMSG")
    }

    /// Whether the command is a three digit numeric reply.
    pub fn is_numeric(&self) -> bool {
        let name = self.command.name;
        name.len() == 3 && name.bytes().all(|b| b.is_ascii_digit())
    }

    /// The numeric code, if the command is a numeric reply.
    pub fn numeric_code(&self) -> Option<u16> {
        if self.is_numeric() {
            self.command.name.parse().ok()
        } else {
            None
        }
    }

    /// The numeric as a known [`Response`].
    pub fn response(&self) -> Option<Response> {
        self.numeric_code().and_then(Response::from_code)
    }

    /// Copy into an owned [`Message`].
    ///
    /// Commands that fail typed parsing (missing arguments) are kept as
    /// [`Command::Raw`].
    pub fn to_message(&self) -> Message {
        let args: Vec<&str> = self.command.args.to_vec();
        let command = Command::new(self.command.name, args.clone()).unwrap_or_else(|_| {
            Command::Raw(
                self.command.name.to_owned(),
                args.into_iter().map(str::to_owned).collect(),
            )
        });

        Message {
            prefix: self.prefix.map(|p| p.raw.to_owned()),
            command,
        }
    }
}

impl Display for MessageRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix.raw)?;
        }
        f.write_str(self.command.name)?;

        let Some((trailing, middle)) = self.command.args.split_last() else {
            return Ok(());
        };
        for arg in middle {
            write!(f, " {arg}")?;
        }
        if needs_colon_prefix(trailing) {
            write!(f, " :{trailing}")
        } else {
            write!(f, " {trailing}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_privmsg() {
        let msg = MessageRef::parse(":alice!al@example.org PRIVMSG #nanochan :!auth letmein\r\n")
            .unwrap();
        assert!(msg.is_privmsg());
        assert_eq!(msg.source_nickname(), Some("alice"));
        assert_eq!(msg.source_identity(), Some("alice!al@example.org"));
        assert_eq!(msg.arg(0), Some("#nanochan"));
        assert_eq!(msg.trailing(), Some("!auth letmein"));
        assert!(!msg.is_numeric());
        assert_eq!(msg.response_target(), Some("#nanochan"));

        let private = MessageRef::parse(":alice!al@example.org PRIVMSG nanobot :!help").unwrap();
        assert_eq!(private.response_target(), Some("alice"));
    }

    #[test]
    fn test_parse_numeric() {
        let msg = MessageRef::parse(":irc.example.org 433 * nanobot :Nickname is already in use")
            .unwrap();
        assert_eq!(msg.numeric_code(), Some(433));
        assert_eq!(msg.response(), Some(Response::ERR_NICKNAMEINUSE));
        assert_eq!(msg.source_nickname(), None);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(MessageRef::parse(""), Err(MessageParseError::EmptyMessage));
        assert_eq!(MessageRef::parse("\r\n"), Err(MessageParseError::EmptyMessage));
        assert!(matches!(
            MessageRef::parse(":prefix.only"),
            Err(MessageParseError::ParseContext { .. })
        ));
    }

    #[test]
    fn test_case_insensitive_command() {
        let msg = MessageRef::parse("ping :abc").unwrap();
        assert!(msg.is_command("PING"));
        assert_eq!(msg.to_message().command, Command::PING("abc".into()));
    }

    #[test]
    fn test_to_message_falls_back_to_raw() {
        let msg = MessageRef::parse(":server NICK").unwrap();
        let owned = msg.to_message();
        assert_eq!(owned.command, Command::Raw("NICK".into(), vec![]));
        assert_eq!(owned.prefix.as_deref(), Some("server"));
    }

    #[test]
    fn test_display_reconstructs_line() {
        let raw = ":nick!u@h PRIVMSG #ch :hello there";
        assert_eq!(MessageRef::parse(raw).unwrap().to_string(), raw);

        let raw = ":srv 001 nanobot Welcome";
        assert_eq!(MessageRef::parse(raw).unwrap().to_string(), raw);
    }
}
