//! IRC command types.
//!
//! Only the commands a bot client sends or reacts to are modelled; anything
//! else is carried as [`Command::Raw`].
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol

use smallvec::SmallVec;

/// IRC command with its parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    /// `PASS password`
    PASS(String),
    /// `NICK nickname`
    NICK(String),
    /// `USER username mode * :realname`
    USER(String, String, String),
    /// `JOIN channel`
    JOIN(String),
    /// `PART channel [:reason]`
    PART(String, Option<String>),
    /// `QUIT [:message]`
    QUIT(Option<String>),
    /// `PING :token`
    PING(String),
    /// `PONG :token`
    PONG(String),
    /// `PRIVMSG target :text`
    PRIVMSG(String, String),
    /// `NOTICE target :text`
    NOTICE(String, String),
    /// `KICK channel nick [:reason]`
    KICK(String, String, Option<String>),
    /// `ERROR :reason`
    ERROR(String),
    /// Any other command or numeric, verbatim.
    Raw(String, Vec<String>),
}

/// A borrowed command name and its arguments.
///
/// Used for zero-copy parsing of inbound lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandRef<'a> {
    /// Command name
    pub name: &'a str,
    /// Command arguments, the trailing one last
    pub args: SmallVec<[&'a str; 15]>,
}

impl<'a> CommandRef<'a> {
    /// Build from a name and argument list.
    pub fn new(name: &'a str, args: SmallVec<[&'a str; 15]>) -> Self {
        Self { name, args }
    }
}

impl Command {
    /// The command name as it appears on the wire.
    ///
    /// ```
    /// use nanoirc_proto::Command;
    ///
    /// assert_eq!(Command::PONG("abc".into()).name(), "PONG");
    /// assert_eq!(Command::Raw("001".into(), vec![]).name(), "001");
    /// ```
    pub fn name(&self) -> &str {
        match self {
            Command::PASS(_) => "PASS",
            Command::NICK(_) => "NICK",
            Command::USER(..) => "USER",
            Command::JOIN(_) => "JOIN",
            Command::PART(..) => "PART",
            Command::QUIT(_) => "QUIT",
            Command::PING(_) => "PING",
            Command::PONG(_) => "PONG",
            Command::PRIVMSG(..) => "PRIVMSG",
            Command::NOTICE(..) => "NOTICE",
            Command::KICK(..) => "KICK",
            Command::ERROR(_) => "ERROR",
            Command::Raw(name, _) => name,
        }
    }

    /// The parameters in wire order.
    pub fn params(&self) -> Vec<&str> {
        match self {
            Command::PASS(p) | Command::NICK(p) | Command::JOIN(p) => vec![p.as_str()],
            Command::USER(user, mode, real) => vec![user.as_str(), mode.as_str(), "*", real.as_str()],
            Command::PART(chan, reason) => {
                let mut v = vec![chan.as_str()];
                v.extend(reason.as_deref());
                v
            }
            Command::QUIT(msg) => msg.as_deref().into_iter().collect(),
            Command::PING(t) | Command::PONG(t) | Command::ERROR(t) => vec![t.as_str()],
            Command::PRIVMSG(target, text) | Command::NOTICE(target, text) => {
                vec![target.as_str(), text.as_str()]
            }
            Command::KICK(chan, nick, reason) => {
                let mut v = vec![chan.as_str(), nick.as_str()];
                v.extend(reason.as_deref());
                v
            }
            Command::Raw(_, args) => args.iter().map(String::as_str).collect(),
        }
    }
}
