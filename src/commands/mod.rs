//! Bot command handlers.
//!
//! A channel or private message whose text starts with the configured
//! prefix is a command: `!name args...`. Names are looked up in a static
//! table ([`Registry`]); every command except `auth` requires the sender
//! to be authorized.

mod channel;
mod context;
mod control;
mod info;
mod login;
mod registry;

pub use context::{Context, Handler};
pub use registry::Registry;

/// Split `text` into a command name and its argument text.
///
/// Returns `None` unless `text` starts with `prefix` followed by a name.
///
/// ```
/// use nanobot::commands::parse_command_line;
///
/// assert_eq!(parse_command_line("!say #a hi there", '!'), Some(("say", "#a hi there")));
/// assert_eq!(parse_command_line("!help", '!'), Some(("help", "")));
/// assert_eq!(parse_command_line("hello", '!'), None);
/// ```
pub fn parse_command_line(text: &str, prefix: char) -> Option<(&str, &str)> {
    let body = text.strip_prefix(prefix)?;
    let (name, args) = match body.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (body.trim_end(), ""),
    };
    if name.is_empty() {
        None
    } else {
        Some((name, args))
    }
}

/// Split off the first whitespace-separated word.
pub(crate) fn split_word(args: &str) -> (&str, &str) {
    match args.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (args, ""),
    }
}
