//! Error types for the IRC protocol core.
//!
//! This module defines error types for framing faults, message parsing
//! failures, and outbound line construction.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// Line exceeded the framer capacity and was discarded.
    #[error("line too long: {discarded} bytes discarded (limit: {limit})")]
    LineTooLong {
        /// Bytes dropped while resynchronizing.
        discarded: usize,
        /// Framer capacity.
        limit: usize,
    },

    /// Invalid UTF-8 bytes in an inbound line.
    #[error("invalid UTF-8 in line at byte {byte_pos}")]
    InvalidUtf8 {
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
        /// Optional command name extracted from the raw line.
        command_hint: Option<String>,
    },

    /// Failed to parse an IRC message.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The invalid message string.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors encountered when parsing or building IRC messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Message was empty.
    #[error("empty message")]
    EmptyMessage,

    /// Command was invalid or missing.
    #[error("invalid command")]
    InvalidCommand,

    /// Not enough arguments for command.
    #[error("not enough arguments: expected {expected}, got {got}")]
    NotEnoughArguments {
        /// Expected number of arguments.
        expected: usize,
        /// Actual number of arguments.
        got: usize,
    },

    /// An argument would break the wire format (CR, LF, NUL, or a middle
    /// parameter containing a space or leading colon).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Parse failure with position information.
    #[error("parse error at position {position}: {context}")]
    ParseContext {
        /// Byte position of the failure.
        position: usize,
        /// Human readable description.
        context: String,
    },
}

/// Extract the IRC command name from raw line bytes (for error reporting).
///
/// Skips an optional tags section (`@...`) and prefix (`:...`), then returns
/// the leading alphanumeric run. Works on bytes that are not valid UTF-8.
pub(crate) fn extract_command_hint(raw_line: &[u8]) -> Option<String> {
    let mut pos = 0;

    for marker in [b'@', b':'] {
        if raw_line.get(pos) == Some(&marker) {
            while pos < raw_line.len() && raw_line[pos] != b' ' {
                pos += 1;
            }
            while raw_line.get(pos) == Some(&b' ') {
                pos += 1;
            }
        }
    }

    let cmd_start = pos;
    while pos < raw_line.len() && raw_line[pos].is_ascii_alphanumeric() {
        pos += 1;
    }

    if pos > cmd_start {
        String::from_utf8(raw_line[cmd_start..pos].to_vec()).ok()
    } else {
        None
    }
}
