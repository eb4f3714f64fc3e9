//! # nanoirc-proto
//!
//! Sans-IO IRC client protocol core for small, single-threaded targets.
//!
//! ## Features
//!
//! - Fixed-capacity CRLF line framing with overflow resync
//! - Zero-copy message parsing with borrowed message types
//! - Owned outbound messages with wire-safe serialization
//! - Registration state machine (NICK/USER, nick collisions, joins, keepalive)

#![deny(clippy::all)]
#![warn(missing_docs)]

//! ## Quick Start
//!
//! ```rust
//! use nanoirc_proto::{LineFramer, Message, MessageRef};
//!
//! let mut framer: LineFramer = LineFramer::new();
//! let mut seen = Vec::new();
//! framer.feed(b":srv PING :abc123\r\n", |line| {
//!     let line = std::str::from_utf8(line.unwrap()).unwrap();
//!     let msg = MessageRef::parse(line).unwrap();
//!     seen.push(Message::pong(msg.trailing().unwrap()).encode().unwrap());
//! });
//! assert_eq!(seen, ["PONG :abc123\r\n"]);
//! ```

pub mod chan;
pub mod command;
pub mod error;
pub mod framer;
pub mod message;
pub mod nick;
pub mod prefix;
pub mod response;
pub mod state;

pub use self::chan::ChannelExt;
pub use self::command::{Command, CommandRef};
pub use self::error::{MessageParseError, ProtocolError};
pub use self::framer::{Frame, FramerStats, LineFramer, LINE_CAPACITY};
pub use self::message::{Message, MessageRef};
pub use self::nick::NickExt;
pub use self::prefix::PrefixRef;
pub use self::response::Response;
pub use self::state::{
    DisconnectReason, Phase, RegistrationAction, RegistrationConfig, RegistrationMachine,
};
