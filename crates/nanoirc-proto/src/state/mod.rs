//! Sans-IO registration state machine.
//!
//! The machine never touches a socket or reads a clock. The caller feeds it
//! parsed messages and the current [`Instant`], and sends whatever
//! [`RegistrationAction`]s come back.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//!
//! use nanoirc_proto::state::{Phase, RegistrationAction, RegistrationConfig, RegistrationMachine};
//! use nanoirc_proto::MessageRef;
//!
//! let config = RegistrationConfig {
//!     channels: vec!["#nanochan".to_string()],
//!     ..RegistrationConfig::default()
//! };
//! let mut machine = RegistrationMachine::new(config);
//! let now = Instant::now();
//!
//! machine.begin();
//! let actions = machine.on_connected(now);
//! assert_eq!(actions.len(), 2); // NICK, USER
//!
//! let welcome = MessageRef::parse(":irc.example.org 001 nanobot :Welcome").unwrap();
//! let actions = machine.feed(now, &welcome);
//! assert!(matches!(actions[0], RegistrationAction::Registered { .. }));
//! assert_eq!(machine.phase(), Phase::JoiningChannels);
//! ```

mod machine;
mod transitions;

use std::fmt;
use std::time::Duration;

pub use machine::RegistrationMachine;

use crate::Message;

/// Registration phase of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    /// No transport.
    #[default]
    Disconnected,
    /// A connection attempt is in progress.
    Connecting,
    /// NICK/USER sent, waiting for 001.
    AwaitingWelcome,
    /// Welcomed; JOINs sent and acknowledgements outstanding.
    JoiningChannels,
    /// Registered and done joining.
    Ready,
}

impl Phase {
    /// Whether the server has accepted our registration.
    pub fn is_registered(self) -> bool {
        matches!(self, Phase::JoiningChannels | Phase::Ready)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Disconnected => "disconnected",
            Phase::Connecting => "connecting",
            Phase::AwaitingWelcome => "awaiting-welcome",
            Phase::JoiningChannels => "joining",
            Phase::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Client identity and timing limits for registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationConfig {
    /// Desired nickname.
    pub nickname: String,
    /// Username (ident).
    pub username: String,
    /// Real name / GECOS.
    pub realname: String,
    /// User mode parameter of `USER`.
    pub mode: String,
    /// Server password, if required.
    pub password: Option<String>,
    /// Channels to join after the welcome, in order.
    pub channels: Vec<String>,
    /// Suffixed nick retries before stalling.
    pub nick_retries: u8,
    /// Period between base nick retries while stalled.
    pub nick_slow_retry: Duration,
    /// How long to wait for join acknowledgements.
    pub join_wait: Duration,
    /// Silence before a keepalive PING is sent.
    pub ping_interval: Duration,
    /// Further silence after that PING before disconnecting.
    pub keepalive_timeout: Duration,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            nickname: "nanobot".to_string(),
            username: "nanobot".to_string(),
            realname: "Nano Bot".to_string(),
            mode: "8".to_string(),
            password: None,
            channels: Vec::new(),
            nick_retries: 3,
            nick_slow_retry: Duration::from_secs(60),
            join_wait: Duration::from_secs(10),
            ping_interval: Duration::from_secs(120),
            keepalive_timeout: Duration::from_secs(60),
        }
    }
}

/// Actions produced by the registration machine.
///
/// The caller is responsible for sending the messages.
#[derive(Clone, Debug, PartialEq)]
pub enum RegistrationAction {
    /// Queue this message.
    ///
    /// Boxed to keep the enum small.
    Send(Box<Message>),
    /// Queue this message ahead of everything not yet in flight.
    SendPriority(Box<Message>),
    /// 001 received; `nick` is the nickname the server accepted.
    Registered {
        /// Accepted nickname.
        nick: String,
    },
    /// Joining finished. Channels that never acknowledged are left out.
    Ready {
        /// Channels actually joined, in configured order.
        joined: Vec<String>,
    },
    /// Nick retries are exhausted; slow retry of the base nick begins.
    Stalled {
        /// Collisions seen so far.
        attempts: u8,
    },
    /// The session is over; the transport should be dropped.
    Disconnect(DisconnectReason),
}

impl RegistrationAction {
    /// The message to send, if this action carries one.
    pub fn message(&self) -> Option<&Message> {
        match self {
            RegistrationAction::Send(msg) | RegistrationAction::SendPriority(msg) => Some(&**msg),
            _ => None,
        }
    }
}

/// Why the machine gave up on the connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisconnectReason {
    /// No traffic for `ping_interval + keepalive_timeout`.
    KeepaliveTimeout,
    /// The server sent `ERROR`.
    ServerError(String),
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepaliveTimeout => f.write_str("keepalive timeout"),
            Self::ServerError(msg) => write!(f, "server error: {msg}"),
        }
    }
}
