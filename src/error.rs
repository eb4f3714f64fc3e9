//! Unified error handling for nanobot.
//!
//! One `thiserror` enum per layer: transport, outbound queue, and command
//! handlers. Configuration errors live in [`crate::config`].

use nanoirc_proto::MessageParseError;
use thiserror::Error;

// ============================================================================
// Transport Errors
// ============================================================================

/// Faults of the byte transport. Every variant ends the session.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection closed")]
    Closed,

    #[error("no address for {0}")]
    Unresolved(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Outbox Errors (queue operations)
// ============================================================================

/// Outbound queue errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutboxError {
    /// The queue was full; the oldest waiting line was dropped to make room
    /// and the new line was queued.
    #[error("outbound queue overflow, dropped {dropped:?}")]
    Overflow { dropped: String },

    /// The queue was full and only the in-flight line remains; nothing was
    /// queued.
    #[error("outbound queue full")]
    Full,

    #[error("unsendable message: {0}")]
    Encode(#[from] MessageParseError),
}

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("not a channel: {0}")]
    InvalidChannel(String),

    #[error("erroneous nickname: {0}")]
    ErroneousNickname(String),

    #[error("queue error: {0}")]
    Queue(#[from] OutboxError),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams => "need_more_params",
            Self::InvalidChannel(_) => "invalid_channel",
            Self::ErroneousNickname(_) => "erroneous_nickname",
            Self::Queue(_) => "queue_error",
        }
    }

    /// Text to send back to the caller, if any.
    ///
    /// Returns `None` for errors that don't warrant a visible reply.
    pub fn to_reply(&self, usage: &str) -> Option<String> {
        match self {
            Self::NeedMoreParams => Some(format!("usage: {usage}")),
            Self::InvalidChannel(chan) => Some(format!("{chan} is not a channel")),
            Self::ErroneousNickname(nick) => Some(format!("{nick} is not a valid nickname")),
            Self::Queue(_) => None,
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;
