//! nanobot - a small IRC bot built on a sans-IO session engine.
//!
//! The [`engine::Engine`] owns all session state and is driven by calling
//! [`engine::Engine::tick`] with the current time and a
//! [`transport::Transport`]. The binary wires it to a TCP socket and a tokio
//! interval; tests drive it with scripted transports.

pub mod auth;
pub mod backoff;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod outbox;
pub mod session;
pub mod transport;
