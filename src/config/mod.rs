//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions and loading
//! - [`network`]: Link-layer addressing handed to the link driver
//! - [`limits`]: Queue, retry, keepalive and flood limits
//! - [`validation`]: Startup checks returning every error at once

mod defaults;
mod limits;
mod network;
mod types;
mod validation;

pub use limits::{FloodConfig, LimitsConfig};
pub use network::{AddressMode, MacAddress, NetworkConfig};
pub use types::{AuthConfig, ClientConfig, Config, ConfigError, Endpoint, ServerConfig};
pub use validation::{ValidationError, validate};
