//! Core configuration types and loading.

use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

use nanoirc_proto::RegistrationConfig;
use nanoirc_proto::chan::split_channel_list;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::defaults::*;
use super::limits::LimitsConfig;
use super::network::NetworkConfig;
use super::validation::{ValidationError, validate};

/// The configuration compiled into the binary.
pub const EMBEDDED: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/nanobot.toml"));

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Bot configuration. Built once at startup and never mutated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Interface addressing for the link driver.
    #[serde(default)]
    pub network: NetworkConfig,
    /// IRC server endpoint.
    #[serde(default)]
    pub server: ServerConfig,
    /// Client identity and channels.
    #[serde(default)]
    pub client: ClientConfig,
    /// Command authorization.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Queue, retry and timer limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Config {
    /// Parse a TOML document without validating it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse and validate a TOML document.
    pub fn load_str(content: &str) -> Result<Self, ConfigError> {
        let config = Self::from_toml(content)?;
        validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Load the configuration compiled into the binary.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::load_str(EMBEDDED)
    }

    /// Identity and timers for the registration machine.
    pub fn registration(&self) -> RegistrationConfig {
        RegistrationConfig {
            nickname: self.client.nick.clone(),
            username: self.client.username.clone(),
            realname: self.client.realname.clone(),
            mode: self.client.mode.clone(),
            password: self.server.password.clone(),
            channels: self.client.channels.clone(),
            nick_retries: self.limits.nick_retries,
            nick_slow_retry: Duration::from_secs(self.limits.nick_slow_retry_secs),
            join_wait: Duration::from_secs(self.limits.join_wait_secs),
            ping_interval: Duration::from_secs(self.limits.ping_interval_secs),
            keepalive_timeout: Duration::from_secs(self.limits.keepalive_timeout_secs),
        }
    }
}

/// Where the server lives: a literal address or a name for the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Address(Ipv4Addr),
    Host(String),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Address(ip) => write!(f, "{ip}"),
            Endpoint::Host(host) => f.write_str(host),
        }
    }
}

/// IRC server connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Literal server address. Exclusive with `host`.
    pub address: Option<Ipv4Addr>,
    /// Server hostname. Exclusive with `address`.
    pub host: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connection password sent as PASS (optional).
    pub password: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: None,
            host: Some("card.freenode.net".to_string()),
            port: default_port(),
            password: None,
        }
    }
}

impl ServerConfig {
    /// The configured endpoint, if exactly one of `address`/`host` is set.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match (&self.address, &self.host) {
            (Some(ip), None) => Some(Endpoint::Address(*ip)),
            (None, Some(host)) => Some(Endpoint::Host(host.clone())),
            _ => None,
        }
    }

    /// `host:port` suitable for a resolver.
    pub fn target(&self) -> Option<String> {
        self.endpoint().map(|ep| format!("{ep}:{}", self.port))
    }
}

/// Client identity.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_nick")]
    pub nick: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Mode parameter of USER (default: "8", invisible).
    #[serde(default = "default_user_mode")]
    pub mode: String,
    /// Comma-separated in TOML, split once at load.
    #[serde(
        default = "default_channels",
        deserialize_with = "deserialize_channel_list"
    )]
    pub channels: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            nick: default_nick(),
            username: default_username(),
            realname: default_realname(),
            mode: default_user_mode(),
            channels: default_channels(),
        }
    }
}

fn deserialize_channel_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(split_channel_list(&raw))
}

/// Command authorization settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// When false every sender may run every command.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Shared secret for `auth`.
    #[serde(default = "default_auth_password")]
    pub password: String,
    /// Stored identity size including the terminator; identities are
    /// truncated to one byte less.
    #[serde(default = "default_max_identity_len")]
    pub max_identity_len: usize,
    /// Character that marks a channel message as a command.
    #[serde(default = "default_command_prefix")]
    pub prefix: char,
    /// Authorization lifetime in seconds. Never expires when absent.
    pub ttl_secs: Option<u64>,
    /// Tell unauthorized senders once that they were refused.
    #[serde(default)]
    pub notify_denied: bool,
    /// How many refused identities are remembered for `notify_denied`.
    #[serde(default = "default_notify_memory")]
    pub notify_memory: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            password: default_auth_password(),
            max_identity_len: default_max_identity_len(),
            prefix: default_command_prefix(),
            ttl_secs: None,
            notify_denied: false,
            notify_memory: default_notify_memory(),
        }
    }
}

impl AuthConfig {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}
