//! Link-layer addressing.
//!
//! The bot never configures an interface itself; these values are handed to
//! the link driver before the first connection attempt.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::Deserialize;

/// How the interface obtains its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressMode {
    #[default]
    Dhcp,
    Static,
}

/// A 48-bit hardware address written as `AA:BB:CC:DD:EE:FF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct MacAddress(pub [u8; 6]);

impl FromStr for MacAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.split([':', '-']);
        for octet in &mut octets {
            let part = parts
                .next()
                .ok_or_else(|| format!("MAC address {s:?} has fewer than 6 octets"))?;
            if part.len() != 2 {
                return Err(format!("MAC address {s:?} has a malformed octet {part:?}"));
            }
            *octet = u8::from_str_radix(part, 16)
                .map_err(|_| format!("MAC address {s:?} has a non-hex octet {part:?}"))?;
        }
        if parts.next().is_some() {
            return Err(format!("MAC address {s:?} has more than 6 octets"));
        }
        Ok(Self(octets))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl Default for MacAddress {
    fn default() -> Self {
        Self([0xBA, 0xDC, 0x0F, 0xFE, 0xEE, 0xEE])
    }
}

/// Interface addressing. Static fields are ignored under DHCP.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub mode: AddressMode,
    #[serde(default)]
    pub mac: MacAddress,
    pub ip: Option<Ipv4Addr>,
    pub gateway: Option<Ipv4Addr>,
    pub dns: Option<Ipv4Addr>,
    pub netmask: Option<Ipv4Addr>,
}

impl NetworkConfig {
    /// Names of static fields that are required but missing.
    pub fn missing_static_fields(&self) -> Vec<&'static str> {
        if self.mode != AddressMode::Static {
            return Vec::new();
        }
        [
            ("ip", self.ip),
            ("gateway", self.gateway),
            ("dns", self.dns),
            ("netmask", self.netmask),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}
