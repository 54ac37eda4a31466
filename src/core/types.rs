use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::Error;

/// 6-byte transport-assigned identity of a block node
///
/// Doubles as the peer key and the unicast send target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HardwareAddress(pub [u8; 6]);

impl HardwareAddress {
    /// Address length in bytes
    pub const LEN: usize = 6;

    /// Returns the raw octets
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl From<[u8; 6]> for HardwareAddress {
    fn from(octets: [u8; 6]) -> Self {
        HardwareAddress(octets)
    }
}

impl fmt::Display for HardwareAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for HardwareAddress {
    type Err = Error;

    /// Parses the conventional `AA:BB:CC:DD:EE:FF` form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::config(format!("invalid hardware address `{}`", s));
        let mut octets = [0u8; Self::LEN];
        let mut parts = s.split(':');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?;
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(HardwareAddress(octets))
    }
}

/// Persistent identity integer distinguishing one block from another
///
/// Assigned by the controller, durable across reboots. The default is
/// reported until an assignment has been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockNumber(pub i32);

impl BlockNumber {
    /// Returns the raw value
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl Default for BlockNumber {
    fn default() -> Self {
        BlockNumber(super::DEFAULT_BLOCK_NUMBER)
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deployment configuration for a block node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Number of LEDs on the strip
    pub led_count: usize,
    /// File the block number is persisted to
    pub identity_path: PathBuf,
    /// Inbound datagram queue depth
    pub inbound_capacity: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            led_count: super::DEFAULT_LED_COUNT,
            identity_path: PathBuf::from("block_number.txt"),
            inbound_capacity: super::DEFAULT_INBOUND_CAPACITY,
        }
    }
}
