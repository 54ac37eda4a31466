//! BlockLights: wireless LED block node protocol.
//!
//! Each "block" is an independently addressable LED node driven by a master
//! controller over a connectionless radio link. This library implements the
//! fixed 14-byte frame codec, the per-node protocol state machine (peer
//! discovery, uniform color updates, block-number assignment), and durable
//! storage of the node's block number across reboots. Radio bring-up, LED
//! strip timing, and the raw filesystem driver stay behind traits.

pub mod core;
pub mod led;
pub mod network;
pub mod node;
pub mod protocol;
pub mod storage;

// Re-export commonly used items
pub use crate::core::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
