//! Core types and constants for the BlockLights protocol
//!
//! This module contains the fundamental building blocks used throughout the library.

pub mod error;
pub mod types;

pub use self::error::{DecodeError, Error, Result};
pub use self::types::{BlockNumber, HardwareAddress, NodeConfig};

/// Fixed size of every radio frame in bytes, constant across frame kinds
pub const FRAME_LEN: usize = 14;

/// Block number a node reports before any assignment has been persisted
pub const DEFAULT_BLOCK_NUMBER: i32 = 0;

/// Number of LEDs on a stock block
pub const DEFAULT_LED_COUNT: usize = 1;

/// Depth of the inbound datagram queue between transport and node loop
pub const DEFAULT_INBOUND_CAPACITY: usize = 32;
