//! Protocol implementation module
//!
//! This module defines the BlockLights frame kinds, the fixed-layout wire
//! codec, and the per-node dispatch state machine.

pub mod codec;
pub mod handler;
pub mod message;

pub use self::codec::FrameCodec;
pub use self::handler::{NodeState, ProtocolHandler};
pub use self::message::Frame;
