use rgb::RGB8;

use crate::core::{BlockNumber, HardwareAddress};

/// Protocol frames exchanged between block nodes
///
/// Every frame occupies the same fixed wire size regardless of kind; fields
/// a kind does not use are present on the wire and encoded as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Locates live blocks; carries the requester's own address so each
    /// receiver has an explicit reply path
    Discover {
        /// Requester's hardware address
        address: HardwareAddress,
    },

    /// Sets the whole strip to one uniform color
    SetColor {
        /// Color applied to every LED
        color: RGB8,
    },

    /// Assigns the node's block number; doubles as the discovery reply, in
    /// which case `address` holds the responder's own address
    AssignNumber {
        /// Responder's hardware address in a discovery reply, zero otherwise
        address: HardwareAddress,
        /// The assigned block number
        number: BlockNumber,
    },
}

impl Frame {
    /// Wire tag for Discover frames
    pub const KIND_DISCOVER: u8 = 0;
    /// Wire tag for SetColor frames
    pub const KIND_SET_COLOR: u8 = 1;
    /// Wire tag for AssignNumber frames
    pub const KIND_ASSIGN_NUMBER: u8 = 2;

    /// Returns the wire tag of this frame
    pub fn kind(&self) -> u8 {
        match self {
            Frame::Discover { .. } => Self::KIND_DISCOVER,
            Frame::SetColor { .. } => Self::KIND_SET_COLOR,
            Frame::AssignNumber { .. } => Self::KIND_ASSIGN_NUMBER,
        }
    }
}
