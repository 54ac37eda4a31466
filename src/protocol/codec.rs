use bytes::{BufMut, BytesMut};
use rgb::RGB8;
use tokio_util::codec::{Decoder, Encoder};

use crate::core::{BlockNumber, DecodeError, Error, HardwareAddress, FRAME_LEN};

use super::message::Frame;

/// Fixed 14-byte wire layout, little-endian numeric fields:
///
/// ```text
/// [0]      kind    0 = Discover, 1 = SetColor, 2 = AssignNumber
/// [1..7)   address 6 bytes
/// [7..10)  color   R, G, B
/// [10..14) number  i32 little-endian
/// ```
///
/// Encodes `frame` into its wire form; unused fields are zero.
pub fn encode(frame: &Frame) -> [u8; FRAME_LEN] {
    let mut buf = [0u8; FRAME_LEN];
    buf[0] = frame.kind();
    match frame {
        Frame::Discover { address } => {
            buf[1..7].copy_from_slice(&address.octets());
        }
        Frame::SetColor { color } => {
            buf[7] = color.r;
            buf[8] = color.g;
            buf[9] = color.b;
        }
        Frame::AssignNumber { address, number } => {
            buf[1..7].copy_from_slice(&address.octets());
            buf[10..14].copy_from_slice(&number.value().to_le_bytes());
        }
    }
    buf
}

/// Decodes one complete datagram
///
/// Rejects any buffer whose length differs from the fixed frame size and any
/// unrecognized kind tag; malformed input never becomes a frame.
pub fn decode(bytes: &[u8]) -> Result<Frame, DecodeError> {
    if bytes.len() != FRAME_LEN {
        return Err(DecodeError::WrongLength(bytes.len()));
    }

    match bytes[0] {
        Frame::KIND_DISCOVER => Ok(Frame::Discover {
            address: read_address(bytes),
        }),
        Frame::KIND_SET_COLOR => Ok(Frame::SetColor {
            color: RGB8 {
                r: bytes[7],
                g: bytes[8],
                b: bytes[9],
            },
        }),
        Frame::KIND_ASSIGN_NUMBER => Ok(Frame::AssignNumber {
            address: read_address(bytes),
            number: read_number(bytes),
        }),
        kind => Err(DecodeError::UnknownKind(kind)),
    }
}

fn read_address(bytes: &[u8]) -> HardwareAddress {
    let mut octets = [0u8; HardwareAddress::LEN];
    octets.copy_from_slice(&bytes[1..7]);
    HardwareAddress(octets)
}

fn read_number(bytes: &[u8]) -> BlockNumber {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[10..14]);
    BlockNumber(i32::from_le_bytes(raw))
}

/// Frame codec for use with `tokio_util`'s framed plumbing
///
/// The link is datagram-based: one buffer carries exactly one frame, so the
/// decoder consumes the whole buffer rather than reassembling a stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCodec;

impl FrameCodec {
    /// Creates a new frame codec
    pub fn new() -> Self {
        FrameCodec
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let datagram = src.split_to(src.len());
        let frame = decode(&datagram)?;
        Ok(Some(frame))
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = Error;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.put_slice(&encode(&item));
        Ok(())
    }
}
