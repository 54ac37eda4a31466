use bytes::Bytes;
use tokio::sync::mpsc;

use crate::core::{Error, HardwareAddress, Result};

use super::peers::{PeerRegistry, RegisterOutcome};

/// One raw datagram as delivered by the radio, sender attached
#[derive(Debug, Clone)]
pub struct InboundFrame {
    /// Transport-level sender address
    pub src: HardwareAddress,
    /// Raw frame bytes
    pub payload: Bytes,
}

/// Addressed fire-and-forget send plus peer table maintenance
///
/// The link is connectionless and unacknowledged beyond delivery status;
/// implementations validate unicast targets against their peer table.
pub trait RadioTransport {
    /// Registers `addr` as a valid unicast destination
    fn add_peer(&mut self, addr: HardwareAddress) -> Result<RegisterOutcome>;

    /// Sends one frame to a previously registered peer
    fn send(&mut self, dest: HardwareAddress, payload: &[u8]) -> Result<()>;
}

/// In-process transport backed by a queue
///
/// Outbound frames land on an unbounded channel paired at construction, so a
/// single consumer observes them in send order. Serves as the loopback
/// harness and test double for the radio.
#[derive(Debug)]
pub struct ChannelTransport {
    peers: PeerRegistry,
    outbound: mpsc::UnboundedSender<(HardwareAddress, Bytes)>,
}

impl ChannelTransport {
    /// Creates a transport and the receiver observing its outbound frames
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(HardwareAddress, Bytes)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            ChannelTransport {
                peers: PeerRegistry::new(),
                outbound: tx,
            },
            rx,
        )
    }

    /// Number of registered peers
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }
}

impl RadioTransport for ChannelTransport {
    fn add_peer(&mut self, addr: HardwareAddress) -> Result<RegisterOutcome> {
        Ok(self.peers.add(addr))
    }

    fn send(&mut self, dest: HardwareAddress, payload: &[u8]) -> Result<()> {
        if !self.peers.contains(&dest) {
            return Err(Error::transport(format!("unknown unicast target {}", dest)));
        }

        self.outbound
            .send((dest, Bytes::copy_from_slice(payload)))
            .map_err(|_| Error::transport("outbound queue closed"))
    }
}
