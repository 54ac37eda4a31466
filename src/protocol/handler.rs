use rgb::RGB8;
use tracing::{debug, error, info, warn};

use crate::core::{BlockNumber, HardwareAddress};
use crate::led::{LedBuffer, LedDriver};
use crate::network::{PeerRegistry, RadioTransport};
use crate::storage::IdentityStore;

use super::codec;
use super::message::Frame;

/// Per-node state owned by the protocol handler
///
/// One explicit aggregate instead of process-wide globals: the block number
/// (mirrored to the store on every assignment), the volatile color buffer,
/// and the peers registered this boot.
#[derive(Debug)]
pub struct NodeState {
    /// Current block number
    pub number: BlockNumber,
    /// Volatile LED color buffer, uniform by protocol
    pub leds: LedBuffer,
    /// Addresses registered as unicast targets since boot
    pub peers: PeerRegistry,
}

impl NodeState {
    /// Creates node state with an all-off buffer and no peers
    pub fn new(number: BlockNumber, led_count: usize) -> Self {
        NodeState {
            number,
            leds: LedBuffer::new(led_count),
            peers: PeerRegistry::new(),
        }
    }
}

/// Protocol state machine of a single block node
///
/// Processes one frame at a time and runs each to completion, reply send and
/// persistence write included, before the next is handled. All failures are
/// local: logged, never propagated back to the sender.
pub struct ProtocolHandler<T, S, L> {
    /// This node's own hardware address
    address: HardwareAddress,
    /// Node state, exclusively owned by this handler
    state: NodeState,
    /// Radio send path and peer table
    transport: T,
    /// Durable home of the block number
    store: S,
    /// Output to the LED strip
    driver: L,
}

impl<T, S, L> ProtocolHandler<T, S, L>
where
    T: RadioTransport,
    S: IdentityStore,
    L: LedDriver,
{
    /// Creates a handler around booted node state
    pub fn new(
        address: HardwareAddress,
        state: NodeState,
        transport: T,
        store: S,
        driver: L,
    ) -> Self {
        ProtocolHandler {
            address,
            state,
            transport,
            store,
            driver,
        }
    }

    /// Decodes and dispatches one raw datagram
    ///
    /// Malformed input is dropped here with no state change and no reply;
    /// nothing past this point sees an invalid frame.
    pub fn handle_datagram(&mut self, src: HardwareAddress, payload: &[u8]) {
        match codec::decode(payload) {
            Ok(frame) => self.handle_frame(src, frame),
            Err(err) => warn!(%src, %err, "dropping malformed frame"),
        }
    }

    /// Dispatches one decoded frame
    pub fn handle_frame(&mut self, src: HardwareAddress, frame: Frame) {
        match frame {
            Frame::Discover { address } => self.on_discover(src, address),
            Frame::SetColor { color } => self.on_set_color(color),
            Frame::AssignNumber { number, .. } => self.on_assign_number(number),
        }
    }

    /// Discovery handshake: register the requester, reply with own identity
    fn on_discover(&mut self, src: HardwareAddress, reply_to: HardwareAddress) {
        let outcome = self.state.peers.add(src);
        debug!(%src, ?outcome, "discover received");

        if let Err(err) = self.transport.add_peer(src) {
            warn!(%src, %err, "transport rejected peer registration");
        }

        let reply = Frame::AssignNumber {
            address: self.address,
            number: self.state.number,
        };
        if let Err(err) = self.transport.send(reply_to, &codec::encode(&reply)) {
            warn!(dest = %reply_to, %err, "failed to send discovery reply");
        }
    }

    /// Uniform color update; no validation, the full channel range is valid
    fn on_set_color(&mut self, color: RGB8) {
        self.state.leds.set_all(color);
        self.driver.show(&self.state.leds);
        debug!(r = color.r, g = color.g, b = color.b, "led color updated");
    }

    /// Block-number assignment, persisted synchronously
    fn on_assign_number(&mut self, number: BlockNumber) {
        self.state.number = number;
        match self.store.store(number) {
            Ok(()) => info!(%number, "block number updated"),
            // In-memory value stands; durable state lags until the next
            // successful write or reboot.
            Err(err) => error!(%number, %err, "failed to persist block number"),
        }
    }

    /// This node's own hardware address
    pub fn address(&self) -> HardwareAddress {
        self.address
    }

    /// Read access to the node state
    pub fn state(&self) -> &NodeState {
        &self.state
    }
}
