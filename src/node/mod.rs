//! Node assembly: boot and the receive loop
//!
//! The transport pushes raw datagrams onto a single-consumer queue; the loop
//! here is the only consumer and the only execution context touching node
//! state, so frames are handled strictly in delivery order with no locking.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::core::{BlockNumber, HardwareAddress, NodeConfig};
use crate::led::LedDriver;
use crate::network::{InboundFrame, RadioTransport};
use crate::protocol::{NodeState, ProtocolHandler};
use crate::storage::IdentityStore;

/// A booted block node: protocol handler plus its inbound frame queue
pub struct BlockNode<T, S, L> {
    handler: ProtocolHandler<T, S, L>,
    inbound: mpsc::Receiver<InboundFrame>,
}

impl<T, S, L> BlockNode<T, S, L>
where
    T: RadioTransport,
    S: IdentityStore,
    L: LedDriver,
{
    /// Boots a node
    ///
    /// Loads the persisted block number, falling back to the default on a
    /// missing or corrupt record (a read failure also falls back, logged),
    /// and builds the all-off LED buffer and empty peer registry.
    pub fn boot(
        config: &NodeConfig,
        address: HardwareAddress,
        transport: T,
        store: S,
        driver: L,
        inbound: mpsc::Receiver<InboundFrame>,
    ) -> Self {
        let number = match store.load() {
            Ok(Some(number)) => {
                info!(%number, "loaded persisted block number");
                number
            }
            Ok(None) => {
                info!(default = %BlockNumber::default(), "no block number record, using default");
                BlockNumber::default()
            }
            Err(err) => {
                warn!(%err, "failed to read block number record, using default");
                BlockNumber::default()
            }
        };

        let state = NodeState::new(number, config.led_count);
        info!(%address, leds = config.led_count, "block node booted");

        BlockNode {
            handler: ProtocolHandler::new(address, state, transport, store, driver),
            inbound,
        }
    }

    /// Consumes inbound frames until the transport side closes the queue
    ///
    /// Each frame runs to completion, reply send and persistence write
    /// included, before the next is received; there is no reordering and no
    /// reentrancy.
    pub async fn run(&mut self) {
        while let Some(frame) = self.inbound.recv().await {
            self.handler.handle_datagram(frame.src, &frame.payload);
        }
        info!("inbound queue closed, node loop stopping");
    }

    /// Read access to the node state
    pub fn state(&self) -> &NodeState {
        self.handler.state()
    }

    /// This node's own hardware address
    pub fn address(&self) -> HardwareAddress {
        self.handler.address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use rgb::RGB8;

    use crate::core::FRAME_LEN;
    use crate::led::LedBuffer;
    use crate::network::ChannelTransport;
    use crate::protocol::codec;
    use crate::protocol::Frame;
    use crate::storage::FileIdentityStore;

    struct NullDriver;

    impl LedDriver for NullDriver {
        fn show(&mut self, _pixels: &LedBuffer) {}
    }

    fn inbound(src: HardwareAddress, frame: &Frame) -> InboundFrame {
        InboundFrame {
            src,
            payload: Bytes::copy_from_slice(&codec::encode(frame)),
        }
    }

    #[tokio::test]
    async fn test_boot_discover_assign_set_color_scenario() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block_number.txt");
        let config = NodeConfig {
            led_count: 3,
            identity_path: path.clone(),
            inbound_capacity: 32,
        };

        let own: HardwareAddress = "10:20:30:40:50:60".parse().unwrap();
        let requester: HardwareAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();

        let store = FileIdentityStore::new(&config.identity_path);
        assert_eq!(store.load().unwrap(), None);

        let (transport, mut outbound) = ChannelTransport::new();
        let (tx, rx) = mpsc::channel(config.inbound_capacity);
        let mut node = BlockNode::boot(&config, own, transport, store, NullDriver, rx);

        // fresh node reports the default identity
        assert_eq!(node.state().number, BlockNumber(0));
        assert!(node.state().peers.is_empty());

        tx.send(inbound(requester, &Frame::Discover { address: requester }))
            .await
            .unwrap();
        tx.send(inbound(
            requester,
            &Frame::AssignNumber {
                address: HardwareAddress([0; 6]),
                number: BlockNumber(5),
            },
        ))
        .await
        .unwrap();
        tx.send(inbound(
            requester,
            &Frame::SetColor {
                color: RGB8 { r: 255, g: 0, b: 0 },
            },
        ))
        .await
        .unwrap();
        drop(tx);

        node.run().await;

        // discovery: requester registered, one 14-byte kind-2 reply with
        // the pre-assignment number
        assert!(node.state().peers.contains(&requester));
        let (dest, payload) = outbound.recv().await.unwrap();
        assert_eq!(dest, requester);
        assert_eq!(payload.len(), FRAME_LEN);
        assert_eq!(
            codec::decode(&payload).unwrap(),
            Frame::AssignNumber {
                address: own,
                number: BlockNumber(0),
            }
        );
        assert!(outbound.try_recv().is_err());

        // assignment reached memory and disk
        assert_eq!(node.state().number, BlockNumber(5));
        assert_eq!(
            FileIdentityStore::new(&path).load().unwrap(),
            Some(BlockNumber(5))
        );

        // every LED went red
        let red = RGB8 { r: 255, g: 0, b: 0 };
        assert_eq!(node.state().leds.pixels(), &[red, red, red]);
    }

    #[tokio::test]
    async fn test_boot_uses_persisted_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block_number.txt");
        std::fs::write(&path, "7").unwrap();

        let (transport, _outbound) = ChannelTransport::new();
        let (_tx, rx) = mpsc::channel(8);
        let node = BlockNode::boot(
            &NodeConfig::default(),
            HardwareAddress([1; 6]),
            transport,
            FileIdentityStore::new(&path),
            NullDriver,
            rx,
        );

        assert_eq!(node.state().number, BlockNumber(7));
    }

    #[tokio::test]
    async fn test_boot_falls_back_on_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block_number.txt");
        std::fs::write(&path, "??").unwrap();

        let (transport, _outbound) = ChannelTransport::new();
        let (_tx, rx) = mpsc::channel(8);
        let node = BlockNode::boot(
            &NodeConfig::default(),
            HardwareAddress([1; 6]),
            transport,
            FileIdentityStore::new(&path),
            NullDriver,
            rx,
        );

        assert_eq!(node.state().number, BlockNumber(0));
    }

    #[tokio::test]
    async fn test_frames_processed_in_delivery_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block_number.txt");

        let (transport, _outbound) = ChannelTransport::new();
        let (tx, rx) = mpsc::channel(8);
        let mut node = BlockNode::boot(
            &NodeConfig::default(),
            HardwareAddress([1; 6]),
            transport,
            FileIdentityStore::new(&path),
            NullDriver,
            rx,
        );

        let src = HardwareAddress([2; 6]);
        for n in 1..=3 {
            tx.send(inbound(
                src,
                &Frame::AssignNumber {
                    address: HardwareAddress([0; 6]),
                    number: BlockNumber(n),
                },
            ))
            .await
            .unwrap();
        }
        drop(tx);
        node.run().await;

        // the last assignment wins in memory and on disk
        assert_eq!(node.state().number, BlockNumber(3));
        assert_eq!(
            FileIdentityStore::new(&path).load().unwrap(),
            Some(BlockNumber(3))
        );
    }

    #[tokio::test]
    async fn test_malformed_frames_are_dropped_in_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block_number.txt");

        let (transport, mut outbound) = ChannelTransport::new();
        let (tx, rx) = mpsc::channel(8);
        let mut node = BlockNode::boot(
            &NodeConfig::default(),
            HardwareAddress([1; 6]),
            transport,
            FileIdentityStore::new(&path),
            NullDriver,
            rx,
        );

        let src = HardwareAddress([2; 6]);
        tx.send(InboundFrame {
            src,
            payload: Bytes::from_static(&[0u8; 4]),
        })
        .await
        .unwrap();
        drop(tx);
        node.run().await;

        assert!(node.state().peers.is_empty());
        assert!(outbound.try_recv().is_err());
    }
}
