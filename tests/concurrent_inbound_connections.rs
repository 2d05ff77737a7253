#![forbid(unsafe_code)]

use std::sync::Arc;
use std::time::Duration;

use futures::SinkExt;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use levinode::monitoring::metrics::Metrics;
use levinode::node::driver::{LevinCodec, RawFrame};
use levinode::node::Node;
use levinode::wire::constants::{NetworkType, COMMAND_HANDSHAKE};
use levinode::wire::levin::LevinHeader;
use levinode::wire::messages::{handshake_request, NodeIdentity};
use levinode::wire::storage::encode_payload;

const PEER_COUNT: usize = 8;

#[tokio::test]
async fn handshakes_from_many_peers_register_as_inbound() {
    let metrics = Arc::new(Metrics::new().expect("metrics"));
    let node = Node::create(NetworkType::Testnet, 0, metrics).expect("node create");
    node.start().await.expect("node start");
    let addr = node.local_addr().expect("bound address");

    let identity = NodeIdentity {
        my_port: 28083,
        peer_id: 0x1122_3344_5566_7788,
        network_id: NetworkType::Testnet.network_id(),
        genesis_hash: NetworkType::Testnet.genesis_hash(),
    };

    let mut clients = Vec::with_capacity(PEER_COUNT);
    for _ in 0..PEER_COUNT {
        let stream = TcpStream::connect(addr).await.expect("connect");
        let mut framed = Framed::new(stream, LevinCodec);
        let payload = encode_payload(&handshake_request(&identity)).expect("encode");
        let header = LevinHeader::request(COMMAND_HANDSHAKE, payload.len() as u64);
        framed.send(RawFrame { header, payload }).await.expect("send handshake");
        clients.push(framed);
    }

    let mut registered = 0;
    for _ in 0..100 {
        registered = node.inbound_count();
        if registered == PEER_COUNT {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(registered, PEER_COUNT);

    drop(clients);
    node.stop();
    node.wait_for_shutdown().await;
}
