#![forbid(unsafe_code)]

use std::net::Ipv4Addr;
use std::sync::Arc;

use levinode::monitoring::metrics::Metrics;
use levinode::node::Node;
use levinode::wire::constants::NetworkType;

#[tokio::test]
async fn dialing_an_unreachable_peer_leaves_the_registry_untouched() {
    let metrics = Arc::new(Metrics::new().expect("metrics"));
    let node = Node::create(NetworkType::Mainnet, 0, metrics).expect("node create");

    // Port 0 on loopback is never accepting connections; the connect
    // attempt is expected to fail fast with an OS-level refusal.
    let result = node
        .establish_outgoing_connection(Ipv4Addr::LOCALHOST, 1, false)
        .await;

    assert!(result.is_err());
    assert_eq!(node.outbound_count(), 0);
}
