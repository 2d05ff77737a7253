#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Levin node entrypoint (systemd-friendly).
//! Starts the node and keeps the process alive until a shutdown signal.

use std::sync::Arc;

use tracing::{info, warn};

use levinode::config::Config;
use levinode::monitoring::metrics::Metrics;
use levinode::node::Node;

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .compact()
        .try_init();

    let cfg = Config::from_env();
    let metrics = Arc::new(Metrics::new().expect("metrics init failed"));

    let node = match Node::create(cfg.network_type, cfg.listen_port, metrics) {
        Ok(node) => node,
        Err(e) => {
            eprintln!("node init failed: {e}");
            std::process::exit(1);
        }
    };

    info!(
        port = cfg.listen_port,
        network = ?cfg.network_type,
        peer_id = node.identity().peer_id,
        network_id = %hex::encode(node.identity().network_id),
        "levin node starting"
    );

    if let Err(e) = node.start().await {
        eprintln!("listener bind failed: {e}");
        std::process::exit(1);
    }

    if let Some(dial) = cfg.dial {
        if let Err(e) = node
            .establish_outgoing_connection(dial.ip, dial.port, dial.disconnect_immediately)
            .await
        {
            warn!(error = %e, ip = %dial.ip, port = dial.port, "outgoing connection failed");
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => warn!(error = %e, "failed to listen for shutdown signal"),
    }

    node.stop();
    node.wait_for_shutdown().await;
}
