// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]

//! The node's public control surface: `Create`, `Start`, `Stop`, and
//! `EstablishOutgoingConnection`. This is the library boundary external
//! collaborators (an HTTP admin layer, a manual-testing binary) call into.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::monitoring::metrics::Metrics;
use crate::wire::constants::NetworkType;
use crate::wire::messages::NodeIdentity;

use super::driver::{self, Direction};
use super::registry::{ConnHandle, ConnId, Registry};

/// Errors the control surface can report to its caller.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to source randomness for peer id")]
    Rng,
}

/// Shared state reachable from every connection driver.
pub struct NodeContext {
    pub identity: NodeIdentity,
    pub inbound: Registry,
    pub outbound: Registry,
    pub metrics: Arc<Metrics>,
    pub rng: SystemRandom,
}

/// A running (or not-yet-started) node.
pub struct Node {
    ctx: Arc<NodeContext>,
    listen_port: u16,
    next_conn_id: Arc<AtomicU64>,
    shutdown: Arc<Notify>,
    accept_task: Mutex<Option<JoinHandle<()>>>,
    bound_addr: Mutex<Option<SocketAddr>>,
}

impl Node {
    /// Create a node: pick the network-id constant, draw a random peer id
    /// from a cryptographic RNG. Does not touch the network.
    pub fn create(network_type: NetworkType, listen_port: u16, metrics: Arc<Metrics>) -> Result<Self, ControllerError> {
        let rng = SystemRandom::new();
        let mut peer_id_bytes = [0u8; 8];
        rng.fill(&mut peer_id_bytes).map_err(|_| ControllerError::Rng)?;

        let identity = NodeIdentity {
            my_port: listen_port as u32,
            peer_id: u64::from_le_bytes(peer_id_bytes),
            network_id: network_type.network_id(),
            genesis_hash: network_type.genesis_hash(),
        };

        Ok(Self {
            ctx: Arc::new(NodeContext {
                identity,
                inbound: Registry::new(),
                outbound: Registry::new(),
                metrics,
                rng,
            }),
            listen_port,
            next_conn_id: Arc::new(AtomicU64::new(1)),
            shutdown: Arc::new(Notify::new()),
            accept_task: Mutex::new(None),
            bound_addr: Mutex::new(None),
        })
    }

    /// This node's peer id, port, and network-id, as decided at [`Node::create`].
    pub fn identity(&self) -> &NodeIdentity {
        &self.ctx.identity
    }

    /// Number of currently registered inbound connections.
    pub fn inbound_count(&self) -> usize {
        self.ctx.inbound.len()
    }

    /// Number of currently registered outbound connections.
    pub fn outbound_count(&self) -> usize {
        self.ctx.outbound.len()
    }

    /// The address actually bound by [`Node::start`], including the
    /// OS-assigned port when `listen_port` was `0`. `None` before `start`
    /// has completed.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.bound_addr.lock().expect("bound_addr mutex poisoned")
    }

    fn next_conn_id(&self) -> ConnId {
        self.next_conn_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Bind the listener and spawn the accept loop. Returns once bound;
    /// the accept loop itself runs in the background.
    pub async fn start(&self) -> Result<(), ControllerError> {
        let listener = TcpListener::bind(("0.0.0.0", self.listen_port)).await?;
        let local_addr = listener.local_addr()?;
        info!(port = self.listen_port, bound = %local_addr, "levin node listening");
        *self.bound_addr.lock().expect("bound_addr mutex poisoned") = Some(local_addr);

        let ctx = self.ctx.clone();
        let shutdown = self.shutdown.clone();
        let next_conn_id = self.next_conn_id.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.notified() => {
                        info!("accept loop stopping");
                        break;
                    }
                    accepted = listener.accept() => {
                        match accepted {
                            Ok((stream, addr)) => {
                                let conn_id = next_conn_id.fetch_add(1, Ordering::Relaxed);
                                let ctx = ctx.clone();
                                tokio::spawn(async move {
                                    let framed = tokio_util::codec::Framed::new(stream, driver::LevinCodec);
                                    driver::run(framed, conn_id, ctx, Direction::Inbound { addr }).await;
                                });
                            }
                            Err(err) => {
                                warn!(error = %err, "accept failed");
                            }
                        }
                    }
                }
            }
        });

        *self.accept_task.lock().expect("accept_task mutex poisoned") = Some(handle);
        Ok(())
    }

    /// Stop accepting new inbound connections. Does not wait for already
    /// spawned drivers to exit; they terminate on their next failed read.
    pub fn stop(&self) {
        self.shutdown.notify_one();
    }

    /// Wait for the accept loop task to finish (normally only after
    /// [`Node::stop`] has been called). A no-op if [`Node::start`] was
    /// never called.
    pub async fn wait_for_shutdown(&self) {
        let handle = self.accept_task.lock().expect("accept_task mutex poisoned").take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Dial `ip:port`, send a Handshake request, register the connection
    /// as outbound, and spawn its driver. `disconnect_immediately` selects
    /// the whitelist-attack behaviour (true: drop right after the peer's
    /// handshake response) versus graylist/slot-occupation (false: keep
    /// the connection open).
    pub async fn establish_outgoing_connection(
        &self,
        ip: Ipv4Addr,
        port: u16,
        disconnect_immediately: bool,
    ) -> Result<(), ControllerError> {
        let addr = SocketAddr::from((ip, port));
        let stream = TcpStream::connect(addr).await?;
        let framed = driver::send_handshake_request(stream, &self.ctx.identity).await?;

        let conn_id = self.next_conn_id();
        self.ctx.outbound.insert(conn_id, ConnHandle { addr });
        self.ctx.metrics.outbound_peers.inc();

        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            driver::run(framed, conn_id, ctx, Direction::Outbound { disconnect_immediately }).await;
        });

        Ok(())
    }
}

impl From<driver::DriverError> for ControllerError {
    fn from(err: driver::DriverError) -> Self {
        match err {
            driver::DriverError::Io(e) => ControllerError::Io(e),
            other => ControllerError::Io(std::io::Error::new(std::io::ErrorKind::Other, other.to_string())),
        }
    }
}
