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

//! One driver per peer socket: read a Levin frame, dispatch on command,
//! write a response, loop. Any error drops the connection and unregisters
//! it; it never brings down the node.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Buf, Bytes, BytesMut};
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_util::codec::{Decoder, Encoder, Framed};
use tracing::{debug, info, warn};

use crate::wire::constants::{COMMAND_HANDSHAKE, COMMAND_PING_PONG, COMMAND_TIMED_SYNC, MAX_PEERLIST_ENTRY_NUM};
use crate::wire::levin::{LevinError, LevinHeader};
use crate::wire::messages;
use crate::wire::storage::{self, StorageError};

use super::controller::NodeContext;
use super::peerlist;
use super::registry::{ConnHandle, ConnId};

/// Errors that can end a connection driver.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Levin(#[from] LevinError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A decoded Levin frame: header plus the (still-encoded) payload body.
#[derive(Debug)]
pub struct RawFrame {
    pub header: LevinHeader,
    pub payload: Bytes,
}

/// Frames whole Levin messages off a byte stream, buffering until a full
/// header and payload are available before producing an item.
#[derive(Default)]
pub struct LevinCodec;

impl Decoder for LevinCodec {
    type Item = RawFrame;
    type Error = DriverError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<RawFrame>, DriverError> {
        if src.len() < LevinHeader::SIZE {
            return Ok(None);
        }
        let header = LevinHeader::parse(&src[..LevinHeader::SIZE])?;
        let total = LevinHeader::SIZE + header.payload_length as usize;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }
        src.advance(LevinHeader::SIZE);
        let payload = src.split_to(header.payload_length as usize).freeze();
        Ok(Some(RawFrame { header, payload }))
    }
}

impl Encoder<RawFrame> for LevinCodec {
    type Error = DriverError;

    fn encode(&mut self, item: RawFrame, dst: &mut BytesMut) -> Result<(), DriverError> {
        item.header.write_bytes(dst);
        dst.extend_from_slice(&item.payload);
        Ok(())
    }
}

/// How a driver came to own its socket, and what that implies for its
/// dispatch behaviour.
pub enum Direction {
    /// Accepted inbound; registers itself once the handshake response is sent.
    Inbound { addr: SocketAddr },
    /// Dialed outbound; already registered by the controller before the
    /// driver was spawned. `disconnect_immediately` governs what happens
    /// once the peer's handshake response arrives (the whitelist/graylist
    /// distinction).
    Outbound { disconnect_immediately: bool },
}

async fn send(
    framed: &mut Framed<TcpStream, LevinCodec>,
    command: u32,
    section: &storage::Section,
    is_request: bool,
) -> Result<(), DriverError> {
    let payload = storage::encode_payload(section)?;
    let header = if is_request {
        LevinHeader::request(command, payload.len() as u64)
    } else {
        LevinHeader::response(command, payload.len() as u64)
    };
    framed.send(RawFrame { header, payload }).await
}

/// Send a Handshake request and return the framed socket, ready to be
/// handed to [`run`] as an outbound driver. Used by the controller's
/// `EstablishOutgoingConnection`.
pub async fn send_handshake_request(
    stream: TcpStream,
    identity: &messages::NodeIdentity,
) -> Result<Framed<TcpStream, LevinCodec>, DriverError> {
    let mut framed = Framed::new(stream, LevinCodec);
    let request = messages::handshake_request(identity);
    send(&mut framed, COMMAND_HANDSHAKE, &request, true).await?;
    Ok(framed)
}

enum Outcome {
    Continue,
    RegisterInbound,
    Close,
}

async fn dispatch(
    frame: &RawFrame,
    framed: &mut Framed<TcpStream, LevinCodec>,
    ctx: &NodeContext,
    direction: &Direction,
) -> Result<Outcome, DriverError> {
    match frame.header.command {
        COMMAND_HANDSHAKE => {
            if frame.header.expect_response {
                let _request = storage::decode_payload(&frame.payload)?;
                let peerlist = peerlist::generate(&ctx.rng, MAX_PEERLIST_ENTRY_NUM);
                let response = messages::handshake_response(&ctx.identity, peerlist);
                send(framed, COMMAND_HANDSHAKE, &response, false).await?;
                ctx.metrics.handshakes_completed_total.inc();
                Ok(Outcome::RegisterInbound)
            } else {
                let _response = storage::decode_payload(&frame.payload)?;
                match direction {
                    Direction::Outbound { disconnect_immediately: true } => Ok(Outcome::Close),
                    _ => Ok(Outcome::Continue),
                }
            }
        }
        COMMAND_TIMED_SYNC => {
            if frame.header.expect_response {
                let _request = storage::decode_payload(&frame.payload)?;
                let peerlist = peerlist::generate(&ctx.rng, MAX_PEERLIST_ENTRY_NUM);
                let response = messages::timed_sync_response(&ctx.identity, peerlist);
                send(framed, COMMAND_TIMED_SYNC, &response, false).await?;
            } else {
                debug!("timed sync notification received; nothing to send");
            }
            Ok(Outcome::Continue)
        }
        COMMAND_PING_PONG => {
            if frame.header.expect_response {
                let response = messages::pong_response(ctx.identity.peer_id);
                send(framed, COMMAND_PING_PONG, &response, false).await?;
            } else {
                debug!("ping/pong notification received; nothing to send");
            }
            Ok(Outcome::Continue)
        }
        other => {
            warn!(command = other, "unknown command; dropping connection");
            Ok(Outcome::Close)
        }
    }
}

/// Drive one socket until it errors or the peer closes it.
pub async fn run(mut framed: Framed<TcpStream, LevinCodec>, conn_id: ConnId, ctx: Arc<NodeContext>, direction: Direction) {
    let mut registered = matches!(direction, Direction::Outbound { .. });

    loop {
        let frame = match framed.next().await {
            Some(Ok(frame)) => frame,
            Some(Err(err)) => {
                warn!(conn_id, error = %err, "driver read error; dropping connection");
                ctx.metrics.protocol_errors_total.with_label_values(&[error_label(&err)]).inc();
                break;
            }
            None => {
                debug!(conn_id, "connection closed by peer");
                break;
            }
        };

        match dispatch(&frame, &mut framed, &ctx, &direction).await {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::RegisterInbound) => {
                if !registered {
                    if let Direction::Inbound { addr } = &direction {
                        let addr = *addr;
                        ctx.inbound.insert(conn_id, ConnHandle { addr });
                        ctx.metrics.inbound_peers.inc();
                        registered = true;
                        info!(conn_id, %addr, "inbound peer registered after handshake");
                    }
                }
            }
            Ok(Outcome::Close) => {
                debug!(conn_id, "closing connection per dispatch outcome");
                break;
            }
            Err(err) => {
                warn!(conn_id, error = %err, "protocol error; dropping connection");
                ctx.metrics.protocol_errors_total.with_label_values(&[error_label(&err)]).inc();
                break;
            }
        }
    }

    match direction {
        Direction::Inbound { .. } => {
            if registered && ctx.inbound.remove(conn_id).is_some() {
                ctx.metrics.inbound_peers.dec();
            }
        }
        Direction::Outbound { .. } => {
            if ctx.outbound.remove(conn_id).is_some() {
                ctx.metrics.outbound_peers.dec();
            }
        }
    }
}

fn error_label(err: &DriverError) -> &'static str {
    match err {
        DriverError::Io(_) => "io",
        DriverError::Levin(LevinError::Truncated) => "truncated",
        DriverError::Levin(LevinError::BadSignature) => "bad_signature",
        DriverError::Levin(LevinError::BadFormatVersion) => "bad_format_version",
        DriverError::Storage(StorageError::Truncated) => "truncated",
        DriverError::Storage(StorageError::BadPayloadHeader) => "bad_payload_header",
        DriverError::Storage(StorageError::UnknownTag(_)) => "unknown_tag",
        DriverError::Storage(StorageError::Varint(_)) => "varint",
        DriverError::Storage(StorageError::UnsupportedValue) => "unsupported_value",
    }
}
