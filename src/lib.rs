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
#![warn(missing_docs)]

//! A Monero Levin-protocol node that speaks just enough of the wire
//! protocol to complete a Handshake, answer Timed Sync and Ping/Pong,
//! and hand back a synthetic peerlist — either as a passive fake node
//! or to occupy a real node's peer slots.
//!
//! This crate provides:
//! - A standalone Levin framing and portable-storage payload codec
//! - A per-connection message-exchange driver built on `tokio_util::codec`
//! - A node controller managing inbound and outbound connection lifecycles
//! - Monitoring via Prometheus metrics and structured logging

/// Environment-driven runtime configuration.
pub mod config;
/// Observability (metrics).
pub mod monitoring;
/// Connection registries, the per-socket driver, and the node's control surface.
pub mod node;
/// Levin framing and portable-storage wire codec.
pub mod wire;
