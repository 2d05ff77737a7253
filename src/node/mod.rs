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

//! The connection driver and node controller: accepting, dialing, and
//! driving peer sockets through the wire protocol in `crate::wire`.

/// The node's public control surface: `Create`/`Start`/`Stop`/
/// `EstablishOutgoingConnection`.
pub mod controller;
/// Per-socket read-frame-loop and command dispatch.
pub mod driver;
/// Synthetic peerlist generation for Timed Sync / Handshake responses.
pub mod peerlist;
/// Mutex-guarded inbound/outbound connection maps keyed by connection id.
pub mod registry;

pub use controller::{ControllerError, Node};
pub use registry::ConnId;
