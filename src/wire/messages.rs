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

//! Builders for the payload trees of the three commands this node speaks:
//! Handshake, Timed Sync, and Ping/Pong.

use super::storage::{Section, Value};

/// This node's identity: advertised port, peer id, and network.
#[derive(Debug, Clone, Copy)]
pub struct NodeIdentity {
    pub my_port: u32,
    pub peer_id: u64,
    pub network_id: [u8; 16],
    pub genesis_hash: [u8; 32],
}

/// A synthetic or real peer entry, as carried in `local_peerlist_new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerEntry {
    pub ip: u32,
    pub port: u16,
    pub peer_id: u64,
}

const PEER_TYPE_IPV4: u8 = 1;

impl PeerEntry {
    /// `{adr: {addr: {m_ip, m_port}, type}, id}`
    pub fn to_section(self) -> Section {
        let mut addr = Section::new();
        addr.insert("m_ip", Value::U32(self.ip));
        addr.insert("m_port", Value::U16(self.port));

        let mut adr = Section::new();
        adr.insert("addr", Value::Section(addr));
        adr.insert("type", Value::U8(PEER_TYPE_IPV4));

        let mut entry = Section::new();
        entry.insert("adr", Value::Section(adr));
        entry.insert("id", Value::U64(self.peer_id));
        entry
    }
}

fn peerlist_value(peerlist: Vec<PeerEntry>) -> Value {
    Value::ArrayOfSection(peerlist.into_iter().map(PeerEntry::to_section).collect())
}

fn node_data_section(identity: &NodeIdentity) -> Section {
    let mut node_data = Section::new();
    node_data.insert("my_port", Value::U32(identity.my_port));
    node_data.insert("network_id", Value::Bytes(identity.network_id.to_vec()));
    node_data.insert("peer_id", Value::U64(identity.peer_id));
    node_data.insert("support_flags", Value::U8(1)); // fluffy blocks
    node_data
}

fn payload_data_section(identity: &NodeIdentity) -> Section {
    let mut payload_data = Section::new();
    payload_data.insert("cumulative_difficulty", Value::U64(0));
    payload_data.insert("cumulative_difficulty_top64", Value::U64(0));
    payload_data.insert("current_height", Value::U64(0));
    payload_data.insert("top_id", Value::Bytes(identity.genesis_hash.to_vec()));
    payload_data.insert("top_version", Value::U8(1));
    payload_data
}

/// Handshake request payload (command 1001, request).
pub fn handshake_request(identity: &NodeIdentity) -> Section {
    let mut root = Section::new();
    root.insert("node_data", Value::Section(node_data_section(identity)));
    root.insert("payload_data", Value::Section(payload_data_section(identity)));
    root
}

/// Handshake response payload (command 1001, response): the request shape
/// plus a freshly generated peerlist.
pub fn handshake_response(identity: &NodeIdentity, peerlist: Vec<PeerEntry>) -> Section {
    let mut root = handshake_request(identity);
    root.insert("local_peerlist_new", peerlist_value(peerlist));
    root
}

/// Timed Sync request payload (command 1002, request): `payload_data` only.
pub fn timed_sync_request(identity: &NodeIdentity) -> Section {
    let mut root = Section::new();
    root.insert("payload_data", Value::Section(payload_data_section(identity)));
    root
}

/// Timed Sync response payload (command 1002, response): identical shape
/// to the handshake response.
pub fn timed_sync_response(identity: &NodeIdentity, peerlist: Vec<PeerEntry>) -> Section {
    let mut root = Section::new();
    root.insert("local_peerlist_new", peerlist_value(peerlist));
    root.insert("node_data", Value::Section(node_data_section(identity)));
    root.insert("payload_data", Value::Section(payload_data_section(identity)));
    root
}

/// Pong response payload (command 1003, response): `{ peer_id, status: "OK" }`.
pub fn pong_response(peer_id: u64) -> Section {
    let mut root = Section::new();
    root.insert("peer_id", Value::U64(peer_id));
    root.insert("status", Value::Bytes(b"OK".to_vec()));
    root
}
