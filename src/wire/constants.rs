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
#![allow(missing_docs)]

//! Byte-for-byte wire literals. None of these are integer-typed on the
//! wire; they are transmitted exactly as written here.

pub const LEVIN_SIGNATURE: [u8; 8] = [0x01, 0x21, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01];
pub const LEVIN_PROTOCOL_VERSION: u32 = 1;

pub const PORTABLE_STORAGE_SIGNATURE_A: [u8; 4] = [0x01, 0x11, 0x01, 0x01];
pub const PORTABLE_STORAGE_SIGNATURE_B: [u8; 4] = [0x01, 0x01, 0x02, 0x01];
pub const PORTABLE_STORAGE_FORMAT_VERSION: u8 = 0x01;

pub const PORTABLE_STORAGE_HEADER: [u8; 9] = [
    0x01, 0x11, 0x01, 0x01, 0x01, 0x01, 0x02, 0x01, 0x01,
];

pub const NETWORK_ID_MAINNET: [u8; 16] = [
    0x12, 0x30, 0xf1, 0x71, 0x61, 0x04, 0x41, 0x61, 0x17, 0x31, 0x00, 0x82, 0x16, 0xa1, 0xa1, 0x10,
];
pub const NETWORK_ID_TESTNET: [u8; 16] = [
    0x12, 0x30, 0xf1, 0x71, 0x61, 0x04, 0x41, 0x61, 0x17, 0x31, 0x00, 0x82, 0x16, 0xa1, 0xa1, 0x11,
];

pub const GENESIS_HASH_MAINNET: [u8; 32] = [
    0x41, 0x80, 0x15, 0xbb, 0x9a, 0xe9, 0x82, 0xa1, 0x97, 0x5d, 0xa7, 0xd7, 0x92, 0x77, 0xc2, 0x70,
    0x57, 0x27, 0xa5, 0x68, 0x94, 0xba, 0x0f, 0xb2, 0x46, 0xad, 0xaa, 0xbb, 0x1f, 0x46, 0x32, 0xe3,
];
pub const GENESIS_HASH_TESTNET: [u8; 32] = [
    0x48, 0xca, 0x7c, 0xd3, 0xc8, 0xde, 0x5b, 0x6a, 0x4d, 0x53, 0xd2, 0x86, 0x1f, 0xbd, 0xae, 0xdc,
    0xa1, 0x41, 0x55, 0x35, 0x59, 0xf9, 0xbe, 0x95, 0x20, 0x06, 0x80, 0x53, 0xcd, 0xa8, 0x43, 0x0b,
];

/// `0x0C` (Section) with the array bit set — the literal byte the writer
/// must emit before every `local_peerlist_new`-shaped array of sections.
pub const ARRAY_OF_SECTION_SENTINEL: u8 = 0x8C;

pub const COMMAND_HANDSHAKE: u32 = 1001;
pub const COMMAND_TIMED_SYNC: u32 = 1002;
pub const COMMAND_PING_PONG: u32 = 1003;

pub const LEVIN_FLAG_REQUEST: u32 = 1;
pub const LEVIN_FLAG_RESPONSE: u32 = 2;

/// Up to this many synthetic peers are ever handed back in one response.
pub const MAX_PEERLIST_ENTRY_NUM: usize = 250;

/// Network this node presents itself as belonging to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkType {
    Mainnet,
    Testnet,
}

impl NetworkType {
    pub fn network_id(self) -> [u8; 16] {
        match self {
            NetworkType::Mainnet => NETWORK_ID_MAINNET,
            NetworkType::Testnet => NETWORK_ID_TESTNET,
        }
    }

    pub fn genesis_hash(self) -> [u8; 32] {
        match self {
            NetworkType::Mainnet => GENESIS_HASH_MAINNET,
            NetworkType::Testnet => GENESIS_HASH_TESTNET,
        }
    }
}
