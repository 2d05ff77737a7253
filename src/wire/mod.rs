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

//! The Monero P2P wire format: Levin framing over a recursive,
//! self-describing "portable storage" payload.

/// Wire-level constants shared by the framing and payload codecs.
pub mod constants;
/// The 33-byte Levin framing header.
pub mod levin;
/// Handshake / Timed-Sync / Ping-Pong payload constructors.
pub mod messages;
/// The recursive portable-storage value tree and its codec.
pub mod storage;
/// The 1/2/4/8-byte varint length prefix used throughout portable storage.
pub mod varint;

pub use storage::{ScalarKind, Section, StorageError, Value};
pub use varint::VarintError;
