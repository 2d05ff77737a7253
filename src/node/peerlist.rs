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

//! Synthetic peer entries for Timed Sync / Handshake responses. Entries
//! are drawn straight from a cryptographic RNG with no uniqueness or
//! plausibility filter — this is a fake node, not a real peer database.

use ring::rand::{SecureRandom, SystemRandom};

use crate::wire::constants::MAX_PEERLIST_ENTRY_NUM;
use crate::wire::messages::PeerEntry;

/// Produce up to `MAX_PEERLIST_ENTRY_NUM` random peer entries. `count` is
/// silently capped; a best-effort RNG failure yields fewer entries than
/// requested rather than panicking.
pub fn generate(rng: &SystemRandom, count: usize) -> Vec<PeerEntry> {
    let count = count.min(MAX_PEERLIST_ENTRY_NUM);
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let mut raw = [0u8; 14];
        if rng.fill(&mut raw).is_err() {
            break;
        }
        let ip = u32::from_le_bytes(raw[0..4].try_into().expect("4 bytes"));
        let port = u16::from_le_bytes(raw[4..6].try_into().expect("2 bytes"));
        let peer_id = u64::from_le_bytes(raw[6..14].try_into().expect("8 bytes"));
        entries.push(PeerEntry { ip, port, peer_id });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_at_max_entries() {
        let rng = SystemRandom::new();
        let entries = generate(&rng, 10_000);
        assert_eq!(entries.len(), MAX_PEERLIST_ENTRY_NUM);
    }

    #[test]
    fn zero_requested_yields_empty() {
        let rng = SystemRandom::new();
        assert!(generate(&rng, 0).is_empty());
    }
}
