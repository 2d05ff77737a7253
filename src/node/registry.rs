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

//! Connection registries keyed by a monotonically increasing connection
//! id rather than by socket identity, so they stay testable with a mock
//! transport (see the design notes on connection registries).

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;

/// A connection id, assigned at birth to each accepted or dialed socket.
pub type ConnId = u64;

/// The minimal state kept about a registered connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnHandle {
    pub addr: SocketAddr,
}

/// A mutex-guarded map of connection id to connection handle. Only insert
/// and remove are ever performed under the lock; neither is held across
/// socket I/O.
#[derive(Default)]
pub struct Registry {
    inner: Mutex<HashMap<ConnId, ConnHandle>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: ConnId, handle: ConnHandle) {
        self.inner.lock().expect("registry mutex poisoned").insert(id, handle);
    }

    pub fn remove(&self, id: ConnId) -> Option<ConnHandle> {
        self.inner.lock().expect("registry mutex poisoned").remove(&id)
    }

    pub fn contains(&self, id: ConnId) -> bool {
        self.inner.lock().expect("registry mutex poisoned").contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("registry mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "127.0.0.1:18080".parse().unwrap()
    }

    #[test]
    fn insert_and_remove_tracks_count() {
        let reg = Registry::new();
        reg.insert(1, ConnHandle { addr: addr() });
        reg.insert(2, ConnHandle { addr: addr() });
        assert_eq!(reg.len(), 2);
        reg.remove(1);
        assert_eq!(reg.len(), 1);
        assert!(reg.contains(2));
        assert!(!reg.contains(1));
    }

    #[test]
    fn removing_missing_id_is_a_no_op() {
        let reg = Registry::new();
        assert!(reg.remove(42).is_none());
        assert_eq!(reg.len(), 0);
    }
}
