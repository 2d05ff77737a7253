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

use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use thiserror::Error;

/// Metrics errors.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus")]
    Prom,
}

/// Metrics container.
#[derive(Clone)]
pub struct Metrics {
    /// Registry.
    pub registry: Registry,

    /// Currently registered inbound connections.
    pub inbound_peers: IntGauge,
    /// Currently registered outbound connections.
    pub outbound_peers: IntGauge,
    /// Handshake requests that produced a sent response.
    pub handshakes_completed_total: IntCounter,
    /// Connections dropped due to a protocol error, by `reason`.
    pub protocol_errors_total: IntCounterVec,
}

impl Metrics {
    /// Create and register metrics.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let inbound_peers = IntGauge::new("levinode_inbound_peers", "Registered inbound connections")
            .map_err(|_| MetricsError::Prom)?;
        let outbound_peers = IntGauge::new("levinode_outbound_peers", "Registered outbound connections")
            .map_err(|_| MetricsError::Prom)?;
        let handshakes_completed_total = IntCounter::new(
            "levinode_handshakes_completed_total",
            "Handshake requests that produced a sent response",
        )
        .map_err(|_| MetricsError::Prom)?;
        let protocol_errors_total = IntCounterVec::new(
            Opts::new("levinode_protocol_errors_total", "Connections dropped due to a protocol error"),
            &["reason"],
        )
        .map_err(|_| MetricsError::Prom)?;

        registry
            .register(Box::new(inbound_peers.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(outbound_peers.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(handshakes_completed_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(protocol_errors_total.clone()))
            .map_err(|_| MetricsError::Prom)?;

        Ok(Self {
            registry,
            inbound_peers,
            outbound_peers,
            handshakes_completed_total,
            protocol_errors_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_registers_every_metric() {
        let metrics = Metrics::new().expect("metrics register");
        assert_eq!(metrics.registry.gather().len(), 4);
    }

    #[test]
    fn counters_start_at_zero() {
        let metrics = Metrics::new().expect("metrics register");
        assert_eq!(metrics.inbound_peers.get(), 0);
        assert_eq!(metrics.outbound_peers.get(), 0);
        assert_eq!(metrics.handshakes_completed_total.get(), 0);
    }
}
