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

//! Environment-driven runtime configuration, read once at startup.

use std::net::Ipv4Addr;

use crate::wire::constants::NetworkType;

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// An optional single outgoing dial target, read from `LEVINODE_DIAL`
/// (`ip:port`) together with `LEVINODE_DIAL_DISCONNECT_IMMEDIATELY`.
#[derive(Debug, Clone, Copy)]
pub struct DialTarget {
    pub ip: Ipv4Addr,
    pub port: u16,
    pub disconnect_immediately: bool,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub network_type: NetworkType,
    pub listen_port: u16,
    pub dial: Option<DialTarget>,
}

impl Config {
    /// Read configuration from the environment, falling back to mainnet
    /// on port 18080 with no outgoing dial when a variable is absent.
    pub fn from_env() -> Self {
        let network_type = match env("LEVINODE_NETWORK", "mainnet").as_str() {
            "testnet" => NetworkType::Testnet,
            _ => NetworkType::Mainnet,
        };

        let listen_port: u16 = env("LEVINODE_LISTEN_PORT", "18080")
            .parse()
            .unwrap_or(18080);

        let dial = std::env::var("LEVINODE_DIAL").ok().and_then(|addr| {
            let (ip, port) = addr.split_once(':')?;
            let ip: Ipv4Addr = ip.parse().ok()?;
            let port: u16 = port.parse().ok()?;
            let disconnect_immediately = env("LEVINODE_DIAL_DISCONNECT_IMMEDIATELY", "false")
                .parse()
                .unwrap_or(false);
            Some(DialTarget { ip, port, disconnect_immediately })
        });

        Self { network_type, listen_port, dial }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_mainnet_with_no_dial() {
        std::env::remove_var("LEVINODE_NETWORK");
        std::env::remove_var("LEVINODE_DIAL");
        let cfg = Config::from_env();
        assert_eq!(cfg.network_type, NetworkType::Mainnet);
        assert!(cfg.dial.is_none());
    }
}
