//! RPC client configuration

use serde::Deserialize;
use std::time::Duration;

/// HTTP timeouts used when talking to registry and RPC endpoints
#[derive(Clone, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct RpcConfig {
    /// Timeout for a single liveness probe (seconds)
    #[serde(default = "probe_timeout_default")]
    pub probe_timeout_secs: u64,

    /// Timeout for every other request (seconds)
    #[serde(default = "request_timeout_default")]
    pub request_timeout_secs: u64,
}

impl RpcConfig {
    /// Liveness probe timeout
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: probe_timeout_default(),
            request_timeout_secs: request_timeout_default(),
        }
    }
}

fn probe_timeout_default() -> u64 {
    5
}

fn request_timeout_default() -> u64 {
    30
}
