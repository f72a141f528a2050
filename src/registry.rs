//! Chain registry client: resolves a chain ID to candidate RPC endpoints

use crate::{
    error::{Error, ErrorKind::*},
    prelude::*,
    rpc::{self, Transport},
    Map,
};
use serde::Deserialize;
use std::fmt::{self, Display};
use tendermint::chain;

/// RPC endpoint listed in the registry for a particular chain
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EndpointCandidate {
    /// Base URL of the RPC server
    pub url: String,

    /// Chain this endpoint serves
    pub chain_id: chain::Id,
}

impl EndpointCandidate {
    /// Create a new candidate
    pub fn new(url: impl Into<String>, chain_id: chain::Id) -> Self {
        Self {
            url: url.into(),
            chain_id,
        }
    }
}

impl Display for EndpointCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.chain_id)
    }
}

/// Registry document: network name => entry
type Document = Map<String, Entry>;

/// Registry entry for a single network
#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(rename = "chainId")]
    chain_id: Option<String>,

    #[serde(default)]
    rpc: Vec<RpcEntry>,
}

#[derive(Debug, Deserialize)]
struct RpcEntry {
    url: String,
}

/// Chain registry client
#[derive(Clone, Debug)]
pub struct Registry {
    /// URL of the registry document
    url: String,
}

impl Registry {
    /// Create a client for the registry document at `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Get the registry document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resolve `chain_id` to its RPC endpoints, in the order the registry
    /// lists them. No liveness or ranking is implied by the order.
    pub fn resolve(
        &self,
        transport: &dyn Transport,
        chain_id: &chain::Id,
    ) -> Result<Vec<EndpointCandidate>, Error> {
        let document = rpc::get_json::<Document>(transport, &self.url).map_err(|e| {
            format_err!(
                RegistryUnavailable,
                "couldn't load chain registry {}: {}",
                self.url,
                e
            )
        })?;

        let entry = document
            .values()
            .find(|entry| entry.chain_id.as_deref() == Some(chain_id.as_str()))
            .ok_or_else(|| {
                format_err!(ChainNotFound, "no registry entry for chain `{}`", chain_id)
            })?;

        debug!(
            "registry lists {} RPC endpoint(s) for {}",
            entry.rpc.len(),
            chain_id
        );

        Ok(entry
            .rpc
            .iter()
            .map(|rpc| EndpointCandidate::new(rpc.url.clone(), chain_id.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::testing::FakeTransport;
    use serde_json::json;

    const REGISTRY_URL: &str = "http://registry.test/chains.json";

    fn registry_document() -> serde_json::Value {
        json!({
            "arctic-1": {
                "chainId": "arctic-1",
                "rpc": [{ "provider": "sei", "url": "http://arctic.test" }]
            },
            "atlantic-2": {
                "chainId": "atlantic-2",
                "rpc": [
                    { "provider": "a", "url": "http://z.test" },
                    { "provider": "b", "url": "http://a.test" },
                    { "provider": "c", "url": "http://m.test" }
                ]
            },
            "pending": { "rpc": [] }
        })
    }

    #[test]
    fn preserves_listed_order() {
        let transport = FakeTransport::new().json(REGISTRY_URL, registry_document());
        let chain_id = "atlantic-2".parse().unwrap();
        let candidates = Registry::new(REGISTRY_URL)
            .resolve(&transport, &chain_id)
            .unwrap();

        let urls = candidates.iter().map(|c| c.url.as_str()).collect::<Vec<_>>();
        assert_eq!(urls, ["http://z.test", "http://a.test", "http://m.test"]);
        assert!(candidates.iter().all(|c| c.chain_id == chain_id));
    }

    #[test]
    fn unknown_chain() {
        let transport = FakeTransport::new().json(REGISTRY_URL, registry_document());
        let err = Registry::new(REGISTRY_URL)
            .resolve(&transport, &"pacific-1".parse().unwrap())
            .unwrap_err();

        assert_eq!(*err.kind(), ChainNotFound);
    }

    #[test]
    fn unreachable_or_malformed_registry() {
        let chain_id = "atlantic-2".parse().unwrap();

        let unreachable = FakeTransport::new();
        let err = Registry::new(REGISTRY_URL)
            .resolve(&unreachable, &chain_id)
            .unwrap_err();
        assert_eq!(*err.kind(), RegistryUnavailable);

        let malformed = FakeTransport::new().route(REGISTRY_URL, 200, "<html>");
        let err = Registry::new(REGISTRY_URL)
            .resolve(&malformed, &chain_id)
            .unwrap_err();
        assert_eq!(*err.kind(), RegistryUnavailable);
    }
}
