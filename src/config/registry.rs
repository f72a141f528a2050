//! Chain registry and genesis source configuration

use serde::Deserialize;

/// Public Sei chain registry
pub const DEFAULT_REGISTRY_URL: &str =
    "https://raw.githubusercontent.com/sei-protocol/chain-registry/main/chains.json";

/// Genesis file location; `$CHAIN_ID` is substituted at fetch time
pub const DEFAULT_GENESIS_URL: &str =
    "https://raw.githubusercontent.com/sei-protocol/testnet/main/$CHAIN_ID/genesis.json";

/// Registry configuration
#[derive(Clone, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// URL of the chain registry document
    #[serde(default = "default_url")]
    pub url: String,

    /// URL template for the genesis file (`$CHAIN_ID` placeholder)
    #[serde(default = "default_genesis_url")]
    pub genesis_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            genesis_url: default_genesis_url(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_REGISTRY_URL.to_owned()
}

fn default_genesis_url() -> String {
    DEFAULT_GENESIS_URL.to_owned()
}
