//! Configuration file structures (with serde-derived parser)

pub mod node;
pub mod registry;
pub mod rpc;

pub use self::{node::NodeConfig, registry::RegistryConfig, rpc::RpcConfig};

use serde::Deserialize;

/// Environment variable containing path to config file
pub const CONFIG_ENV_VAR: &str = "SEI_BOOTSTRAP_CONFIG";

/// Name of the bootstrapper configuration file
pub const CONFIG_FILE_NAME: &str = "sei-bootstrap.toml";

/// Bootstrapper configuration (i.e. TOML file parsed with serde)
///
/// Every section is optional: a missing file or section falls back to the
/// defaults for public Sei networks.
#[derive(Clone, Default, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Where to find the chain registry and genesis files
    #[serde(default)]
    pub registry: RegistryConfig,

    /// HTTP client settings for RPC requests
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Local node installation
    #[serde(default)]
    pub node: NodeConfig,
}
