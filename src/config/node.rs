//! Local node configuration

use crate::{
    error::{Error, ErrorKind::*},
    node::NodeHome,
    prelude::*,
};
use serde::Deserialize;
use std::{env, path::PathBuf};

/// Name of the node's home directory under `$HOME`
pub const DEFAULT_HOME_DIR: &str = ".sei";

/// Node configuration
#[derive(Clone, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    /// Node home directory (default: `$HOME/.sei`)
    pub home: Option<PathBuf>,

    /// Node binary
    #[serde(default = "binary_default")]
    pub binary: PathBuf,

    /// Moniker passed to `init`
    #[serde(default = "moniker_default")]
    pub moniker: String,

    /// Script which brings up a local single-node chain
    #[serde(default = "local_init_script_default")]
    pub local_init_script: PathBuf,
}

impl NodeConfig {
    /// Resolve the node home directory
    pub fn home(&self) -> Result<NodeHome, Error> {
        if let Some(home) = &self.home {
            return Ok(NodeHome::new(home));
        }

        let user_home = env::var_os("HOME").ok_or_else(|| {
            format_err!(ConfigError, "`HOME` is unset and no `node.home` configured")
        })?;

        Ok(NodeHome::new(PathBuf::from(user_home).join(DEFAULT_HOME_DIR)))
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            home: None,
            binary: binary_default(),
            moniker: moniker_default(),
            local_init_script: local_init_script_default(),
        }
    }
}

fn binary_default() -> PathBuf {
    PathBuf::from("seid")
}

fn moniker_default() -> String {
    "demo".to_owned()
}

fn local_init_script_default() -> PathBuf {
    PathBuf::from("scripts/initialize_local_chain.sh")
}
