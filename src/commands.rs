//! Subcommands of the `sei-bootstrap` command-line application

pub mod bootstrap;
pub mod version;

pub use self::{bootstrap::BootstrapCmd, version::VersionCommand};

use crate::config::{BootstrapConfig, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
use abscissa_core::{Command, Configurable, Runnable};
use clap::Parser;
use std::{env, path::PathBuf};

/// Subcommands of the bootstrapper command-line application
#[derive(Command, Debug, Parser, Runnable)]
pub enum BootstrapCommand {
    /// configure a Sei node for state sync and start it
    Bootstrap(BootstrapCmd),

    /// display the version
    Version(VersionCommand),
}

impl BootstrapCommand {
    /// Are we configured for verbose logging?
    pub fn verbose(&self) -> bool {
        match self {
            BootstrapCommand::Bootstrap(bootstrap) => bootstrap.verbose,
            _ => false,
        }
    }
}

impl Configurable<BootstrapConfig> for BootstrapCommand {
    /// Get the path to the configuration file: the `-c` flag, then the
    /// environment variable, then `sei-bootstrap.toml` if present. With none
    /// of these the built-in defaults apply.
    fn config_path(&self) -> Option<PathBuf> {
        let config = match self {
            BootstrapCommand::Bootstrap(bootstrap) => bootstrap.config.as_ref(),
            _ => return None,
        };

        config
            .cloned()
            .or_else(|| env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
            .or_else(|| {
                let default = PathBuf::from(CONFIG_FILE_NAME);
                default.exists().then_some(default)
            })
    }
}
