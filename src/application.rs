//! Abscissa `Application` for the bootstrapper

use crate::{commands::BootstrapCommand, config::BootstrapConfig};
use abscissa_core::{
    application::{self, AppCell},
    config::{self, CfgCell},
    trace, Application, FrameworkError, StandardPaths,
};

/// Application state
pub static APP: AppCell<BootstrapApplication> = AppCell::new();

/// The `sei-bootstrap` application
#[derive(Debug, Default)]
pub struct BootstrapApplication {
    /// Loaded `sei-bootstrap.toml`, or the defaults when there is none
    config: CfgCell<BootstrapConfig>,

    state: application::State<Self>,
}

impl Application for BootstrapApplication {
    type Cmd = BootstrapCommand;
    type Cfg = BootstrapConfig;
    type Paths = StandardPaths;

    fn config(&self) -> config::Reader<BootstrapConfig> {
        self.config.read()
    }

    fn state(&self) -> &application::State<Self> {
        &self.state
    }

    fn register_components(&mut self, command: &Self::Cmd) -> Result<(), FrameworkError> {
        let components = self.framework_components(command)?;
        self.state.components_mut().register(components)
    }

    /// Runs whether or not a config file was found
    fn after_config(&mut self, config: Self::Cfg) -> Result<(), FrameworkError> {
        self.state.components_mut().after_config(&config)?;
        self.config.set_once(config);
        Ok(())
    }

    /// `-v` switches tracing to verbose output
    fn tracing_config(&self, command: &BootstrapCommand) -> trace::Config {
        if command.verbose() {
            trace::Config::verbose()
        } else {
            trace::Config::default()
        }
    }
}
