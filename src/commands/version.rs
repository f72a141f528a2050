//! Provide the version

use crate::prelude::*;
use abscissa_core::Command;
use clap::Parser;
use std::process;

/// The `version` command
#[derive(Command, Debug, Default, Parser)]
pub struct VersionCommand {}

impl Runnable for VersionCommand {
    /// Print the bootstrapper version
    fn run(&self) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }
}
