//! `bootstrap` subcommand

use crate::{
    bootstrap::{Pipeline, Stage},
    error::{Error, ErrorKind::*},
    genesis::GenesisSource,
    network::{DbBackend, Environment},
    node::NodeBinary,
    prelude::*,
    registry::Registry,
    rpc::HttpTransport,
};
use abscissa_core::Command;
use clap::Parser;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process,
};

/// Abort the operation, printing a formatted message and exiting the process
/// with a status code of 1 (i.e. error)
macro_rules! abort {
    ($fmt:expr, $($arg:tt)+) => {
        status_err!(format!($fmt, $($arg)+));
        process::exit(1);
    };
}

/// The `bootstrap` command
#[derive(Command, Debug, Default, Parser)]
pub struct BootstrapCmd {
    /// Path to configuration file
    #[clap(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// environment to set up: local, devnet or testnet (prompted if omitted)
    #[clap(short = 'e', long = "env")]
    pub env: Option<Environment>,

    /// database backend: sei-db or legacy
    #[clap(short = 'd', long = "db-backend")]
    pub db_backend: Option<DbBackend>,

    /// node home directory (overrides `node.home`)
    #[clap(long = "home")]
    pub home: Option<PathBuf>,

    /// node moniker (overrides `node.moniker`)
    #[clap(long = "moniker")]
    pub moniker: Option<String>,

    /// write the configuration but don't start the node
    #[clap(long = "no-start")]
    pub no_start: bool,

    /// enable verbose debug logging
    #[clap(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Runnable for BootstrapCmd {
    fn run(&self) {
        let config = APP.config();

        let (env, db_backend) = self.choices().unwrap_or_else(|e| {
            abort!("{}", e);
        });

        let mut node_config = config.node.clone();

        if let Some(home) = &self.home {
            node_config.home = Some(home.clone());
        }

        if let Some(moniker) = &self.moniker {
            node_config.moniker = moniker.clone();
        }

        let home = node_config.home().unwrap_or_else(|e| {
            abort!("{}", e);
        });

        status_ok!("Setting up", "a node in {} ({})", env, home.path().display());

        let transport = HttpTransport::new(&config.rpc);
        let node = NodeBinary::from_config(&node_config, home.clone());
        let mut pipeline = Pipeline::new(
            &transport,
            &node,
            home,
            Registry::new(&config.registry.url),
            GenesisSource::new(&config.registry.genesis_url),
        );

        if let Err(e) = pipeline.run(env, db_backend, false) {
            abort!("{}", e);
        }

        for patched in pipeline.patched() {
            status_ok!(
                "Patched",
                "{} ({})",
                patched.path.display(),
                patched.rewritten.join(", ")
            );
        }

        if pipeline.stage() == Stage::Launched {
            status_ok!("Finished", "local chain initialized");
        } else if self.no_start {
            status_ok!("Finished", "node configured; start it with `seid start`");
        } else {
            status_ok!("Starting", "{}", node_config.binary.display());

            if let Err(e) = pipeline.launch() {
                abort!("{}", e);
            }
        }
    }
}

impl BootstrapCmd {
    /// Environment and database backend, from flags or the interactive menus
    fn choices(&self) -> Result<(Environment, DbBackend), Error> {
        let stdin = io::stdin();
        let stdout = io::stdout();

        let env = match self.env {
            Some(env) => env,
            None => prompt_environment(&mut stdin.lock(), &mut stdout.lock())?,
        };

        let db_backend = match self.db_backend {
            Some(db_backend) => db_backend,
            None if self.env.is_none() && env != Environment::Local => {
                prompt_db_backend(&mut stdin.lock(), &mut stdout.lock())?
            }
            None => DbBackend::default(),
        };

        Ok((env, db_backend))
    }
}

/// Ask for the environment until a valid choice is entered
pub fn prompt_environment<R, W>(input: &mut R, output: &mut W) -> Result<Environment, Error>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(output, "Please choose an environment:")?;
        for (n, env) in Environment::all().iter().enumerate() {
            writeln!(output, "  {}. {}", n + 1, env)?;
        }
        write!(output, "Enter the number of your choice: ")?;
        output.flush()?;

        match read_answer(input)?.parse() {
            Ok(env) => return Ok(env),
            Err(_) => writeln!(output, "Invalid input. Please enter 1, 2 or 3.")?,
        }
    }
}

/// Ask for the database backend; an empty answer picks the default
pub fn prompt_db_backend<R, W>(input: &mut R, output: &mut W) -> Result<DbBackend, Error>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(output, "Please choose the database backend:")?;
        writeln!(output, "  1. {}", DbBackend::SeiDb)?;
        writeln!(output, "  2. {} (default)", DbBackend::Legacy)?;
        write!(output, "Enter the number of your choice: ")?;
        output.flush()?;

        match read_answer(input)?.parse() {
            Ok(db_backend) => return Ok(db_backend),
            Err(_) => writeln!(output, "Invalid input. Please enter 1 or 2.")?,
        }
    }
}

/// Read one line, failing on end of input
fn read_answer<R: BufRead>(input: &mut R) -> Result<String, Error> {
    let mut line = String::new();

    if input.read_line(&mut line)? == 0 {
        fail!(ParseError, "no choice entered (end of input)");
    }

    Ok(line.trim().to_owned())
}
