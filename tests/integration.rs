//! Bootstrapper integration tests

/// Integration tests for the bootstrapper command-line interface
mod cli;

/// Path to the bootstrapper executable
const BOOTSTRAP_EXE_PATH: &str = env!("CARGO_BIN_EXE_sei-bootstrap");
