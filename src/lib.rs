//! Sei node bootstrapper
//!
//! Resolves everything a fresh full node needs to join a network via state
//! sync (a live RPC endpoint, the trust height/hash pair, persistent peers
//! and the genesis file) and reconciles the node's `config.toml` and
//! `app.toml` with those values.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod application;
pub mod bootstrap;
pub mod commands;
pub mod config;
pub mod error;
pub mod genesis;
pub mod network;
pub mod node;
pub mod peers;
pub mod prelude;
pub mod prober;
pub mod reconcile;
pub mod registry;
pub mod rpc;
pub mod trust;

pub use crate::application::BootstrapApplication;

// Map type used within this application
use std::collections::BTreeMap as Map;
