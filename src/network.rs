//! Sei environments the bootstrapper can set a node up for

use crate::{
    error::{Error, ErrorKind::*},
    prelude::*,
};
use std::{
    fmt::{self, Display},
    str::FromStr,
};
use tendermint::chain;

/// Environment the node is being set up in
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Environment {
    /// Local single-node chain (no network lookups)
    Local,

    /// Sei devnet (`arctic-1`)
    Devnet,

    /// Sei testnet (`atlantic-2`)
    Testnet,
}

impl Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Local => "local",
            Environment::Devnet => "devnet",
            Environment::Testnet => "testnet",
        })
    }
}

impl Environment {
    /// Get a slice containing all known environments, in menu order
    pub fn all() -> &'static [Environment] {
        &[
            Environment::Local,
            Environment::Devnet,
            Environment::Testnet,
        ]
    }

    /// Chain ID for this environment (`None` for a local chain)
    pub fn chain_id(&self) -> Option<chain::Id> {
        let id = match self {
            Environment::Local => return None,
            Environment::Devnet => "arctic-1",
            Environment::Testnet => "atlantic-2",
        };

        // both IDs are well-formed constants
        id.parse().ok()
    }
}

impl FromStr for Environment {
    type Err = Error;

    /// Parse an environment by name or by its menu number
    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(match s.trim() {
            "1" | "local" => Environment::Local,
            "2" | "devnet" => Environment::Devnet,
            "3" | "testnet" => Environment::Testnet,
            other => {
                return Err(format_err!(ParseError, "unknown environment: `{}`", other).into())
            }
        })
    }
}

/// Database backend used for state commit
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DbBackend {
    /// SeiDB: embedded state commit store (`sc-enable = true`)
    SeiDb,

    /// Legacy IAVL store
    #[default]
    Legacy,
}

impl DbBackend {
    /// Does this backend need state commit enabled in `app.toml`?
    pub fn enables_state_commit(self) -> bool {
        self == DbBackend::SeiDb
    }
}

impl Display for DbBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DbBackend::SeiDb => "sei-db",
            DbBackend::Legacy => "legacy",
        })
    }
}

impl FromStr for DbBackend {
    type Err = Error;

    /// Parse a backend by name or by its menu number; empty input picks the default
    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(match s.trim() {
            "1" | "sei-db" | "seidb" => DbBackend::SeiDb,
            "" | "2" | "legacy" => DbBackend::Legacy,
            other => {
                return Err(format_err!(ParseError, "unknown database backend: `{}`", other).into())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_ids() {
        assert_eq!(Environment::Local.chain_id(), None);
        assert_eq!(
            Environment::Devnet.chain_id().unwrap().as_str(),
            "arctic-1"
        );
        assert_eq!(
            Environment::Testnet.chain_id().unwrap().as_str(),
            "atlantic-2"
        );
    }

    #[test]
    fn parse_by_name_or_number() {
        for (n, env) in Environment::all().iter().enumerate() {
            assert_eq!(env.to_string().parse::<Environment>().unwrap(), *env);
            assert_eq!((n + 1).to_string().parse::<Environment>().unwrap(), *env);
        }

        assert!("mainnet".parse::<Environment>().is_err());
    }

    #[test]
    fn db_backend_defaults_to_legacy() {
        assert_eq!("".parse::<DbBackend>().unwrap(), DbBackend::Legacy);
        assert_eq!("1".parse::<DbBackend>().unwrap(), DbBackend::SeiDb);
        assert!(DbBackend::SeiDb.enables_state_commit());
        assert!(!DbBackend::Legacy.enables_state_commit());
        assert!("rocksdb".parse::<DbBackend>().is_err());
    }
}
