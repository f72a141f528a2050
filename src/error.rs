//! Error types

use abscissa_core::error::{BoxError, Context};
use std::{
    fmt::{self, Display},
    io,
    ops::Deref,
};
use thiserror::Error;

/// Kinds of errors
#[derive(Copy, Clone, Eq, PartialEq, Debug, Error)]
pub enum ErrorKind {
    /// Chain registry document couldn't be fetched or parsed
    #[error("chain registry unavailable")]
    RegistryUnavailable,

    /// No registry entry for the requested chain ID
    #[error("chain not found in registry")]
    ChainNotFound,

    /// None of the candidate RPC endpoints answered the liveness probe
    #[error("no live RPC endpoint")]
    NoLiveEndpoint,

    /// Couldn't resolve the state sync trust height/hash pair
    #[error("trust parameter resolution failed")]
    TrustResolutionFailed,

    /// Couldn't query the endpoint's peers
    #[error("peer discovery failed")]
    PeerDiscoveryFailed,

    /// Couldn't download the genesis file
    #[error("genesis fetch failed")]
    GenesisFetchFailed,

    /// Couldn't write back a node configuration document
    #[error("config write failed")]
    ConfigWriteFailed,

    /// Error in the bootstrapper's own configuration
    #[error("config error")]
    ConfigError,

    /// Local node identity (`node_key.json`) missing or malformed
    #[error("node identity error")]
    IdentityError,

    /// External command (node binary or init script) failed
    #[error("command failed")]
    CommandFailed,

    /// HTTP transport error or unexpected status
    #[error("HTTP error")]
    HttpError,

    /// Input/output error
    #[error("I/O error")]
    IoError,

    /// Parse error
    #[error("parse error")]
    ParseError,
}

impl ErrorKind {
    /// Create an error context from this error
    pub fn context(self, source: impl Into<BoxError>) -> Context<ErrorKind> {
        Context::new(self, Some(source.into()))
    }
}

/// Error type
#[derive(Debug)]
pub struct Error(Box<Context<ErrorKind>>);

impl Deref for Error {
    type Target = Context<ErrorKind>;

    fn deref(&self) -> &Context<ErrorKind> {
        &self.0
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Context::new(kind, None).into()
    }
}

impl From<Context<ErrorKind>> for Error {
    fn from(context: Context<ErrorKind>) -> Self {
        Error(Box::new(context))
    }
}

impl From<io::Error> for Error {
    fn from(other: io::Error) -> Self {
        ErrorKind::IoError.context(other).into()
    }
}

impl From<serde_json::error::Error> for Error {
    fn from(other: serde_json::error::Error) -> Self {
        ErrorKind::ParseError.context(other).into()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}
