//! HTTP transport used for registry, RPC and genesis requests
//!
//! All lookups go through the [`Transport`] trait so the resolvers can be
//! driven by an in-memory fake in tests. The production implementation is a
//! blocking `ureq` agent with per-request timeouts.

use crate::{
    config::RpcConfig,
    error::{Error, ErrorKind::*},
    prelude::*,
};
use serde::{de::DeserializeOwned, Deserialize};
use std::{io::Read, time::Duration};

/// HTTP status code for success
pub const STATUS_OK: u16 = 200;

/// Response to a GET request
#[derive(Clone, Debug)]
pub struct Response {
    /// HTTP status code
    pub status: u16,

    /// Response body
    pub body: Vec<u8>,
}

impl Response {
    /// Did the server answer with `200 OK`?
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Blocking HTTP GET transport
pub trait Transport {
    /// Fetch `url`. Non-success statuses are returned as responses; only
    /// connection-level failures (refused, timeout, DNS) are errors.
    fn get(&self, url: &str) -> Result<Response, Error>;

    /// Liveness probe: a short-timeout GET which only reports the status
    fn probe(&self, url: &str) -> Result<u16, Error>;
}

/// `ureq`-backed transport
#[derive(Debug)]
pub struct HttpTransport {
    agent: ureq::Agent,
    probe_timeout: Duration,
}

impl HttpTransport {
    /// Create a transport from the RPC configuration
    pub fn new(config: &RpcConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.request_timeout())
            .user_agent(&format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build();

        Self {
            agent,
            probe_timeout: config.probe_timeout(),
        }
    }

    fn call(&self, request: ureq::Request) -> Result<ureq::Response, Error> {
        match request.call() {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(_, response)) => Ok(response),
            Err(ureq::Error::Transport(e)) => Err(format_err!(HttpError, "{}", e).into()),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(&RpcConfig::default())
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Response, Error> {
        debug!("GET {}", url);
        let response = self.call(self.agent.get(url))?;
        let status = response.status();

        let mut body = Vec::new();
        response.into_reader().read_to_end(&mut body)?;

        Ok(Response { status, body })
    }

    fn probe(&self, url: &str) -> Result<u16, Error> {
        debug!("probing {}", url);
        let request = self.agent.get(url).timeout(self.probe_timeout);
        Ok(self.call(request)?.status())
    }
}

/// Tendermint RPC responses come either bare or wrapped in a JSON-RPC
/// envelope depending on the node version
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { result: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { result } => result,
            Envelope::Bare(inner) => inner,
        }
    }
}

/// GET `url` and decode a `200 OK` JSON body
pub fn get_json<T>(transport: &dyn Transport, url: &str) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let response = transport.get(url)?;

    if !response.is_ok() {
        fail!(HttpError, "GET {} returned HTTP {}", url, response.status);
    }

    let envelope = serde_json::from_slice::<Envelope<T>>(&response.body)
        .map_err(|e| format_err!(ParseError, "malformed response from {}: {}", url, e))?;

    Ok(envelope.into_inner())
}
