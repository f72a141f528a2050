//! Endpoint prober: picks the first candidate RPC endpoint that is alive

use crate::{
    error::{Error, ErrorKind::*},
    prelude::*,
    registry::EndpointCandidate,
    rpc::{Transport, STATUS_OK},
};
use std::fmt::{self, Display};

/// Candidate endpoint which answered the liveness probe
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiveEndpoint(EndpointCandidate);

impl LiveEndpoint {
    /// Base URL of the endpoint, without a trailing slash
    pub fn url(&self) -> &str {
        self.0.url.trim_end_matches('/')
    }

    /// The candidate this endpoint was selected from
    pub fn candidate(&self) -> &EndpointCandidate {
        &self.0
    }

    /// URL for an RPC route on this endpoint (e.g. `status`)
    pub fn route(&self, path: &str) -> String {
        format!("{}/{}", self.url(), path.trim_start_matches('/'))
    }
}

impl Display for LiveEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

/// Scan `candidates` in order and return the first one whose probe answers
/// `200 OK`. Candidates after the selected one are never contacted.
///
/// Individual failures just move on to the next candidate; running out of
/// candidates is fatal and is not retried.
pub fn select_live(
    transport: &dyn Transport,
    candidates: &[EndpointCandidate],
) -> Result<LiveEndpoint, Error> {
    for candidate in candidates {
        match transport.probe(&candidate.url) {
            Ok(STATUS_OK) => {
                info!("selected RPC endpoint {}", candidate.url);
                return Ok(LiveEndpoint(candidate.clone()));
            }
            Ok(status) => debug!("{} answered HTTP {}; skipping", candidate.url, status),
            Err(e) => debug!("{} unreachable: {}", candidate.url, e),
        }
    }

    fail!(
        NoLiveEndpoint,
        "none of {} candidate endpoint(s) answered",
        candidates.len()
    );
}
