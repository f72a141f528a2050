//! State sync trust parameters: a recent block height and its hash
//!
//! The trusted block sits [`TRUST_WINDOW`] blocks behind the chain head so
//! it is safely final by the time the node verifies against it. Height and
//! hash are always fetched as a pair from the same endpoint.

use crate::{
    error::{Error, ErrorKind::*},
    prelude::*,
    prober::LiveEndpoint,
    rpc::{self, Transport},
};
use serde::Deserialize;
use tendermint::{block, hash::Algorithm, Hash};

/// Number of blocks to stay behind the latest height
pub const TRUST_WINDOW: u64 = 40_000;

/// Trusted height/hash pair for state sync
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrustParams {
    /// Trusted block height
    pub height: block::Height,

    /// Hash of the block at `height`
    hash: Hash,

    /// The hash exactly as the endpoint returned it
    hash_hex: String,
}

impl TrustParams {
    /// Pair `height` with a hex block hash, which must be a non-empty SHA-256
    pub fn new(height: block::Height, hash_hex: impl Into<String>) -> Result<Self, Error> {
        let hash_hex = hash_hex.into();

        let hash = Hash::from_hex_upper(Algorithm::Sha256, &hash_hex.to_uppercase())
            .map_err(|e| {
                format_err!(
                    TrustResolutionFailed,
                    "invalid hash `{}` for block {}: {}",
                    hash_hex,
                    height,
                    e
                )
            })?;

        if matches!(hash, Hash::None) {
            fail!(TrustResolutionFailed, "empty hash for block {}", height);
        }

        Ok(Self {
            height,
            hash,
            hash_hex,
        })
    }

    /// Parsed block hash
    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    /// Block hash in the form the endpoint reported it
    pub fn hash_hex(&self) -> &str {
        &self.hash_hex
    }
}

/// Compute the trust height for the given latest height
pub fn trust_height(latest: u64) -> u64 {
    if latest > TRUST_WINDOW {
        latest - TRUST_WINDOW
    } else {
        latest
    }
}

/// `/status` response (the parts we use)
#[derive(Debug, Deserialize)]
struct StatusResponse {
    sync_info: SyncInfo,
}

#[derive(Debug, Deserialize)]
struct SyncInfo {
    /// Decimal string
    latest_block_height: String,
}

/// `/block` response (the parts we use)
#[derive(Debug, Deserialize)]
struct BlockResponse {
    block_id: BlockId,
}

#[derive(Debug, Deserialize)]
struct BlockId {
    hash: String,
}

/// Resolve trust parameters from `endpoint`
pub fn resolve(transport: &dyn Transport, endpoint: &LiveEndpoint) -> Result<TrustParams, Error> {
    let status = rpc::get_json::<StatusResponse>(transport, &endpoint.route("status"))
        .map_err(|e| format_err!(TrustResolutionFailed, "status query failed: {}", e))?;

    let latest = status
        .sync_info
        .latest_block_height
        .trim()
        .parse::<u64>()
        .map_err(|e| {
            format_err!(
                TrustResolutionFailed,
                "invalid latest_block_height `{}`: {}",
                status.sync_info.latest_block_height,
                e
            )
        })?;

    if latest == 0 {
        fail!(TrustResolutionFailed, "{} has no blocks yet", endpoint);
    }

    let height = block::Height::try_from(trust_height(latest))
        .map_err(|e| format_err!(TrustResolutionFailed, "invalid trust height: {}", e))?;

    debug!("latest height {}, trusting height {}", latest, height);

    let block = rpc::get_json::<BlockResponse>(
        transport,
        &endpoint.route(&format!("block?height={height}")),
    )
    .map_err(|e| format_err!(TrustResolutionFailed, "block query at {} failed: {}", height, e))?;

    TrustParams::new(height, block.block_id.hash)
}
