//! Peer discovery: persistent peers reachable from the live endpoint

use crate::{
    error::{Error, ErrorKind::*},
    prelude::*,
    prober::LiveEndpoint,
    rpc::{self, Transport},
};
use serde::Deserialize;
use std::{
    collections::BTreeSet,
    fmt::{self, Display},
    fs,
    path::Path,
};
use tendermint::node;

/// Node key file (`config/node_key.json`); only the ID is used
#[derive(Clone, Debug)]
pub struct NodeKey {
    /// This node's ID
    pub id: node::Id,
}

#[derive(Deserialize)]
struct NodeKeyFile {
    id: String,
}

impl NodeKey {
    /// Load the node key from a JSON file
    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = fs::read_to_string(path.as_ref()).map_err(|e| {
            format_err!(
                IdentityError,
                "couldn't read node key {}: {}",
                path.as_ref().display(),
                e
            )
        })?;

        let file = serde_json::from_str::<NodeKeyFile>(&json).map_err(|e| {
            format_err!(
                IdentityError,
                "error parsing {}: {}",
                path.as_ref().display(),
                e
            )
        })?;

        let id = file
            .id
            .parse()
            .map_err(|e| format_err!(IdentityError, "invalid node ID `{}`: {}", file.id, e))?;

        Ok(Self { id })
    }
}

/// Peer reachable from the live endpoint
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Peer {
    /// Peer's node ID
    pub id: node::Id,

    /// Dialable address (`id@host:port`) with any transport scheme removed
    pub address: String,
}

/// Set of peers, ordered by ID then address so it renders reproducibly
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PeerSet(BTreeSet<Peer>);

impl PeerSet {
    /// Number of peers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is the set empty?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the peers
    pub fn iter(&self) -> impl Iterator<Item = &Peer> {
        self.0.iter()
    }

    /// Does the set contain a peer with this ID?
    pub fn contains_id(&self, id: &node::Id) -> bool {
        self.0.iter().any(|peer| peer.id == *id)
    }
}

impl FromIterator<Peer> for PeerSet {
    fn from_iter<I: IntoIterator<Item = Peer>>(iter: I) -> Self {
        PeerSet(iter.into_iter().collect())
    }
}

/// Renders as the `persistent-peers` value: comma-separated addresses
impl Display for PeerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, peer) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(&peer.address)?;
        }
        Ok(())
    }
}

/// `/net_info` response (the parts we use)
#[derive(Debug, Deserialize)]
struct NetInfo {
    #[serde(default)]
    peers: Vec<NetInfoPeer>,
}

#[derive(Debug, Deserialize)]
struct NetInfoPeer {
    node_id: String,
    url: String,
}

/// Strip a transport scheme (e.g. `mconn://`) from a peer URL
pub fn strip_scheme(url: &str) -> &str {
    match url.find("://") {
        Some(pos) => &url[pos + 3..],
        None => url,
    }
}

/// Query the endpoint's peers, excluding `self_id`
pub fn resolve(
    transport: &dyn Transport,
    endpoint: &LiveEndpoint,
    self_id: &node::Id,
) -> Result<PeerSet, Error> {
    let net_info = rpc::get_json::<NetInfo>(transport, &endpoint.route("net_info"))
        .map_err(|e| format_err!(PeerDiscoveryFailed, "net_info query failed: {}", e))?;

    let peers = net_info
        .peers
        .into_iter()
        .filter_map(|peer| match peer.node_id.parse::<node::Id>() {
            Ok(id) => Some(Peer {
                id,
                address: strip_scheme(&peer.url).to_owned(),
            }),
            Err(e) => {
                warn!("ignoring peer with invalid ID `{}`: {}", peer.node_id, e);
                None
            }
        })
        .filter(|peer| peer.id != *self_id)
        .collect::<PeerSet>();

    debug!("discovered {} peer(s) via {}", peers.len(), endpoint);
    Ok(peers)
}
