//! Genesis file download

use crate::{
    error::{Error, ErrorKind::*},
    prelude::*,
    rpc::Transport,
};
use std::{io::Write, path::Path};
use tempfile::NamedTempFile;
use tendermint::chain;

/// Placeholder substituted with the chain ID in genesis URL templates
pub const CHAIN_ID_PLACEHOLDER: &str = "$CHAIN_ID";

/// Genesis document source
#[derive(Clone, Debug)]
pub struct GenesisSource {
    /// URL template containing `$CHAIN_ID`
    url_template: String,
}

impl GenesisSource {
    /// Create a source from a URL template
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
        }
    }

    /// Genesis URL for a particular chain
    pub fn url(&self, chain_id: &chain::Id) -> String {
        self.url_template.replace(CHAIN_ID_PLACEHOLDER, chain_id.as_str())
    }

    /// Download the genesis document for `chain_id`, returning its raw bytes
    pub fn fetch(&self, transport: &dyn Transport, chain_id: &chain::Id) -> Result<Vec<u8>, Error> {
        let url = self.url(chain_id);

        let response = transport
            .get(&url)
            .map_err(|e| format_err!(GenesisFetchFailed, "couldn't fetch {}: {}", url, e))?;

        if !response.is_ok() {
            fail!(
                GenesisFetchFailed,
                "GET {} returned HTTP {}",
                url,
                response.status
            );
        }

        debug!("fetched {} byte genesis for {}", response.body.len(), chain_id);
        Ok(response.body)
    }
}

/// Write genesis bytes verbatim, replacing any previous file atomically
pub fn write(path: &Path, genesis: &[u8]) -> Result<(), Error> {
    let parent_dir = path.parent().ok_or_else(|| {
        format_err!(IoError, "genesis path has no parent: {}", path.display())
    })?;

    let mut file = NamedTempFile::new_in(parent_dir)?;
    file.write_all(genesis)?;
    file.persist(path)
        .map_err(|e| format_err!(IoError, "couldn't write {}: {}", path.display(), e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::testing::FakeTransport;
    use std::fs;

    const TEMPLATE: &str = "http://genesis.test/$CHAIN_ID/genesis.json";

    #[test]
    fn url_is_keyed_by_chain_id() {
        let source = GenesisSource::new(TEMPLATE);
        assert_eq!(
            source.url(&"atlantic-2".parse().unwrap()),
            "http://genesis.test/atlantic-2/genesis.json"
        );
    }

    #[test]
    fn fetches_raw_bytes() {
        let body = b"{\"chain_id\":\"atlantic-2\"}\n".to_vec();
        let transport = FakeTransport::new().route(
            "http://genesis.test/atlantic-2/genesis.json",
            200,
            body.clone(),
        );

        let genesis = GenesisSource::new(TEMPLATE)
            .fetch(&transport, &"atlantic-2".parse().unwrap())
            .unwrap();
        assert_eq!(genesis, body);
    }

    #[test]
    fn failures_are_fatal() {
        let chain_id = "atlantic-2".parse().unwrap();
        let source = GenesisSource::new(TEMPLATE);

        let err = source.fetch(&FakeTransport::new(), &chain_id).unwrap_err();
        assert_eq!(*err.kind(), GenesisFetchFailed);

        let transport =
            FakeTransport::new().route("http://genesis.test/atlantic-2/genesis.json", 404, "");
        let err = source.fetch(&transport, &chain_id).unwrap_err();
        assert_eq!(*err.kind(), GenesisFetchFailed);
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.json");
        fs::write(&path, "stale").unwrap();

        write(&path, b"\x00fresh\xff").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"\x00fresh\xff");
    }
}
