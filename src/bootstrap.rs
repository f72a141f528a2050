//! Bootstrap pipeline: resolves everything state sync needs from the network,
//! then writes it into the node's home directory
//!
//! All network lookups for a remote environment complete before genesis or
//! either configuration document is written, so a failed lookup never leaves
//! a half-patched node behind.

use crate::{
    error::Error,
    genesis::{self, GenesisSource},
    network::{DbBackend, Environment},
    node::{Lifecycle, NodeHome},
    peers::{self, NodeKey, PeerSet},
    prelude::*,
    prober::{self, LiveEndpoint},
    reconcile::{Document, Reconciler, StateSyncParams},
    registry::Registry,
    rpc::Transport,
    trust::{self, TrustParams},
};
use std::{
    error::Error as _,
    fmt::{self, Display},
    path::PathBuf,
};
use tendermint::chain;

/// Pipeline progress
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    /// Nothing done yet
    Start,

    /// Environment chosen
    EnvironmentSelected,

    /// Local chain initialization ran
    LocalInit,

    /// A live RPC endpoint was selected
    EndpointResolved,

    /// Trust height/hash resolved
    TrustResolved,

    /// Node home wiped and initialized for the chain
    NodeInitialized,

    /// Persistent peers resolved
    PeersResolved,

    /// Genesis downloaded
    GenesisFetched,

    /// Genesis written and both configuration documents patched
    ConfigPatched,

    /// Node handed off to
    Launched,

    /// A step failed; nothing further runs
    Aborted,
}

impl Stage {
    /// Step which, once it succeeds, moves the pipeline past this stage
    fn next(self, env: Option<Environment>) -> Stage {
        match self {
            Stage::Start => Stage::EnvironmentSelected,
            Stage::EnvironmentSelected if env == Some(Environment::Local) => Stage::LocalInit,
            Stage::EnvironmentSelected => Stage::EndpointResolved,
            Stage::EndpointResolved => Stage::TrustResolved,
            Stage::TrustResolved => Stage::NodeInitialized,
            Stage::NodeInitialized => Stage::PeersResolved,
            Stage::PeersResolved => Stage::GenesisFetched,
            Stage::GenesisFetched => Stage::ConfigPatched,
            Stage::ConfigPatched | Stage::LocalInit => Stage::Launched,
            Stage::Launched | Stage::Aborted => Stage::Aborted,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Start => "start",
            Stage::EnvironmentSelected => "environment selection",
            Stage::LocalInit => "local chain initialization",
            Stage::EndpointResolved => "endpoint resolution",
            Stage::TrustResolved => "trust parameter resolution",
            Stage::NodeInitialized => "node initialization",
            Stage::PeersResolved => "peer discovery",
            Stage::GenesisFetched => "genesis fetch",
            Stage::ConfigPatched => "config patching",
            Stage::Launched => "launch",
            Stage::Aborted => "aborted",
        })
    }
}

/// Everything resolved from the network for a remote environment
#[derive(Clone, Debug)]
pub struct Resolved {
    /// Chain being joined
    pub chain_id: chain::Id,

    /// Selected RPC endpoint
    pub endpoint: LiveEndpoint,

    /// Trusted height/hash pair
    pub trust: TrustParams,

    /// Persistent peers (never including this node)
    pub peers: PeerSet,

    /// Raw genesis document
    pub genesis: Vec<u8>,
}

/// Configuration document written by [`Pipeline::apply`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Patched {
    /// Document path
    pub path: PathBuf,

    /// Keys that were rewritten
    pub rewritten: Vec<&'static str>,
}

/// Sequential bootstrap pipeline
pub struct Pipeline<'a> {
    transport: &'a dyn Transport,
    node: &'a dyn Lifecycle,
    home: NodeHome,
    registry: Registry,
    genesis: GenesisSource,
    env: Option<Environment>,
    stage: Stage,
    patched: Vec<Patched>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline
    pub fn new(
        transport: &'a dyn Transport,
        node: &'a dyn Lifecycle,
        home: NodeHome,
        registry: Registry,
        genesis: GenesisSource,
    ) -> Self {
        Self {
            transport,
            node,
            home,
            registry,
            genesis,
            env: None,
            stage: Stage::Start,
            patched: vec![],
        }
    }

    /// Last stage reached
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Documents patched so far
    pub fn patched(&self) -> &[Patched] {
        &self.patched
    }

    /// Bootstrap a node for `env`, starting it afterwards if `launch` is set
    ///
    /// Errors keep their kind and are prefixed with the step that failed;
    /// the pipeline is left in [`Stage::Aborted`].
    pub fn run(
        &mut self,
        env: Environment,
        db_backend: DbBackend,
        launch: bool,
    ) -> Result<(), Error> {
        self.staged(|pipeline| pipeline.execute(env, db_backend))?;

        if launch {
            self.launch()?;
        }

        Ok(())
    }

    /// Start the configured node. A local chain is already running once
    /// its init script has finished, so this is a no-op there.
    pub fn launch(&mut self) -> Result<(), Error> {
        if self.stage == Stage::Launched {
            return Ok(());
        }

        self.staged(|pipeline| {
            pipeline.node.start()?;
            pipeline.advance(Stage::Launched);
            Ok(())
        })
    }

    fn execute(&mut self, env: Environment, db_backend: DbBackend) -> Result<(), Error> {
        self.env = Some(env);
        self.advance(Stage::EnvironmentSelected);
        info!("setting up a node in {} (db backend: {})", env, db_backend);

        let chain_id = match env.chain_id() {
            Some(chain_id) => chain_id,
            None => {
                self.node.init_local_chain()?;
                self.advance(Stage::LocalInit);
                self.advance(Stage::Launched);
                return Ok(());
            }
        };

        let resolved = self.resolve(chain_id)?;
        self.patched = self.apply(&resolved, db_backend)?;
        Ok(())
    }

    /// Resolve endpoint, trust parameters, peers and genesis for `chain_id`
    ///
    /// The node home is (re)initialized once the endpoint and trust
    /// parameters are known, since peer discovery needs this node's ID.
    pub fn resolve(&mut self, chain_id: chain::Id) -> Result<Resolved, Error> {
        let candidates = self.registry.resolve(self.transport, &chain_id)?;
        let endpoint = prober::select_live(self.transport, &candidates)?;
        self.advance(Stage::EndpointResolved);

        let trust = trust::resolve(self.transport, &endpoint)?;
        info!("trust height {} hash {}", trust.height, trust.hash_hex());
        self.advance(Stage::TrustResolved);

        self.node.initialize(&chain_id)?;
        self.advance(Stage::NodeInitialized);

        let node_key = NodeKey::load_json_file(self.home.node_key())?;
        let peers = peers::resolve(self.transport, &endpoint, &node_key.id)?;
        info!("using {} persistent peer(s)", peers.len());
        self.advance(Stage::PeersResolved);

        let genesis = self.genesis.fetch(self.transport, &chain_id)?;
        self.advance(Stage::GenesisFetched);

        Ok(Resolved {
            chain_id,
            endpoint,
            trust,
            peers,
            genesis,
        })
    }

    /// Write genesis and patch `config.toml` then `app.toml`
    pub fn apply(
        &mut self,
        resolved: &Resolved,
        db_backend: DbBackend,
    ) -> Result<Vec<Patched>, Error> {
        genesis::write(&self.home.genesis(), &resolved.genesis)?;

        let params = StateSyncParams {
            rpc_server: resolved.endpoint.url().to_owned(),
            trust: resolved.trust.clone(),
            peers: resolved.peers.clone(),
            db_backend,
        };

        let mut patched = vec![];

        for (path, reconciler) in [
            (self.home.node_config(), Reconciler::node_config(&params)),
            (self.home.app_config(), Reconciler::app_config(&params)),
        ] {
            let mut document = Document::load(&path)?;
            let rewritten = document.reconcile(&reconciler);
            document.save()?;

            info!("patched {}: {}", path.display(), rewritten.join(", "));
            patched.push(Patched { path, rewritten });
        }

        self.advance(Stage::ConfigPatched);
        Ok(patched)
    }

    /// Run `step`, labelling any error with the stage it failed to reach
    fn staged<T>(
        &mut self,
        step: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        step(self).map_err(|e| {
            let failed = self.stage.next(self.env);
            self.stage = Stage::Aborted;
            warn!("bootstrap aborted during {}", failed);

            // the kind is re-attached below; keep only the cause
            let cause = e.source().map_or_else(|| e.kind().to_string(), |cause| cause.to_string());
            format_err!(*e.kind(), "{} failed: {}", failed, cause).into()
        })
    }

    fn advance(&mut self, stage: Stage) {
        debug!("stage: {} -> {}", self.stage, stage);
        self.stage = stage;
    }
}
