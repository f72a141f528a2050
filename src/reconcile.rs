//! Configuration reconciler: rewrites the state sync keys of the node's
//! `config.toml` and `app.toml`
//!
//! Documents are treated as lines. Each [`Rule`] targets one key pattern and
//! replaces only the value on matching lines; every other byte (comments,
//! blank lines, line endings, unrelated keys) is carried through untouched.
//! A pattern that doesn't occur leaves the document as-is. Since a rule
//! matches on the key rather than on the value last written, applying the
//! same parameters twice is a no-op and applying new parameters overwrites
//! the old ones.

mod document;
mod rule;

pub use self::{
    document::Document,
    rule::{quoted, Matcher, Rule},
};

use crate::{network::DbBackend, peers::PeerSet, trust::TrustParams};

/// Comment line directly above the telemetry sink's `enabled` key in `app.toml`
pub const TELEMETRY_SINK_COMMENT: &str = "# other sinks such as Prometheus.";

/// Everything the reconciler writes
#[derive(Clone, Debug)]
pub struct StateSyncParams {
    /// Live RPC endpoint (written twice as a primary/witness pair)
    pub rpc_server: String,

    /// Trusted height/hash pair
    pub trust: TrustParams,

    /// Persistent peers
    pub peers: PeerSet,

    /// Database backend choice
    pub db_backend: DbBackend,
}

/// Result of applying a [`Reconciler`] to a document
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Patched {
    /// Updated document text
    pub text: String,

    /// Keys which matched at least one line, in rule order
    pub rewritten: Vec<&'static str>,
}

/// Ordered set of rewrite rules for one document
#[derive(Clone, Debug, Default)]
pub struct Reconciler {
    rules: Vec<Rule>,
}

impl Reconciler {
    /// Create a reconciler from explicit rules
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Rules for `config.toml`
    pub fn node_config(params: &StateSyncParams) -> Self {
        let rpc_servers = format!("{0},{0}", params.rpc_server);

        Self::new(vec![
            Rule::key("rpc-servers", quoted(&rpc_servers)),
            Rule::key("trust-height", params.trust.height.to_string()),
            Rule::key("trust-hash", quoted(params.trust.hash_hex())),
            Rule::key("persistent-peers", quoted(&params.peers.to_string())),
            Rule::key("enable", "true").in_section("statesync"),
            Rule::key("db-sync-enable", "false"),
            Rule::key("use-p2p", "true"),
        ])
    }

    /// Rules for `app.toml`
    ///
    /// `sc-enable` is only touched when SeiDB is selected; otherwise the
    /// existing value is preserved.
    pub fn app_config(params: &StateSyncParams) -> Self {
        let mut rules = vec![];

        if params.db_backend.enables_state_commit() {
            rules.push(Rule::key("sc-enable", "true"));
        }

        rules.push(Rule::after_comment(
            TELEMETRY_SINK_COMMENT,
            "enabled",
            "false",
        ));

        Self::new(rules)
    }

    /// Borrow the rules
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Apply the rules to `text`
    pub fn apply(&self, text: &str) -> Patched {
        let mut output = String::with_capacity(text.len());
        let mut rewritten = vec![];
        let mut section = None;
        let mut previous = None;

        for raw_line in text.split_inclusive('\n') {
            let (line, ending) = split_line_ending(raw_line);

            if let Some(name) = rule::section_of(line) {
                section = Some(name);
            }

            match self
                .rules
                .iter()
                .find(|rule| rule.matches(line, section, previous))
            {
                Some(rule) => {
                    output.push_str(&rule.rewrite(line));

                    if !rewritten.contains(&rule.key_name()) {
                        rewritten.push(rule.key_name());
                    }
                }
                None => output.push_str(line),
            }

            output.push_str(ending);
            previous = Some(line);
        }

        Patched { text: output, rewritten }
    }
}

/// Split a line into its content and its `\n` / `\r\n` terminator
fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(content) = line.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = line.strip_suffix('\n') {
        (content, "\n")
    } else {
        (line, "")
    }
}
