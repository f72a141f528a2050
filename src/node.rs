//! Local Sei node: home directory layout and the `seid` binary

use crate::{
    config::NodeConfig,
    error::{Error, ErrorKind::*},
    prelude::*,
};
use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};
use tendermint::chain;

/// Permissions set on the local chain initialization script before running it
pub const SCRIPT_PERMISSIONS: u32 = 0o755;

/// Node home directory (e.g. `~/.sei`)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeHome(PathBuf);

impl NodeHome {
    /// Create a home rooted at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        NodeHome(path.into())
    }

    /// Root of the home directory
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// `config/`
    pub fn config_dir(&self) -> PathBuf {
        self.0.join("config")
    }

    /// `config/config.toml`
    pub fn node_config(&self) -> PathBuf {
        self.config_dir().join("config.toml")
    }

    /// `config/app.toml`
    pub fn app_config(&self) -> PathBuf {
        self.config_dir().join("app.toml")
    }

    /// `config/genesis.json`
    pub fn genesis(&self) -> PathBuf {
        self.config_dir().join("genesis.json")
    }

    /// `config/node_key.json`
    pub fn node_key(&self) -> PathBuf {
        self.config_dir().join("node_key.json")
    }
}

/// Node lifecycle operations the bootstrap pipeline depends on
pub trait Lifecycle {
    /// Wipe the node home and initialize it for `chain_id`, creating the
    /// default configuration documents and the node key
    fn initialize(&self, chain_id: &chain::Id) -> Result<(), Error>;

    /// Bring up a local single-node chain
    fn init_local_chain(&self) -> Result<(), Error>;

    /// Start the node, returning once it exits
    fn start(&self) -> Result<(), Error>;
}

/// The `seid` binary operating on a particular home directory
#[derive(Clone, Debug)]
pub struct NodeBinary {
    binary: PathBuf,
    home: NodeHome,
    moniker: String,
    local_init_script: PathBuf,
}

impl NodeBinary {
    /// Create a node binary handle
    pub fn new(binary: impl Into<PathBuf>, home: NodeHome, moniker: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            home,
            moniker: moniker.into(),
            local_init_script: NodeConfig::default().local_init_script,
        }
    }

    /// Create a node binary handle from the `[node]` config section
    pub fn from_config(config: &NodeConfig, home: NodeHome) -> Self {
        Self::new(&config.binary, home, &config.moniker)
            .with_local_init_script(&config.local_init_script)
    }

    /// Use a different script for local chain initialization
    pub fn with_local_init_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.local_init_script = script.into();
        self
    }

    /// Home directory this binary operates on
    pub fn home(&self) -> &NodeHome {
        &self.home
    }

    /// Remove the node home directory and everything in it
    pub fn reset_home(&self) -> Result<(), Error> {
        let path = self.home.path();

        if path.exists() {
            warn!("removing {}", path.display());
            fs::remove_dir_all(path).map_err(|e| {
                format_err!(IoError, "couldn't remove {}: {}", path.display(), e)
            })?;
        }

        Ok(())
    }

    /// `seid init --chain-id <chain_id> <moniker>`
    pub fn init(&self, chain_id: &chain::Id) -> Result<(), Error> {
        let mut command = self.command();
        command
            .args(["init", "--chain-id", chain_id.as_str()])
            .arg(&self.moniker)
            .arg("--home")
            .arg(self.home.path());

        let output = run(&mut command)?;
        debug!(
            "{} init: {}",
            self.binary.display(),
            String::from_utf8_lossy(&output.stdout).trim()
        );

        Ok(())
    }

    /// `seid start`, inheriting this process's stdio
    pub fn start(&self) -> Result<(), Error> {
        let mut command = self.command();
        command.arg("start").arg("--home").arg(self.home.path());

        info!("starting {}", self.binary.display());
        wait(&mut command)
    }

    /// Make the local chain initialization script executable and run it
    pub fn run_local_init(&self) -> Result<(), Error> {
        let script = &self.local_init_script;

        fs::set_permissions(script, fs::Permissions::from_mode(SCRIPT_PERMISSIONS)).map_err(
            |e| {
                format_err!(
                    CommandFailed,
                    "couldn't make {} executable: {}",
                    script.display(),
                    e
                )
            },
        )?;

        info!("running {}", script.display());
        wait(&mut Command::new(script))
    }

    fn command(&self) -> Command {
        Command::new(&self.binary)
    }
}

impl Lifecycle for NodeBinary {
    fn initialize(&self, chain_id: &chain::Id) -> Result<(), Error> {
        self.reset_home()?;
        self.init(chain_id)
    }

    fn init_local_chain(&self) -> Result<(), Error> {
        self.run_local_init()
    }

    fn start(&self) -> Result<(), Error> {
        NodeBinary::start(self)
    }
}

/// Run `command` to completion, capturing its output
fn run(command: &mut Command) -> Result<Output, Error> {
    let program = program_name(command);
    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|e| format_err!(CommandFailed, "couldn't execute {}: {}", program, e))?;

    if output.status.success() {
        return Ok(output);
    }

    fail!(
        CommandFailed,
        "{} exited with {}: {}",
        program,
        exit_code(output.status.code()),
        String::from_utf8_lossy(&output.stderr).trim()
    );
}

/// Run `command` with inherited stdio and wait for it to exit
fn wait(command: &mut Command) -> Result<(), Error> {
    let program = program_name(command);
    let status = command
        .status()
        .map_err(|e| format_err!(CommandFailed, "couldn't execute {}: {}", program, e))?;

    if !status.success() {
        fail!(
            CommandFailed,
            "{} exited with {}",
            program,
            exit_code(status.code())
        );
    }

    Ok(())
}

fn program_name(command: &Command) -> String {
    Path::new(command.get_program()).display().to_string()
}

fn exit_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Write an executable shell script into `dir`
    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\n{body}").unwrap();
        drop(file);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn home_layout() {
        let home = NodeHome::new("/home/sei/.sei");
        assert_eq!(home.node_config(), Path::new("/home/sei/.sei/config/config.toml"));
        assert_eq!(home.app_config(), Path::new("/home/sei/.sei/config/app.toml"));
        assert_eq!(home.genesis(), Path::new("/home/sei/.sei/config/genesis.json"));
        assert_eq!(home.node_key(), Path::new("/home/sei/.sei/config/node_key.json"));
    }

    #[test]
    fn initialize_resets_home_and_runs_init() {
        let dir = tempfile::tempdir().unwrap();
        let home = NodeHome::new(dir.path().join("home"));
        fs::create_dir_all(home.config_dir()).unwrap();
        fs::write(home.genesis(), "stale").unwrap();

        // stub which records its arguments in the home directory
        let seid = script(
            dir.path(),
            "seid",
            "home=\"$6\"\nmkdir -p \"$home/config\"\necho \"$@\" > \"$home/args\"",
        );

        let node = NodeBinary::new(seid, home.clone(), "demo");
        node.initialize(&"atlantic-2".parse().unwrap()).unwrap();

        assert!(!home.genesis().exists());
        let args = fs::read_to_string(home.path().join("args")).unwrap();
        assert_eq!(
            args.trim(),
            format!("init --chain-id atlantic-2 demo --home {}", home.path().display())
        );
    }

    #[test]
    fn failed_command_reports_status_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let seid = script(dir.path(), "seid", "echo 'bad flag' >&2\nexit 3");

        let node = NodeBinary::new(seid, NodeHome::new(dir.path().join("home")), "demo");
        let err = node.init(&"arctic-1".parse().unwrap()).unwrap_err();

        assert_eq!(*err.kind(), CommandFailed);
        let message = err.to_string();
        assert!(message.contains("status 3"), "{message}");
        assert!(message.contains("bad flag"), "{message}");
    }

    #[test]
    fn exit_status_one_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let seid = script(dir.path(), "seid", "exit 1");

        let node = NodeBinary::new(seid, NodeHome::new(dir.path().join("home")), "demo");
        assert_eq!(*node.start().unwrap_err().kind(), CommandFailed);
    }

    #[test]
    fn missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let node = NodeBinary::new(
            dir.path().join("no-such-seid"),
            NodeHome::new(dir.path().join("home")),
            "demo",
        );

        assert_eq!(*node.start().unwrap_err().kind(), CommandFailed);
    }

    #[test]
    fn local_init_script_is_made_executable() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let script_path = dir.path().join("initialize_local_chain.sh");
        fs::write(
            &script_path,
            format!("#!/bin/sh\ntouch '{}'\n", marker.display()),
        )
        .unwrap();
        fs::set_permissions(&script_path, fs::Permissions::from_mode(0o644)).unwrap();

        let node = NodeBinary::new("seid", NodeHome::new(dir.path().join("home")), "demo")
            .with_local_init_script(&script_path);
        node.init_local_chain().unwrap();

        assert!(marker.exists());
        let mode = fs::metadata(&script_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, SCRIPT_PERMISSIONS);
    }
}
