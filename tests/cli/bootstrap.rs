//! Integration tests for the `bootstrap` subcommand

use crate::cli;
use std::{
    ffi::OsStr,
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    process::Output,
};

/// Write a `sei-bootstrap.toml` pointing the node at scratch paths
fn write_config(dir: &Path, registry_url: &str, script: &Path) -> PathBuf {
    let config_path = dir.join("sei-bootstrap.toml");
    let config = format!(
        "[registry]\nurl = {:?}\n\n[rpc]\nprobe_timeout_secs = 1\nrequest_timeout_secs = 1\n\n\
         [node]\nhome = {:?}\nbinary = {:?}\nlocal_init_script = {:?}\n",
        registry_url,
        dir.join(".sei").display().to_string(),
        dir.join("no-such-seid").display().to_string(),
        script.display().to_string(),
    );

    fs::write(&config_path, config).unwrap();
    config_path
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

#[test]
fn local_runs_init_script() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("local-chain-started");
    let script = dir.path().join("initialize_local_chain.sh");
    fs::write(&script, format!("#!/bin/sh\ntouch '{}'\n", marker.display())).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o644)).unwrap();

    let config = write_config(dir.path(), "http://127.0.0.1:1/chains.json", &script);
    cli::run_successfully([
        OsStr::new("bootstrap"),
        OsStr::new("-c"),
        config.as_os_str(),
        OsStr::new("--env"),
        OsStr::new("local"),
    ]);

    assert!(marker.exists());
    let mode = fs::metadata(&script).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[test]
fn unreachable_registry_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("unused.sh");
    let config = write_config(dir.path(), "http://127.0.0.1:1/chains.json", &script);

    let output = cli::run([
        OsStr::new("bootstrap"),
        OsStr::new("-c"),
        config.as_os_str(),
        OsStr::new("--env"),
        OsStr::new("testnet"),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("endpoint resolution"), "{text}");
    assert!(!dir.path().join(".sei").exists());
}

#[test]
fn unknown_environment_is_a_usage_error() {
    let output = cli::run(["bootstrap", "--env", "mainnet"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn missing_menu_answer_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("unused.sh");
    let config = write_config(dir.path(), "http://127.0.0.1:1/chains.json", &script);

    // stdin is closed, so the environment menu sees end of input
    let output = cli::run([OsStr::new("bootstrap"), OsStr::new("-c"), config.as_os_str()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Please choose an environment"));
}

#[test]
fn invalid_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("sei-bootstrap.toml");
    fs::write(&config, "[node]\nhomedir = \"/tmp\"\n").unwrap();

    let output = cli::run([
        OsStr::new("bootstrap"),
        OsStr::new("-c"),
        config.as_os_str(),
        OsStr::new("--env"),
        OsStr::new("local"),
    ]);

    assert!(!output.status.success());
}
