//! Tests for the bootstrapper command-line interface

use std::{
    ffi::OsStr,
    io::{self, Write},
    process::{Command, Output, Stdio},
};

use super::BOOTSTRAP_EXE_PATH;

mod bootstrap;
mod version;

/// Run the `sei-bootstrap` CLI command with the given arguments
pub fn run<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(BOOTSTRAP_EXE_PATH)
        .args(args)
        .env_remove("SEI_BOOTSTRAP_CONFIG")
        .stdin(Stdio::null())
        .output()
        .unwrap()
}

/// Run the `sei-bootstrap` CLI command with the expectation that it will exit
/// successfully, panicking and printing stdout/stderr if it does not
#[allow(dead_code)]
pub fn run_successfully<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = run(args);
    let status_code = output.status.code().unwrap();

    if status_code == 0 {
        output
    } else {
        io::stdout().write_all(&output.stdout).unwrap();
        io::stderr().write_all(&output.stderr).unwrap();

        panic!("{BOOTSTRAP_EXE_PATH} exited with error status: {status_code}");
    }
}

#[test]
fn test_usage() {
    let status_code = run(&[] as &[&OsStr]).status.code().unwrap();
    assert_eq!(status_code, 2);
}
