//! Integration tests for the `sylva` binary entry point.
//!
//! Verifies help output and user-facing failures when arguments are missing
//! or no daemon is reachable.

use std::net::TcpListener;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;

#[test]
fn help_lists_the_commands() {
    let mut command = cargo_bin_cmd!("sylva");
    command.arg("--help");
    command
        .assert()
        .success()
        .stdout(contains("dependencies").and(contains("--port")));
}

#[test]
fn missing_text_exits_with_failure() {
    let mut command = cargo_bin_cmd!("sylva");
    command.arg("parse");
    command
        .assert()
        .failure()
        .stderr(contains("parse requires text to analyse"));
}

#[test]
fn unreachable_daemon_exits_with_failure() {
    let port = {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind throwaway listener");
        listener.local_addr().expect("throwaway listener address").port()
    };
    let mut command = cargo_bin_cmd!("sylva");
    command.args(["--port", &port.to_string(), "tokenize", "Dogs"]);
    command
        .assert()
        .failure()
        .stderr(contains("failed to connect to daemon"));
}
