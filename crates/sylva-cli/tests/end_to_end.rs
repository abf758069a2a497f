//! Runs the `sylva` binary against an in-process daemon.

use std::sync::Arc;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;
use rstest::{fixture, rstest};
use sylva_config::Config;
use sylvad::{
    HealthReporter, RuleEngineProvider, RunningServer, StaticConfigLoader,
    StructuredHealthReporter, bootstrap_with,
};

const SENTENCE: [&str; 5] = ["The", "dog", "chased", "the", "cat."];
const SENTENCE_TREE: &str =
    "(ROOT (S (NP (DT The) (NN dog)) (VP (VBD chased) (NP (DT the) (NN cat))) (. .)))\n";

#[fixture]
fn daemon() -> RunningServer {
    let config = Config {
        host: "127.0.0.1".to_owned(),
        port: 0,
        log_filter: "warn".to_owned(),
        ..Config::default()
    };
    let reporter: Arc<dyn HealthReporter> = Arc::new(StructuredHealthReporter::new());
    let server = bootstrap_with(&StaticConfigLoader::new(config), reporter, &RuleEngineProvider)
        .expect("bootstrap daemon");
    server.start().expect("start daemon")
}

fn port_arg(daemon: &RunningServer) -> String {
    daemon.local_addr().port().to_string()
}

#[rstest]
#[case("parse")]
#[case("tree")]
fn parse_and_tree_print_the_same_bracketed_text(daemon: RunningServer, #[case] subcommand: &str) {
    let mut command = cargo_bin_cmd!("sylva");
    command
        .args(["--port", &port_arg(&daemon), subcommand])
        .args(SENTENCE);
    command.assert().success().stdout(SENTENCE_TREE);
    daemon.shutdown();
    daemon.wait().expect("daemon stops");
}

#[rstest]
fn collapsed_dependencies_are_listed(daemon: RunningServer) {
    let mut command = cargo_bin_cmd!("sylva");
    command
        .args(["--port", &port_arg(&daemon), "dependencies"])
        .args(SENTENCE);
    command
        .assert()
        .success()
        .stdout(contains("nsubj(chased-3, dog-2)\n").and(contains("dobj(chased-3, cat-5)\n")));
    daemon.shutdown();
    daemon.wait().expect("daemon stops");
}

#[rstest]
fn unsupported_modes_are_reported_on_stderr(daemon: RunningServer) {
    let mut command = cargo_bin_cmd!("sylva");
    command.args([
        "--port",
        &port_arg(&daemon),
        "dependencies",
        "--mode",
        "BASIC",
        "Dogs",
    ]);
    command
        .assert()
        .failure()
        .stderr(contains("ERR unsupported-mode"));
    daemon.shutdown();
    daemon.wait().expect("daemon stops");
}

#[rstest]
fn quit_stops_the_daemon(daemon: RunningServer) {
    let mut command = cargo_bin_cmd!("sylva");
    command.args(["--port", &port_arg(&daemon), "quit"]);
    command.assert().success().stdout("");
    daemon.wait().expect("daemon stops after quit");
}
