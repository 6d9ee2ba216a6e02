//! Tests for argument parsing and command dispatch

use clap::Parser;
use rstest::rstest;

use meshtk::cli::args::{Cli, Commands};
use meshtk::cli::commands::execute_command;
use meshtk::exitcode;

fn fixture(name: &str) -> String {
    format!("{}/tests/resources/snapshot/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn parse(args: &[&str]) -> Cli {
    let nodes = fixture("nodes.json");
    let graph = fixture("graph.json");
    let mut argv = vec!["meshtk", "--nodes", nodes.as_str(), "--graph", graph.as_str()];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("parse args")
}

#[test]
fn given_global_flags_after_subcommand_when_parsing_then_accepted() {
    let cli = Cli::try_parse_from([
        "meshtk",
        "neighbours",
        "a0f3c112e932",
        "--vpn",
        "--vpn-only",
        "02caffee0001",
        "--vpn-only",
        "c04a00dd692a",
        "-dd",
    ])
    .unwrap();

    assert_eq!(cli.debug, 2);
    assert_eq!(cli.vpn_only, vec!["02caffee0001", "c04a00dd692a"]);
    assert!(matches!(
        cli.command,
        Some(Commands::Neighbours { ref node_id, vpn: true }) if node_id == "a0f3c112e932"
    ));
}

#[test]
fn given_negative_tier_when_parsing_then_rejected() {
    assert!(Cli::try_parse_from(["meshtk", "tier", "-1"]).is_err());
}

#[rstest]
#[case::summary(&["summary"])]
#[case::node(&["node", "a0f3c112e932"])]
#[case::neighbours(&["neighbours", "9e9203c5c897", "--vpn"])]
#[case::tier(&["tier", "2"])]
#[case::tiers(&["tiers"])]
#[case::mesh(&["mesh", "6466b3b0256e"])]
#[case::meshes(&["meshes", "--online"])]
#[case::fake_meshes(&["--vpn-only", "02caffee0001", "fake-meshes"])]
fn given_fixture_snapshot_when_running_query_then_succeeds(#[case] args: &[&str]) {
    let cli = parse(args);

    let result = execute_command(&cli);

    assert!(result.is_ok(), "{args:?}: {result:?}");
}

#[test]
fn given_unknown_node_when_running_query_then_data_error() {
    let cli = parse(&["node", "ffffffffffff"]);

    let err = execute_command(&cli).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_missing_document_when_running_query_then_no_input() {
    let cli = Cli::try_parse_from([
        "meshtk",
        "--nodes",
        "/nonexistent/nodes.json",
        "--graph",
        "/nonexistent/graph.json",
        "tiers",
    ])
    .unwrap();

    let err = execute_command(&cli).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_no_command_when_executing_then_usage_error() {
    let cli = Cli::try_parse_from(["meshtk"]).unwrap();

    let err = execute_command(&cli).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
}
