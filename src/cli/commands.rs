//! Command dispatch: loads settings and the snapshot, runs the query, prints results

use std::collections::BTreeSet;
use std::io;

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, merge_array, Settings};
use crate::domain::{Mesh, Network};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config { command }) => cmd_config(command, &load_settings(cli)?),
        Some(command) => {
            let settings = load_settings(cli)?;
            let mut network = load_network(&settings)?;
            run_query(command, &mut network)
        }
        None => Err(CliError::Usage(
            "no command given, see 'meshtk --help'".to_string(),
        )),
    }
}

/// Layered settings with command line flags applied last.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(nodes) = &cli.nodes {
        settings.nodes_source = Some(nodes.clone());
    }
    if let Some(graph) = &cli.graph {
        settings.graph_source = Some(graph.clone());
    }
    if !cli.vpn_only.is_empty() {
        settings.vpn_only_nodes = merge_array(&settings.vpn_only_nodes, &cli.vpn_only);
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

#[instrument(level = "debug", skip(settings))]
fn load_network(settings: &Settings) -> CliResult<Network> {
    let nodes = settings.nodes_source.as_deref().ok_or_else(|| {
        CliError::InvalidArgs("no node-info document, use --nodes or nodes_source".to_string())
    })?;
    let graph = settings.graph_source.as_deref().ok_or_else(|| {
        CliError::InvalidArgs("no topology document, use --graph or graph_source".to_string())
    })?;

    let container = ServiceContainer::new(settings.clone());
    let network = container
        .snapshot_service()
        .load(nodes, graph, settings.network_config())?;
    Ok(network)
}

fn run_query(command: &Commands, network: &mut Network) -> CliResult<()> {
    match command {
        Commands::Summary => cmd_summary(network),
        Commands::Node { node_id } => cmd_node(network, node_id),
        Commands::Neighbours { node_id, vpn } => {
            for id in network.get_neighbours(node_id, *vpn)? {
                output::info(&id);
            }
            Ok(())
        }
        Commands::Tier { tier } => {
            for id in network.get_nodes_in_tier(*tier)? {
                output::info(&id);
            }
            Ok(())
        }
        Commands::Tiers => {
            for (tier, nodes) in network.tiers()?.iter().enumerate() {
                output::field(&format!("tier {tier}"), &nodes.len());
            }
            Ok(())
        }
        Commands::Mesh { node_id } => {
            for id in network.get_mesh_of_node(node_id)? {
                output::info(&id);
            }
            Ok(())
        }
        Commands::Meshes { online } => {
            let meshes = if *online {
                network.get_online_meshes()?
            } else {
                network.get_meshes()?
            };
            for mesh in sorted_by_size(&meshes) {
                output::info(&format!("{}: {}", mesh.len(), mesh.iter().join(" ")));
            }
            Ok(())
        }
        Commands::FakeMeshes => {
            for fake in network.get_fake_mesh_connections()? {
                output::info(&fake);
            }
            Ok(())
        }
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn sorted_by_size(meshes: &BTreeSet<Mesh>) -> Vec<&Mesh> {
    meshes
        .iter()
        .sorted_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)))
        .collect()
}

fn cmd_summary(network: &mut Network) -> CliResult<()> {
    let online = network.nodes().filter(|n| n.is_online).count();
    let gateways = network.nodes().filter(|n| n.is_gateway).count();

    output::header("Snapshot");
    output::field("nodes", &network.node_count());
    output::field("online", &online);
    output::field("gateways", &gateways);
    output::field("links", &network.link_count());

    output::header("Tiers");
    let tiers = network.tiers()?;
    for (tier, nodes) in tiers.iter().enumerate() {
        output::detail(&format!("{tier}: {}", nodes.len()));
    }
    let tiered: usize = tiers.iter().map(|t| t.len()).sum();
    if tiered < network.node_count() {
        output::warning(&format!(
            "{} nodes are not reachable from any gateway",
            network.node_count() - tiered
        ));
    }

    output::header("Meshes");
    output::field("all", &network.get_meshes()?.len());
    output::field("online", &network.get_online_meshes()?.len());
    output::field("fake mesh links", &network.get_fake_mesh_connections()?.len());
    Ok(())
}

fn cmd_node(network: &mut Network, node_id: &str) -> CliResult<()> {
    let tier = network
        .tiers()?
        .iter()
        .position(|nodes| nodes.contains(node_id));
    let mesh = network.get_neighbours(node_id, false)?;
    let all = network.get_neighbours(node_id, true)?;
    let node = network.get_node(node_id)?;

    output::header(&node.node_id);
    output::field("hostname", &node.hostname.as_deref().unwrap_or("-"));
    output::field("gateway", &node.is_gateway);
    output::field("online", &node.is_online);
    output::field(
        "clients",
        &node.client_count.map_or("-".to_string(), |c| c.to_string()),
    );
    match &node.version {
        Some(v) => output::field(
            "firmware",
            &format!(
                "{v} (major {}, minor {}, build '{}', built {})",
                v.major(),
                v.minor(),
                v.build(),
                v.builddate()
            ),
        ),
        None => output::field("firmware", &"-"),
    }
    output::field(
        "location",
        &node
            .location
            .map_or("-".to_string(), |l| format!("{}, {}", l.latitude, l.longitude)),
    );
    output::field("ipv6", &node.ipv6.map_or("-".to_string(), |ip| ip.to_string()));
    output::field(
        "tier",
        &tier.map_or("unreachable".to_string(), |t| t.to_string()),
    );
    output::field("mesh neighbours", &mesh.iter().join(" "));
    output::field("vpn neighbours", &all.difference(&mesh).join(" "));
    Ok(())
}

fn cmd_config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "" } else { " (not found)" };
                    output::field("global", &format!("{}{state}", path.display()));
                }
                None => output::field("global", &"- (no home directory)"),
            }
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine config directory".to_string())
            })?;
            let fs = RealFileSystem;
            if fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }
            fs.ensure_parent(&path)
                .and_then(|()| fs.write(&path, &Settings::template()))
                .map_err(|e| InfraError::write(&path, e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}
