//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Mesh network topology toolkit: gateway tiers, radio meshes and VPN link disambiguation
#[derive(Parser, Debug)]
#[command(name = "meshtk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file merged over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Node-info document (nodes.json), path or URL
    #[arg(long, global = true)]
    pub nodes: Option<String>,

    /// Topology document (graph.json), path or URL
    #[arg(long, global = true)]
    pub graph: Option<String>,

    /// Node id that only connects via VPN (repeatable, adds to config)
    #[arg(long = "vpn-only", global = true, value_name = "NODE_ID")]
    pub vpn_only: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show counts, tier sizes and meshes of the snapshot
    Summary,

    /// Show details of a node
    Node {
        /// Node id
        node_id: String,
    },

    /// List direct neighbours of a node
    Neighbours {
        /// Node id
        node_id: String,
        /// Include VPN neighbours
        #[arg(long)]
        vpn: bool,
    },

    /// List nodes exactly N hops away from the nearest gateway
    Tier {
        /// Tier number (0 = gateways)
        tier: usize,
    },

    /// Show the size of every non-empty tier
    Tiers,

    /// List nodes in the radio mesh of a node
    Mesh {
        /// Node id
        node_id: String,
    },

    /// List all distinct radio meshes
    Meshes {
        /// Only seed meshes from online nodes
        #[arg(long)]
        online: bool,
    },

    /// List non-VPN links that touch a VPN-only node
    FakeMeshes,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create global config template
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
