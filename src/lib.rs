//! meshtk: analysis of mesh network topology snapshots
//!
//! Reads a `nodes.json`/`graph.json` snapshot and answers structural queries:
//! hop distance tiers from gateways, radio meshes, and non-VPN links that
//! must actually be VPN tunnels.
//!
//! Layers:
//! - `domain`: entities, graph and algorithms (no I/O)
//! - `application`: snapshot parsing and loading service
//! - `infrastructure`: I/O boundary traits and DI container
//! - `cli`: argument parsing, command dispatch and output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
