//! Snapshot documents: `nodes.json` (node info) and `graph.json` (batman-adv topology)
//!
//! Turns the two documents into [`Node`] and [`Link`] values and a populated [`Network`].

use std::net::Ipv6Addr;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Link, Location, Network, NetworkConfig, Node, Version};

const NODES_DOCUMENT: &str = "nodes";
const GRAPH_DOCUMENT: &str = "graph";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNode {
    node_id: Option<String>,
    nodeinfo: Option<RawNodeInfo>,
    flags: Option<RawFlags>,
    statistics: Option<RawStatistics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNodeInfo {
    node_id: Option<String>,
    hostname: Option<String>,
    software: Option<RawSoftware>,
    network: Option<RawNetwork>,
    location: Option<RawLocation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSoftware {
    firmware: Option<RawFirmware>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFirmware {
    release: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNetwork {
    addresses: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLocation {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFlags {
    gateway: Option<bool>,
    online: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStatistics {
    clients: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawTopology {
    nodes: Vec<RawTopologyNode>,
    links: Vec<RawLink>,
}

#[derive(Debug, Deserialize)]
struct RawTopologyNode {
    node_id: String,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    source: usize,
    target: usize,
    vpn: bool,
    tq: f64,
    #[serde(default)]
    bidirect: bool,
}

impl RawNode {
    fn into_node(self, index: usize) -> ApplicationResult<Node> {
        let missing = |field| ApplicationError::MissingField { index, field };

        let info = self.nodeinfo.unwrap_or_default();
        let node_id = info
            .node_id
            .or(self.node_id)
            .ok_or_else(|| missing("node_id"))?;
        let flags = self.flags.unwrap_or_default();
        let is_gateway = flags.gateway.ok_or_else(|| missing("flags.gateway"))?;
        let is_online = flags.online.ok_or_else(|| missing("flags.online"))?;

        let version = info
            .software
            .and_then(|s| s.firmware)
            .and_then(|f| f.release)
            .and_then(|release| match Version::parse(&release) {
                Ok(version) => Some(version),
                Err(e) => {
                    debug!(%node_id, "ignoring firmware release: {e}");
                    None
                }
            });

        let location = info.location.and_then(|l| match (l.latitude, l.longitude) {
            (Some(latitude), Some(longitude)) => Some(Location {
                latitude,
                longitude,
            }),
            _ => None,
        });

        let ipv6 = info
            .network
            .and_then(|n| n.addresses)
            .and_then(|addresses| addresses.into_iter().next())
            .and_then(|address| match address.parse::<Ipv6Addr>() {
                Ok(ip) => Some(ip),
                Err(e) => {
                    debug!(%node_id, %address, "ignoring address: {e}");
                    None
                }
            });

        let client_count = self.statistics.and_then(|s| s.clients);

        Ok(Node::new(node_id, is_gateway, is_online)
            .with_version(version)
            .with_client_count(client_count)
            .with_hostname(info.hostname)
            .with_location(location)
            .with_ipv6(ipv6))
    }
}

fn parse_json(document: &'static str, content: &str) -> ApplicationResult<Value> {
    serde_json::from_str(content).map_err(|e| ApplicationError::InvalidDocument {
        document,
        message: e.to_string(),
    })
}

/// Parse the node-info document.
///
/// Accepts a bare array of node records as well as `{"nodes": [...]}`.
pub fn parse_nodes(content: &str) -> ApplicationResult<Vec<Node>> {
    let value = parse_json(NODES_DOCUMENT, content)?;
    let records = match value {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("nodes") {
            Some(Value::Array(records)) => records,
            _ => {
                return Err(ApplicationError::InvalidDocument {
                    document: NODES_DOCUMENT,
                    message: "expected a 'nodes' array".to_string(),
                })
            }
        },
        _ => {
            return Err(ApplicationError::InvalidDocument {
                document: NODES_DOCUMENT,
                message: "expected an array or object".to_string(),
            })
        }
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let raw: RawNode =
                serde_json::from_value(record).map_err(|e| ApplicationError::InvalidDocument {
                    document: NODES_DOCUMENT,
                    message: format!("node record #{index}: {e}"),
                })?;
            raw.into_node(index)
        })
        .collect()
}

/// Parse the topology document into links between node ids.
///
/// Accepts `{"nodes": [...], "links": [...]}`, optionally wrapped in `{"batadv": ...}`.
/// Link endpoints are positions in the topology's own node list.
pub fn parse_links(content: &str) -> ApplicationResult<Vec<Link>> {
    let mut value = parse_json(GRAPH_DOCUMENT, content)?;
    if let Some(inner) = value.get_mut("batadv") {
        value = inner.take();
    }
    let topology: RawTopology =
        serde_json::from_value(value).map_err(|e| ApplicationError::InvalidDocument {
            document: GRAPH_DOCUMENT,
            message: e.to_string(),
        })?;

    let node_ids: Vec<String> = topology.nodes.into_iter().map(|n| n.node_id).collect();
    let resolve = |link: usize, index: usize| {
        node_ids
            .get(index)
            .cloned()
            .ok_or(ApplicationError::DanglingLinkIndex {
                link,
                index,
                node_count: node_ids.len(),
            })
    };

    topology
        .links
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            if raw.tq <= 0.0 {
                warn!(link = i, tq = raw.tq, "non-positive transmission quality");
            }
            Ok(Link::new(
                resolve(i, raw.source)?,
                resolve(i, raw.target)?,
                raw.vpn,
                raw.tq,
                raw.bidirect,
            ))
        })
        .collect()
}

/// Build a network from the contents of both documents.
#[instrument(level = "debug", skip_all)]
pub fn build_network(
    nodes_content: &str,
    graph_content: &str,
    config: NetworkConfig,
) -> ApplicationResult<Network> {
    let nodes = parse_nodes(nodes_content)?;
    let links = parse_links(graph_content)?;
    debug!(nodes = nodes.len(), links = links.len(), "parsed snapshot");

    let mut network = Network::new(config);
    for node in nodes {
        network.add_node(node);
    }
    for link in links {
        network.add_link(link);
    }
    Ok(network)
}
