//! The topology graph: node/link ownership, gateway tiers and radio meshes.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::{debug, instrument, trace};

use crate::domain::entities::{link_key, FakeMeshConnection, Link, Neighbours, Node};
use crate::domain::error::{DomainError, DomainResult};

/// A connected group of nodes, ordered by node id.
pub type Mesh = BTreeSet<String>;

/// Graph-wide settings fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Nodes that can only be reached over VPN (e.g. supernodes).
    /// Non-VPN links touching one of them are reclassified as VPN.
    pub vpn_only_nodes: BTreeSet<String>,
}

impl NetworkConfig {
    pub fn with_vpn_only_nodes<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vpn_only_nodes: nodes.into_iter().map(Into::into).collect(),
        }
    }
}

/// One snapshot of the mesh network.
///
/// Built once via [`Network::add_node`] / [`Network::add_link`], then queried.
/// Neighbour classifications and tiers are memoized on first use and never
/// invalidated, so links must not be added after the first query.
#[derive(Debug, Default)]
pub struct Network {
    config: NetworkConfig,
    nodes: BTreeMap<String, Node>,
    links: BTreeMap<String, Link>,
    tiers: BTreeMap<usize, BTreeSet<String>>,
    tiered_nodes: BTreeSet<String>,
}

impl Network {
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Insert a node; gateways are placed into tier 0.
    pub fn add_node(&mut self, node: Node) {
        trace!(node_id = %node.node_id, gateway = node.is_gateway, "add_node");
        if node.is_gateway {
            self.add_node_to_tier(&node.node_id, 0);
        }
        self.nodes.insert(node.node_id.clone(), node);
    }

    /// Insert a link, replacing any earlier link between the same pair.
    pub fn add_link(&mut self, link: Link) {
        let key = link.key();
        trace!(%key, vpn = link.vpn, "add_link");
        if self.links.insert(key.clone(), link).is_some() {
            debug!(%key, "replaced existing link");
        }
    }

    pub fn get_node(&self, node_id: &str) -> DomainResult<&Node> {
        self.nodes
            .get(node_id)
            .ok_or_else(|| DomainError::UnknownNode(node_id.to_string()))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Links keyed by their canonical pair key.
    pub fn links(&self) -> &BTreeMap<String, Link> {
        &self.links
    }

    pub fn get_link(&self, a: &str, b: &str) -> Option<&Link> {
        self.links.get(&link_key(a, b))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Place a node into a tier unless it already belongs to one.
    pub fn add_node_to_tier(&mut self, node_id: &str, tier: usize) {
        if !self.tiered_nodes.insert(node_id.to_string()) {
            return;
        }
        self.tiers
            .entry(tier)
            .or_default()
            .insert(node_id.to_string());
    }

    /// Direct neighbours of a node; VPN neighbours only if `include_vpn`.
    pub fn get_neighbours(&self, node_id: &str, include_vpn: bool) -> DomainResult<BTreeSet<String>> {
        Ok(self.classify(node_id)?.select(include_vpn))
    }

    /// Like [`Network::get_neighbours`], also returning the fake mesh
    /// connections found on this node's links.
    pub fn get_neighbours_with_fake_meshes(
        &self,
        node_id: &str,
        include_vpn: bool,
    ) -> DomainResult<(BTreeSet<String>, BTreeSet<FakeMeshConnection>)> {
        let neighbours = self.classify(node_id)?;
        Ok((neighbours.select(include_vpn), neighbours.fake_mesh.clone()))
    }

    /// Classify the links of a node, at most once per node.
    fn classify(&self, node_id: &str) -> DomainResult<&Neighbours> {
        let node = self.get_node(node_id)?;
        Ok(node.neighbours.get_or_init(|| self.scan_links(node_id)))
    }

    fn scan_links(&self, node_id: &str) -> Neighbours {
        let mut neighbours = Neighbours::default();
        for link in self.links.values() {
            let Some(other) = link.other_endpoint(node_id) else {
                continue;
            };
            if link.vpn {
                neighbours.vpn.insert(other.to_string());
            } else if self.is_vpn_only(node_id) || self.is_vpn_only(other) {
                debug!(node_id, other, "non-VPN link to VPN-only node, treating as VPN");
                neighbours
                    .fake_mesh
                    .insert(FakeMeshConnection::new(node_id, other));
                neighbours.vpn.insert(other.to_string());
            } else {
                neighbours.mesh.insert(other.to_string());
            }
        }
        let vpn = &neighbours.vpn;
        neighbours.mesh.retain(|id| !vpn.contains(id));
        trace!(
            node_id,
            mesh = neighbours.mesh.len(),
            vpn = neighbours.vpn.len(),
            "classified neighbours"
        );
        neighbours
    }

    fn is_vpn_only(&self, node_id: &str) -> bool {
        self.config.vpn_only_nodes.contains(node_id)
    }

    /// Nodes whose hop distance to the nearest gateway is exactly `tier`.
    ///
    /// Hops count mesh and VPN links alike. Without gateways every tier is empty.
    #[instrument(level = "debug", skip(self))]
    pub fn get_nodes_in_tier(&mut self, tier: usize) -> DomainResult<BTreeSet<String>> {
        if !self.tiers.contains_key(&0) {
            return Ok(BTreeSet::new());
        }

        for i in 0..tier {
            if self.tiers.contains_key(&(i + 1)) {
                continue;
            }
            let mut next = BTreeSet::new();
            if let Some(current) = self.tiers.get(&i) {
                for node_id in current {
                    next.extend(self.get_neighbours(node_id, true)?);
                }
            }
            next.retain(|id| !self.tiered_nodes.contains(id));
            debug!(tier = i + 1, size = next.len(), "computed tier");
            self.tiered_nodes.extend(next.iter().cloned());
            self.tiers.insert(i + 1, next);
        }

        Ok(self.tiers.get(&tier).cloned().unwrap_or_default())
    }

    /// All non-empty tiers starting at tier 0.
    pub fn tiers(&mut self) -> DomainResult<Vec<BTreeSet<String>>> {
        let mut result = Vec::new();
        // a tier can't be deeper than the number of nodes
        for tier in 0..=self.nodes.len() {
            let nodes = self.get_nodes_in_tier(tier)?;
            if nodes.is_empty() {
                break;
            }
            result.push(nodes);
        }
        Ok(result)
    }

    /// All nodes reachable from `node_id` over mesh links only.
    pub fn get_mesh_of_node(&self, node_id: &str) -> DomainResult<Mesh> {
        Ok(self.get_mesh_of_node_with_fake_meshes(node_id)?.0)
    }

    /// Like [`Network::get_mesh_of_node`], also returning the fake mesh
    /// connections found while walking the mesh.
    pub fn get_mesh_of_node_with_fake_meshes(
        &self,
        node_id: &str,
    ) -> DomainResult<(Mesh, BTreeSet<FakeMeshConnection>)> {
        let mut mesh = BTreeSet::from([node_id.to_string()]);
        let mut fakes = BTreeSet::new();
        let mut queue = VecDeque::from([node_id.to_string()]);

        while let Some(current) = queue.pop_front() {
            let neighbours = self.classify(&current)?;
            fakes.extend(neighbours.fake_mesh.iter().cloned());
            for neighbour in &neighbours.mesh {
                if mesh.insert(neighbour.clone()) {
                    queue.push_back(neighbour.clone());
                }
            }
        }

        Ok((mesh, fakes))
    }

    /// Distinct meshes, seeded from every node.
    #[instrument(level = "debug", skip(self))]
    pub fn get_meshes(&self) -> DomainResult<BTreeSet<Mesh>> {
        self.collect_meshes(|_| true)
    }

    /// Distinct meshes containing at least one online node.
    #[instrument(level = "debug", skip(self))]
    pub fn get_online_meshes(&self) -> DomainResult<BTreeSet<Mesh>> {
        self.collect_meshes(|node| node.is_online)
    }

    fn collect_meshes(&self, is_seed: impl Fn(&Node) -> bool) -> DomainResult<BTreeSet<Mesh>> {
        let mut meshes = BTreeSet::new();
        let mut covered = BTreeSet::new();
        for node in self.nodes.values().filter(|node| is_seed(node)) {
            if covered.contains(&node.node_id) {
                continue;
            }
            let mesh = self.get_mesh_of_node(&node.node_id)?;
            covered.extend(mesh.iter().cloned());
            meshes.insert(mesh);
        }
        debug!(count = meshes.len(), "collected meshes");
        Ok(meshes)
    }

    /// Fake mesh connections across all nodes of the graph.
    pub fn get_fake_mesh_connections(&self) -> DomainResult<BTreeSet<FakeMeshConnection>> {
        let mut fakes = BTreeSet::new();
        for node_id in self.nodes.keys() {
            fakes.extend(self.classify(node_id)?.fake_mesh.iter().cloned());
        }
        Ok(fakes)
    }
}
