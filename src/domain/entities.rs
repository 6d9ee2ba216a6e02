//! Domain entities: nodes, links and the per-node neighbour cache

use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv6Addr;

use crate::domain::version::Version;

/// Separator between the two endpoint ids of a canonical link key.
pub const LINK_KEY_SEPARATOR: &str = "-";

/// Geographic position of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// A participant of the mesh network.
///
/// All fields are fixed after construction. The neighbour cache is filled
/// once by [`crate::domain::Network`] on the first neighbour query.
#[derive(Debug, Clone)]
pub struct Node {
    pub node_id: String,
    pub is_gateway: bool,
    pub is_online: bool,
    pub version: Option<Version>,
    pub client_count: Option<u64>,
    pub hostname: Option<String>,
    pub location: Option<Location>,
    pub ipv6: Option<Ipv6Addr>,
    pub(crate) neighbours: OnceCell<Neighbours>,
}

impl Node {
    pub fn new(node_id: impl Into<String>, is_gateway: bool, is_online: bool) -> Self {
        Self {
            node_id: node_id.into(),
            is_gateway,
            is_online,
            version: None,
            client_count: None,
            hostname: None,
            location: None,
            ipv6: None,
            neighbours: OnceCell::new(),
        }
    }

    pub fn with_version(mut self, version: Option<Version>) -> Self {
        self.version = version;
        self
    }

    pub fn with_client_count(mut self, client_count: Option<u64>) -> Self {
        self.client_count = client_count;
        self
    }

    pub fn with_hostname(mut self, hostname: Option<String>) -> Self {
        self.hostname = hostname;
        self
    }

    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    pub fn with_ipv6(mut self, ipv6: Option<Ipv6Addr>) -> Self {
        self.ipv6 = ipv6;
        self
    }

    /// Neighbour classification, if already computed.
    pub fn cached_neighbours(&self) -> Option<&Neighbours> {
        self.neighbours.get()
    }
}

/// Classified neighbours of a single node.
///
/// `mesh` and `vpn` are disjoint. `fake_mesh` lists the links of this node
/// that were declared non-VPN but touch a VPN-only node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighbours {
    pub mesh: BTreeSet<String>,
    pub vpn: BTreeSet<String>,
    pub fake_mesh: BTreeSet<FakeMeshConnection>,
}

impl Neighbours {
    /// Mesh neighbours, merged with VPN neighbours if requested.
    pub fn select(&self, include_vpn: bool) -> BTreeSet<String> {
        if include_vpn {
            self.mesh.union(&self.vpn).cloned().collect()
        } else {
            self.mesh.clone()
        }
    }
}

/// A link declared as radio link whose endpoints can only talk over VPN.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FakeMeshConnection {
    a: String,
    b: String,
}

impl FakeMeshConnection {
    pub fn new(a: &str, b: &str) -> Self {
        let (a, b) = canonical_pair(a, b);
        Self {
            a: a.to_string(),
            b: b.to_string(),
        }
    }

    pub fn endpoints(&self) -> (&str, &str) {
        (&self.a, &self.b)
    }
}

impl fmt::Display for FakeMeshConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.a, self.b)
    }
}

/// Link between two nodes as reported by batman-adv.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub vpn: bool,
    /// Transmission quality denominator.
    pub tq: f64,
    pub bidirect: bool,
}

impl Link {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        vpn: bool,
        tq: f64,
        bidirect: bool,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            vpn,
            tq,
            bidirect,
        }
    }

    pub fn tq_percent(&self) -> f64 {
        1.0 / self.tq
    }

    /// Key shared by both directions of this link.
    pub fn key(&self) -> String {
        link_key(&self.source, &self.target)
    }

    /// The endpoint opposite to `node_id`, None if the link does not touch it.
    pub fn other_endpoint(&self, node_id: &str) -> Option<&str> {
        if self.source == node_id {
            Some(&self.target)
        } else if self.target == node_id {
            Some(&self.source)
        } else {
            None
        }
    }
}

/// Canonical key for an unordered node pair: ids ordered case-insensitively.
pub fn link_key(a: &str, b: &str) -> String {
    let (first, second) = canonical_pair(a, b);
    format!("{first}{LINK_KEY_SEPARATOR}{second}")
}

/// Orders case-insensitively, ids equal up to case fall back to byte order.
fn canonical_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    match a
        .to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
    {
        Ordering::Greater => (b, a),
        _ => (a, b),
    }
}
