//! Snapshot loading service
//!
//! Retrieves both snapshot documents from local paths or HTTP(S) URLs and
//! builds the network from them.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::snapshot::build_network;
use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{Network, NetworkConfig};
use crate::infrastructure::traits::{FileSystem, HttpClient};

/// Service for loading network snapshots.
pub struct SnapshotService {
    fs: Arc<dyn FileSystem>,
    http: Arc<dyn HttpClient>,
}

impl SnapshotService {
    /// Create a new snapshot service.
    pub fn new(fs: Arc<dyn FileSystem>, http: Arc<dyn HttpClient>) -> Self {
        Self { fs, http }
    }

    /// Load `nodes.json` and `graph.json` and build the network.
    #[instrument(level = "debug", skip(self, config))]
    pub fn load(
        &self,
        nodes_source: &str,
        graph_source: &str,
        config: NetworkConfig,
    ) -> ApplicationResult<Network> {
        let nodes = self.fetch(nodes_source)?;
        let graph = self.fetch(graph_source)?;
        build_network(&nodes, &graph, config)
    }

    /// Read a document from a URL (`http://`, `https://`) or a local path.
    pub fn fetch(&self, source: &str) -> ApplicationResult<String> {
        if is_url(source) {
            debug!("fetch: url={}", source);
            self.http
                .get_string(source)
                .with_source_context("download document", source)
        } else {
            debug!("fetch: path={}", source);
            self.fs
                .read_to_string(Path::new(source))
                .with_source_context("read document", source)
        }
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
