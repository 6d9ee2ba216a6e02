//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::SnapshotService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, HttpClient, RealFileSystem, UreqHttpClient};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// HTTP client abstraction
    pub http: Arc<dyn HttpClient>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let http = UreqHttpClient::new(Duration::from_secs(settings.http_timeout_secs));
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(http))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs, http }
    }

    /// Snapshot service backed by this container's I/O implementations.
    pub fn snapshot_service(&self) -> SnapshotService {
        SnapshotService::new(self.fs.clone(), self.http.clone())
    }
}
