//! Domain layer: topology entities and graph algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod network;
pub mod version;

pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use network::{Mesh, Network, NetworkConfig};
pub use version::Version;
