//! Infrastructure layer: filesystem and HTTP access, service wiring

pub mod di;
pub mod error;
pub mod traits;

pub use error::InfraError;
pub use traits::{FileSystem, HttpClient, RealFileSystem, UreqHttpClient};
