//! Infrastructure layer - external adapters (HTTP, filesystem).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod transport;

pub use config::{config_file_path, ensure_config_exists, resolve_config, save_config};
pub use transport::{GraphqlTransport, HttpTransport};
