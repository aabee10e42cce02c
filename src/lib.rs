//! Identifier allocation and CNI network configuration for Galactic VPCs
//!
//! This crate holds the logic a VPC operator runs between reading objects and
//! writing them back:
//! - Allocates unused fixed-width hex identifiers for VPCs and attachments
//! - Re-encodes identifiers in base 62 for device names and plugin fields
//! - Sorts attachment addresses and routes into terminations and gateway routes
//! - Assembles the CNI configuration list in the configured plugin topology

pub mod config;
pub mod encoding;
pub mod error;
pub mod identifier;
pub mod model;
pub mod plugin;
pub mod reconcile;
pub mod types;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Re-export commonly used items
pub use config::{Config, Topology};
pub use encoding::{base62_to_hex, hex_to_base62};
pub use error::{Error, Result};
pub use identifier::{Allocator, Keyspace, MAX_ATTEMPTS};
pub use model::RouteSpec;
pub use plugin::{classify, NetworkConfigBuilder};
pub use types::NetConfList;

/// Install a formatting subscriber filtered by `RUST_LOG`, defaulting to
/// `info`.
///
/// Does nothing if the host process already installed one.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
