//! Node layer tying the document store to its external surfaces.
//!
//! A [`DataDockNode`] owns the store and exposes every operation the HTTP
//! server and the batch CLI need; the `*_routes` modules map those
//! operations onto REST endpoints.

pub mod config;
pub mod file_routes;
pub mod http_helpers;
pub mod http_server;
pub mod node;
pub mod operation_routes;
pub mod system_routes;

pub use config::{load_node_config, NodeConfig};
pub use http_server::DataDockHttpServer;
pub use node::{DataDockNode, ValidationOutcome};
