//! # DataDock Library
//!
//! This library implements a REST API and batch utility for managing a
//! directory of JSON documents. Documents are plain `.json` files with
//! preserved key order and numeric types; on top of them sit schema
//! inference, a transform engine, text search, and store maintenance.
//!
//! ## Core Components
//!
//! * `datadock_node` - Node implementation with HTTP server and configuration
//! * `error` - Error types and handling
//! * `schema` - JSON type classification and schema inference
//! * `search` - Case-insensitive search across documents
//! * `store` - Filesystem-backed document store with atomic writes
//! * `transform` - Filter, map, and sort operations over documents

pub mod datadock_node;
pub mod error;
pub mod schema;
pub mod search;
pub mod store;
pub mod transform;

// Re-export main types for convenience
pub use datadock_node::config::load_node_config;
pub use datadock_node::config::NodeConfig;
pub use datadock_node::DataDockHttpServer;
pub use datadock_node::DataDockNode;
pub use datadock_node::ValidationOutcome;
pub use error::{DataDockError, DataDockResult};
pub use schema::{infer_schema, TypeTag};
pub use search::{search, SearchMatch};
pub use store::{DocStore, FileMeta, StoreStats, ValidationReport};
pub use transform::transform;
