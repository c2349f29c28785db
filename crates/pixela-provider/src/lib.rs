//! Pixela provider
//!
//! Manages Pixela graphs as declarative resources. The [`resource`] module
//! holds the CRUD operations, [`provider`] wraps them in the JSON entry
//! points a host framework calls.

pub mod config;
pub mod error;
pub mod graph_config;
pub mod logging;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod validation;

// Testing utilities
pub mod test_utils;

// Re-export key types for convenient usage
pub use config::ProviderConfig;
pub use error::{Diagnostic, HostResult, ProviderError, ProviderResult, Severity};
pub use graph_config::{GraphConfig, GraphField};
pub use logging::{init_logging, LoggingConfig};
pub use provider::{GraphState, PixelaProvider};
pub use schema::{graph_resource_schema, ResourceSchema, GRAPH_RESOURCE_TYPE};
pub use validation::validate_graph_config;

// Re-export the client interface so hosts need a single dependency
pub use pixela_interfaces::{GraphApi, PixelaError};
