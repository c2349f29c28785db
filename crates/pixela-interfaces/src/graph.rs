//! Graph API interfaces for Pixela
//!
//! This module defines the JSON shapes exchanged with the Pixela graph
//! endpoints and the [`GraphApi`] trait that every client implements.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for Graph API operations
pub type PixelaResult<T> = Result<T, PixelaError>;

/// Errors that can occur when talking to the Pixela service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PixelaError {
    /// The request never produced a response (connection refused, DNS, TLS...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Pixela answered a read with a non-success status
    #[error("Request rejected with status {status}: {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Message from the response body
        message: String,
    },

    /// The response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The client was built with unusable settings
    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_self_sufficient() -> String {
    "none".to_string()
}

/// A graph definition as returned by `GET /v1/users/<username>/graphs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDefinition {
    /// User-chosen graph id
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit of the quantity, e.g. "commit"
    pub unit: String,

    /// Quantity type, "int" or "float"
    #[serde(rename = "type")]
    pub graph_type: String,

    /// Display color
    pub color: String,

    /// Timezone used to decide the date of a pixel
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Cache URLs purged on every pixel update
    #[serde(rename = "purgeCacheURLs", default)]
    pub purge_cache_urls: Vec<String>,

    /// Automatic value policy for days without posted data
    #[serde(default = "default_self_sufficient")]
    pub self_sufficient: String,

    /// Whether the graph is hidden from the public graph list
    #[serde(default)]
    pub is_secret: bool,

    /// Whether optional pixel data is published
    #[serde(default)]
    pub publish_optional_data: bool,
}

/// Request body for `POST /v1/users/<username>/graphs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphCreateInput {
    /// Graph id, `^[a-z][a-z0-9-]{1,16}`
    pub id: String,
    /// Display name
    pub name: String,
    /// Unit of the quantity
    pub unit: String,
    /// "int" or "float"
    #[serde(rename = "type")]
    pub graph_type: String,
    /// Display color
    pub color: String,
    /// Timezone of the graph
    pub timezone: String,
    /// Automatic value policy
    pub self_sufficient: String,
    /// Hide from the public graph list
    pub is_secret: bool,
    /// Publish optional pixel data
    pub publish_optional_data: bool,
}

/// Request body for `PUT /v1/users/<username>/graphs/<graphID>`
///
/// The graph id travels in the path, and `type` cannot be changed remotely,
/// so neither appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphUpdateInput {
    /// Display name
    pub name: String,
    /// Unit of the quantity
    pub unit: String,
    /// Display color
    pub color: String,
    /// Timezone of the graph
    pub timezone: String,
    /// Left untouched remotely when `None`
    #[serde(rename = "purgeCacheURLs", skip_serializing_if = "Option::is_none")]
    pub purge_cache_urls: Option<Vec<String>>,
    /// Automatic value policy
    pub self_sufficient: String,
    /// Hide from the public graph list
    pub is_secret: bool,
    /// Publish optional pixel data
    pub publish_optional_data: bool,
}

/// Generic Pixela response for mutating calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResult {
    /// Human readable message from the service
    #[serde(default)]
    pub message: String,

    /// Whether the service accepted the request
    #[serde(default)]
    pub is_success: bool,

    /// Set by Pixela when the request was randomly rejected for non-supporters
    #[serde(default)]
    pub is_rejected: bool,

    /// HTTP status the result arrived with, filled in by the client
    #[serde(skip)]
    pub status_code: u16,
}

impl ApiResult {
    /// Convenience constructor for a successful result
    pub fn success() -> Self {
        Self {
            message: "Success.".to_string(),
            is_success: true,
            is_rejected: false,
            status_code: 200,
        }
    }

    /// Convenience constructor for a rejected result
    pub fn failure(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_success: false,
            is_rejected: false,
            status_code,
        }
    }
}

/// Response body of `GET /v1/users/<username>/graphs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphList {
    /// Every graph owned by the user
    #[serde(default)]
    pub graphs: Vec<GraphDefinition>,
}

impl GraphList {
    /// Linear scan for a graph by id.
    ///
    /// Pixela has no get-by-id endpoint, so callers fetch the whole list and
    /// search it. The list is only valid for the call that fetched it.
    pub fn find(&self, graph_id: &str) -> Option<&GraphDefinition> {
        self.graphs.iter().find(|g| g.id == graph_id)
    }
}

/// Interface for the Pixela graph endpoints
///
/// A non-success reply from Pixela is *not* an error at this level: it comes
/// back as an [`ApiResult`] with `is_success == false` so callers can decide
/// how to report the remote message.
#[async_trait]
pub trait GraphApi: Send + Sync {
    /// Register a new graph
    async fn create_graph(&self, input: &GraphCreateInput) -> PixelaResult<ApiResult>;

    /// List every graph of the configured user
    async fn get_graphs(&self) -> PixelaResult<GraphList>;

    /// Overwrite the mutable attributes of a graph
    async fn update_graph(
        &self,
        graph_id: &str,
        input: &GraphUpdateInput,
    ) -> PixelaResult<ApiResult>;

    /// Delete a graph
    async fn delete_graph(&self, graph_id: &str) -> PixelaResult<ApiResult>;
}
