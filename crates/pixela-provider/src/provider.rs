//! Host-facing entry points
//!
//! The host framework stores resource state as JSON records. These functions
//! decode those records, run the matching [`resource`](crate::resource)
//! operation and hand back either the new record or diagnostics.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use pixela_client::create_pixela_client;
use pixela_interfaces::GraphApi;

use crate::config::ProviderConfig;
use crate::error::{Diagnostic, HostResult, ProviderError, ProviderResult};
use crate::graph_config::GraphConfig;
use crate::resource;
use crate::schema::{graph_resource_schema, ResourceSchema, GRAPH_RESOURCE_TYPE};
use crate::validation::validate_graph_config;

/// Stored record of a `pixela_graph` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphState {
    /// Identifier adopted at creation, `None` once the graph is gone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub config: GraphConfig,
}

impl GraphState {
    /// State of a resource that exists remotely under `id`
    pub fn new(id: impl Into<String>, config: GraphConfig) -> Self {
        Self {
            id: Some(id.into()),
            config,
        }
    }

    fn require_id(&self) -> ProviderResult<&str> {
        self.id
            .as_deref()
            .ok_or_else(|| ProviderError::InvalidConfig("state has no id".to_string()))
    }

    fn to_value(&self) -> ProviderResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Provider serving the `pixela_graph` resource
#[derive(Clone)]
pub struct PixelaProvider {
    api: Arc<dyn GraphApi>,
    schema: ResourceSchema,
}

impl std::fmt::Debug for PixelaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelaProvider").finish_non_exhaustive()
    }
}

impl PixelaProvider {
    /// Provider over an existing Graph API handle
    pub fn new(api: Arc<dyn GraphApi>) -> Self {
        Self {
            api,
            schema: graph_resource_schema(),
        }
    }

    /// Build the HTTP client from provider settings
    pub fn configure(config: &ProviderConfig) -> ProviderResult<Self> {
        let api = create_pixela_client(config.client_config())?;
        info!(
            username = %config.username,
            base_url = %config.base_url,
            "Configured Pixela provider"
        );
        Ok(Self::new(api))
    }

    /// Schema of every resource type served
    pub fn schema(&self) -> Vec<(&'static str, ResourceSchema)> {
        vec![(GRAPH_RESOURCE_TYPE, self.schema.clone())]
    }

    fn check_resource_type(&self, resource_type: &str) -> ProviderResult<()> {
        if resource_type == GRAPH_RESOURCE_TYPE {
            Ok(())
        } else {
            Err(ProviderError::UnknownResourceType(resource_type.to_string()))
        }
    }

    /// Schema check, defaults, then decoding into a config. Computed
    /// attributes in the record are dropped.
    fn decode_config(&self, record: Value) -> HostResult<GraphConfig> {
        let Value::Object(mut map) = record else {
            return Err(ProviderError::InvalidConfig(
                "resource record must be a JSON object".to_string(),
            )
            .into());
        };

        let diagnostics = self.schema.check_types(&map);
        if !diagnostics.is_empty() {
            return Err(diagnostics);
        }

        self.schema.strip_computed(&mut map);
        self.schema.apply_defaults(&mut map);
        let config: GraphConfig =
            serde_json::from_value(Value::Object(map)).map_err(ProviderError::from)?;
        Ok(config)
    }

    /// Like [`Self::decode_config`], but keeps the computed attributes of a
    /// stored record
    fn decode_state(&self, record: Value) -> HostResult<GraphState> {
        let computed = |name: &str| record.get(name).and_then(Value::as_str).map(str::to_string);
        let id = computed("id");
        let last_updated = computed("last_updated");

        let mut config = self.decode_config(record)?;
        config.last_updated = last_updated;
        Ok(GraphState { id, config })
    }

    /// Validate a configuration record without touching the remote service
    #[instrument(skip(self, config))]
    pub fn validate_resource_config(&self, resource_type: &str, config: Value) -> HostResult<()> {
        self.check_resource_type(resource_type)?;
        let config = self.decode_config(config)?;

        let diagnostics = validate_graph_config(&config);
        if diagnostics.iter().any(Diagnostic::is_error) {
            return Err(diagnostics);
        }
        Ok(())
    }

    /// Create the remote graph and return the new state record
    #[instrument(skip(self, planned))]
    pub async fn create(&self, resource_type: &str, planned: Value) -> HostResult<Value> {
        self.check_resource_type(resource_type)?;
        let config = self.decode_config(planned)?;

        let id = resource::create(self.api.as_ref(), &config).await?;
        Ok(GraphState::new(id, config).to_value()?)
    }

    /// Refresh a state record. `None` means the graph no longer exists and
    /// the host should drop the resource.
    #[instrument(skip(self, current))]
    pub async fn read(&self, resource_type: &str, current: Value) -> HostResult<Option<Value>> {
        self.check_resource_type(resource_type)?;
        let state = self.decode_state(current)?;
        let id = state.require_id()?;

        match resource::read(self.api.as_ref(), id).await {
            Ok(mut config) => {
                config.last_updated = state.config.last_updated.clone();
                Ok(Some(GraphState::new(id, config).to_value()?))
            }
            Err(ProviderError::NotFound(_)) => {
                info!(graph_id = %id, "Graph disappeared remotely");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Update a resource from its prior state to the planned configuration
    #[instrument(skip(self, prior, planned))]
    pub async fn update(
        &self,
        resource_type: &str,
        prior: Value,
        planned: Value,
    ) -> HostResult<Value> {
        self.check_resource_type(resource_type)?;
        let prior = self.decode_state(prior)?;
        let planned = self.decode_config(planned)?;
        let id = prior.require_id()?;

        let config = resource::update(self.api.as_ref(), id, &prior.config, &planned).await?;
        Ok(GraphState::new(id, config).to_value()?)
    }

    /// Delete the remote graph. Returns the cleared state (`null`).
    #[instrument(skip(self, current))]
    pub async fn delete(&self, resource_type: &str, current: Value) -> HostResult<Value> {
        self.check_resource_type(resource_type)?;
        let state = self.decode_state(current)?;
        let id = state.require_id()?;

        resource::delete(self.api.as_ref(), id).await?;
        Ok(Value::Null)
    }

    /// Adopt an existing remote graph by id
    #[instrument(skip(self))]
    pub async fn import(&self, resource_type: &str, id: &str) -> HostResult<Value> {
        self.check_resource_type(resource_type)?;

        let config = resource::read(self.api.as_ref(), id).await?;
        Ok(GraphState::new(id, config).to_value()?)
    }
}
