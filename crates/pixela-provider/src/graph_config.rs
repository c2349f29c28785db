//! The user-facing graph record and its mapping to Pixela wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pixela_interfaces::{GraphCreateInput, GraphDefinition, GraphUpdateInput};

/// Default value of `timezone`
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Default value of `self_sufficient`
pub const DEFAULT_SELF_SUFFICIENT: &str = "none";

/// RFC 850 layout used for `last_updated`, e.g. `Sunday, 18-Oct-26 09:30:00 UTC`
pub const LAST_UPDATED_FORMAT: &str = "%A, %d-%b-%y %H:%M:%S %Z";

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_self_sufficient() -> String {
    DEFAULT_SELF_SUFFICIENT.to_string()
}

/// Configuration of a `pixela_graph` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Identifier of the graph, fixed after creation
    pub graph_id: String,

    /// Display name
    pub name: String,

    /// Unit of the quantity
    pub unit: String,

    /// "int" or "float", fixed after creation
    #[serde(rename = "type")]
    pub graph_type: String,

    /// Display color
    pub color: String,

    /// Timezone of the graph
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Automatic value policy
    #[serde(default = "default_self_sufficient")]
    pub self_sufficient: String,

    /// Hide from the public graph list
    #[serde(default)]
    pub is_secret: bool,

    /// Publish optional pixel data
    #[serde(default)]
    pub publish_optional_data: bool,

    /// Time of the last effective update, read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Attributes of [`GraphConfig`] taking part in change detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphField {
    GraphId,
    Name,
    Unit,
    Type,
    Color,
    Timezone,
    SelfSufficient,
    IsSecret,
    PublishOptionalData,
}

impl GraphField {
    /// Every compared attribute, immutable ones first
    pub const ALL: [GraphField; 9] = [
        GraphField::GraphId,
        GraphField::Type,
        GraphField::Name,
        GraphField::Unit,
        GraphField::Color,
        GraphField::Timezone,
        GraphField::SelfSufficient,
        GraphField::IsSecret,
        GraphField::PublishOptionalData,
    ];

    /// Attribute name as it appears in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphField::GraphId => "graph_id",
            GraphField::Name => "name",
            GraphField::Unit => "unit",
            GraphField::Type => "type",
            GraphField::Color => "color",
            GraphField::Timezone => "timezone",
            GraphField::SelfSufficient => "self_sufficient",
            GraphField::IsSecret => "is_secret",
            GraphField::PublishOptionalData => "publish_optional_data",
        }
    }

    /// Pixela cannot change these once the graph exists
    pub fn is_immutable(&self) -> bool {
        matches!(self, GraphField::GraphId | GraphField::Type)
    }
}

impl std::fmt::Display for GraphField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl GraphConfig {
    /// A config with the required attributes set and every optional one defaulted
    pub fn new(
        graph_id: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        graph_type: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            graph_id: graph_id.into(),
            name: name.into(),
            unit: unit.into(),
            graph_type: graph_type.into(),
            color: color.into(),
            timezone: default_timezone(),
            self_sufficient: default_self_sufficient(),
            is_secret: false,
            publish_optional_data: false,
            last_updated: None,
        }
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_self_sufficient(mut self, self_sufficient: impl Into<String>) -> Self {
        self.self_sufficient = self_sufficient.into();
        self
    }

    pub fn with_is_secret(mut self, is_secret: bool) -> Self {
        self.is_secret = is_secret;
        self
    }

    pub fn with_publish_optional_data(mut self, publish_optional_data: bool) -> Self {
        self.publish_optional_data = publish_optional_data;
        self
    }

    /// String rendering of an attribute, for change reports
    pub fn field_value(&self, field: GraphField) -> String {
        match field {
            GraphField::GraphId => self.graph_id.clone(),
            GraphField::Name => self.name.clone(),
            GraphField::Unit => self.unit.clone(),
            GraphField::Type => self.graph_type.clone(),
            GraphField::Color => self.color.clone(),
            GraphField::Timezone => self.timezone.clone(),
            GraphField::SelfSufficient => self.self_sufficient.clone(),
            GraphField::IsSecret => self.is_secret.to_string(),
            GraphField::PublishOptionalData => self.publish_optional_data.to_string(),
        }
    }

    /// Attributes whose value differs between `self` (prior) and `planned`.
    ///
    /// `last_updated` is computed and never compared.
    pub fn changed_fields(&self, planned: &GraphConfig) -> Vec<GraphField> {
        GraphField::ALL
            .iter()
            .copied()
            .filter(|field| self.field_value(*field) != planned.field_value(*field))
            .collect()
    }

    /// Creation request carrying every attribute
    pub fn to_create_input(&self) -> GraphCreateInput {
        GraphCreateInput {
            id: self.graph_id.clone(),
            name: self.name.clone(),
            unit: self.unit.clone(),
            graph_type: self.graph_type.clone(),
            color: self.color.clone(),
            timezone: self.timezone.clone(),
            self_sufficient: self.self_sufficient.clone(),
            is_secret: self.is_secret,
            publish_optional_data: self.publish_optional_data,
        }
    }

    /// Update request carrying the full current value of every mutable attribute
    pub fn to_update_input(&self) -> GraphUpdateInput {
        GraphUpdateInput {
            name: self.name.clone(),
            unit: self.unit.clone(),
            color: self.color.clone(),
            timezone: self.timezone.clone(),
            purge_cache_urls: None,
            self_sufficient: self.self_sufficient.clone(),
            is_secret: self.is_secret,
            publish_optional_data: self.publish_optional_data,
        }
    }
}

impl From<&GraphDefinition> for GraphConfig {
    fn from(graph: &GraphDefinition) -> Self {
        Self {
            graph_id: graph.id.clone(),
            name: graph.name.clone(),
            unit: graph.unit.clone(),
            graph_type: graph.graph_type.clone(),
            color: graph.color.clone(),
            timezone: graph.timezone.clone(),
            self_sufficient: graph.self_sufficient.clone(),
            is_secret: graph.is_secret,
            publish_optional_data: graph.publish_optional_data,
            last_updated: None,
        }
    }
}

/// Render a `last_updated` timestamp
pub fn format_last_updated(at: DateTime<Utc>) -> String {
    at.format(LAST_UPDATED_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn commits() -> GraphConfig {
        GraphConfig::new("g1", "Commits", "commit", "int", "shibafu")
    }

    #[test]
    fn test_defaults_from_json() {
        let config: GraphConfig = serde_json::from_value(json!({
            "graph_id": "g1",
            "name": "Commits",
            "unit": "commit",
            "type": "int",
            "color": "shibafu"
        }))
        .unwrap();

        assert_eq!(config, commits());
        assert_eq!(config.timezone, "UTC");
        assert_eq!(config.self_sufficient, "none");
        assert!(!config.is_secret);
        assert!(!config.publish_optional_data);
        assert!(config.last_updated.is_none());
    }

    #[test]
    fn test_changed_fields_lists_immutable_first() {
        let mut planned = commits();
        planned.name = "Pushes".to_string();
        planned.graph_type = "float".to_string();
        planned.graph_id = "g2".to_string();

        assert_eq!(
            commits().changed_fields(&planned),
            vec![GraphField::GraphId, GraphField::Type, GraphField::Name]
        );
    }

    #[test]
    fn test_changed_fields_ignores_last_updated() {
        let mut planned = commits();
        planned.last_updated = Some("Sunday, 18-Oct-26 09:30:00 UTC".to_string());

        assert!(commits().changed_fields(&planned).is_empty());
    }

    #[test]
    fn test_changed_fields_sees_bool_flips() {
        let planned = commits().with_is_secret(true).with_publish_optional_data(true);

        assert_eq!(
            commits().changed_fields(&planned),
            vec![GraphField::IsSecret, GraphField::PublishOptionalData]
        );
    }

    #[test]
    fn test_update_input_has_no_id_or_type() {
        let input = commits().with_timezone("Asia/Tokyo").to_update_input();
        let value = serde_json::to_value(&input).unwrap();

        assert!(value.get("id").is_none());
        assert!(value.get("type").is_none());
        assert_eq!(value["timezone"], json!("Asia/Tokyo"));
    }

    #[test]
    fn test_from_definition_copies_every_field() {
        let graph: GraphDefinition = serde_json::from_value(json!({
            "id": "test-graph",
            "name": "graph-name",
            "unit": "commit",
            "type": "int",
            "color": "shibafu",
            "timezone": "Asia/Tokyo",
            "selfSufficient": "increment",
            "isSecret": true,
            "publishOptionalData": true
        }))
        .unwrap();

        let config = GraphConfig::from(&graph);
        let expected = GraphConfig::new("test-graph", "graph-name", "commit", "int", "shibafu")
            .with_timezone("Asia/Tokyo")
            .with_self_sufficient("increment")
            .with_is_secret(true)
            .with_publish_optional_data(true);
        assert_eq!(config, expected);
    }

    #[test]
    fn test_format_last_updated_is_rfc850() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        assert_eq!(format_last_updated(at), "Sunday, 18-Oct-26 09:30:00 UTC");
    }
}
