//! Attribute schema of the `pixela_graph` resource
//!
//! The schema is what the host sees: attribute names, value types, which
//! attributes are required, which have defaults and which are computed by the
//! provider. It also checks raw JSON records before they are decoded into a
//! [`GraphConfig`](crate::GraphConfig).

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Diagnostic;
use crate::graph_config::{DEFAULT_SELF_SUFFICIENT, DEFAULT_TIMEZONE};

/// Resource type name served by this provider
pub const GRAPH_RESOURCE_TYPE: &str = "pixela_graph";

/// Value type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Bool,
}

impl AttributeType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Bool => value.is_boolean(),
        }
    }
}

/// How an attribute gets its value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "default")]
pub enum AttributeMode {
    /// Must be set in configuration
    Required,
    /// May be set; falls back to the default
    Optional(Value),
    /// Set by the provider, ignored in configuration
    Computed,
}

/// A single attribute of a resource schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    #[serde(flatten)]
    pub mode: AttributeMode,
    /// Changing the value after creation is rejected
    pub immutable: bool,
    pub description: &'static str,
}

impl Attribute {
    fn required_string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            attribute_type: AttributeType::String,
            mode: AttributeMode::Required,
            immutable: false,
            description,
        }
    }

    fn optional(
        name: &'static str,
        attribute_type: AttributeType,
        default: Value,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            attribute_type,
            mode: AttributeMode::Optional(default),
            immutable: false,
            description,
        }
    }

    fn computed_string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            attribute_type: AttributeType::String,
            mode: AttributeMode::Computed,
            immutable: false,
            description,
        }
    }

    fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    pub fn is_required(&self) -> bool {
        self.mode == AttributeMode::Required
    }

    pub fn is_computed(&self) -> bool {
        self.mode == AttributeMode::Computed
    }

    pub fn default_value(&self) -> Option<&Value> {
        match &self.mode {
            AttributeMode::Optional(default) => Some(default),
            _ => None,
        }
    }
}

/// Schema of one resource type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSchema {
    pub version: u32,
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Names of the required attributes
    pub fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes.iter().filter(|a| a.is_required()).map(|a| a.name)
    }

    /// Drop computed attributes from a configuration record
    pub fn strip_computed(&self, record: &mut Map<String, Value>) {
        for attribute in self.attributes.iter().filter(|a| a.is_computed()) {
            record.remove(attribute.name);
        }
    }

    /// Fill absent or null optional attributes with their defaults
    pub fn apply_defaults(&self, record: &mut Map<String, Value>) {
        for attribute in &self.attributes {
            if let Some(default) = attribute.default_value() {
                let slot = record.entry(attribute.name.to_string()).or_insert(Value::Null);
                if slot.is_null() {
                    *slot = default.clone();
                }
            }
        }
    }

    /// Check a raw record: unknown attributes, missing required attributes and
    /// wrongly typed values each produce one diagnostic.
    pub fn check_types(&self, record: &Map<String, Value>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (name, value) in record {
            match self.attribute(name) {
                None => diagnostics.push(
                    Diagnostic::error(format!("Unsupported attribute {:?}", name))
                        .with_attribute(name.as_str()),
                ),
                Some(attribute)
                    if !value.is_null() && !attribute.attribute_type.matches(value) =>
                {
                    diagnostics.push(
                        Diagnostic::error(format!("Incorrect attribute value type for {:?}", name))
                            .with_detail(format!(
                                "expected a {:?} value, got {}",
                                attribute.attribute_type, value
                            ))
                            .with_attribute(name.as_str()),
                    )
                }
                Some(_) => {}
            }
        }

        for name in self.required() {
            if record.get(name).map_or(true, Value::is_null) {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required argument {:?}", name))
                        .with_attribute(name),
                );
            }
        }

        diagnostics
    }
}

/// Schema of `pixela_graph`
pub fn graph_resource_schema() -> ResourceSchema {
    ResourceSchema {
        version: 0,
        attributes: vec![
            Attribute::computed_string("id", "Identifier of the resource, equal to graph_id"),
            Attribute::computed_string("last_updated", "Time of the last effective update"),
            Attribute::required_string("graph_id", "Graph id, ^[a-z][a-z0-9-]{1,16}")
                .immutable(),
            Attribute::required_string("name", "Display name of the graph"),
            Attribute::required_string("unit", "Unit of the quantity, e.g. commit"),
            Attribute::required_string("type", "Quantity type, int or float").immutable(),
            Attribute::required_string("color", "shibafu, momiji, sora, ichou, ajisai or kuro"),
            Attribute::optional(
                "timezone",
                AttributeType::String,
                Value::String(DEFAULT_TIMEZONE.to_string()),
                "Timezone of the graph",
            ),
            Attribute::optional(
                "self_sufficient",
                AttributeType::String,
                Value::String(DEFAULT_SELF_SUFFICIENT.to_string()),
                "increment, decrement or none",
            ),
            Attribute::optional(
                "is_secret",
                AttributeType::Bool,
                Value::Bool(false),
                "Hide from the public graph list",
            ),
            Attribute::optional(
                "publish_optional_data",
                AttributeType::Bool,
                Value::Bool(false),
                "Publish optional pixel data",
            ),
        ],
    }
}
