//! Shared helpers for provider integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use serde_json::{json, Value};

use pixela_interfaces::{
    ApiResult, GraphApi, GraphCreateInput, GraphDefinition, GraphList, GraphUpdateInput,
    PixelaResult,
};

// Generate the mock implementation
mock! {
    pub GraphApi {}

    #[async_trait]
    impl GraphApi for GraphApi {
        async fn create_graph(&self, input: &GraphCreateInput) -> PixelaResult<ApiResult>;
        async fn get_graphs(&self) -> PixelaResult<GraphList>;
        async fn update_graph(
            &self,
            graph_id: &str,
            input: &GraphUpdateInput,
        ) -> PixelaResult<ApiResult>;
        async fn delete_graph(&self, graph_id: &str) -> PixelaResult<ApiResult>;
    }
}

/// The configuration used throughout the examples
pub fn commits_record() -> Value {
    json!({
        "graph_id": "g1",
        "name": "Commits",
        "unit": "commit",
        "type": "int",
        "color": "shibafu"
    })
}

/// Remote definition matching [`commits_record`] with Pixela defaults
pub fn commits_definition() -> GraphDefinition {
    GraphDefinition {
        id: "g1".to_string(),
        name: "Commits".to_string(),
        unit: "commit".to_string(),
        graph_type: "int".to_string(),
        color: "shibafu".to_string(),
        timezone: "UTC".to_string(),
        purge_cache_urls: Vec::new(),
        self_sufficient: "none".to_string(),
        is_secret: false,
        publish_optional_data: false,
    }
}

/// Merge `changes` into `base`
pub fn with(base: Value, changes: Value) -> Value {
    let mut base = base;
    if let (Value::Object(target), Value::Object(source)) = (&mut base, changes) {
        for (key, value) in source {
            target.insert(key, value);
        }
    }
    base
}
