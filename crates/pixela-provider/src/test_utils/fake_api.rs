use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use pixela_interfaces::{
    ApiResult, GraphApi, GraphCreateInput, GraphDefinition, GraphList, GraphUpdateInput,
    PixelaError, PixelaResult,
};

/// A fake implementation of GraphApi for testing
///
/// Keeps graphs in memory and answers the way Pixela does: duplicate ids are
/// rejected with 409, unknown ids with 404.
#[derive(Debug, Default, Clone)]
pub struct FakeGraphApi {
    graphs: Arc<Mutex<Vec<GraphDefinition>>>,
    next_error: Arc<Mutex<Option<PixelaError>>>,
    create_calls: Arc<AtomicUsize>,
    get_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
}

impl FakeGraphApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a graph as if it had been created out of band
    pub fn insert(&self, graph: GraphDefinition) {
        self.graphs.lock().unwrap().push(graph);
    }

    /// Snapshot of the stored graphs
    pub fn graphs(&self) -> Vec<GraphDefinition> {
        self.graphs.lock().unwrap().clone()
    }

    /// Make the next call fail with `error` before touching any state
    pub fn fail_next(&self, error: PixelaError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.create_calls() + self.get_calls() + self.update_calls() + self.delete_calls()
    }

    fn take_error(&self) -> PixelaResult<()> {
        match self.next_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GraphApi for FakeGraphApi {
    async fn create_graph(&self, input: &GraphCreateInput) -> PixelaResult<ApiResult> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.take_error()?;

        let mut graphs = self.graphs.lock().unwrap();
        if graphs.iter().any(|g| g.id == input.id) {
            return Ok(ApiResult::failure(409, "This graph ID already exist."));
        }

        graphs.push(GraphDefinition {
            id: input.id.clone(),
            name: input.name.clone(),
            unit: input.unit.clone(),
            graph_type: input.graph_type.clone(),
            color: input.color.clone(),
            timezone: input.timezone.clone(),
            purge_cache_urls: Vec::new(),
            self_sufficient: input.self_sufficient.clone(),
            is_secret: input.is_secret,
            publish_optional_data: input.publish_optional_data,
        });
        Ok(ApiResult::success())
    }

    async fn get_graphs(&self) -> PixelaResult<GraphList> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.take_error()?;

        Ok(GraphList {
            graphs: self.graphs(),
        })
    }

    async fn update_graph(
        &self,
        graph_id: &str,
        input: &GraphUpdateInput,
    ) -> PixelaResult<ApiResult> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.take_error()?;

        let mut graphs = self.graphs.lock().unwrap();
        let Some(graph) = graphs.iter_mut().find(|g| g.id == graph_id) else {
            return Ok(ApiResult::failure(404, "Specified graph not found."));
        };

        graph.name = input.name.clone();
        graph.unit = input.unit.clone();
        graph.color = input.color.clone();
        graph.timezone = input.timezone.clone();
        if let Some(urls) = &input.purge_cache_urls {
            graph.purge_cache_urls = urls.clone();
        }
        graph.self_sufficient = input.self_sufficient.clone();
        graph.is_secret = input.is_secret;
        graph.publish_optional_data = input.publish_optional_data;
        Ok(ApiResult::success())
    }

    async fn delete_graph(&self, graph_id: &str) -> PixelaResult<ApiResult> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.take_error()?;

        let mut graphs = self.graphs.lock().unwrap();
        let before = graphs.len();
        graphs.retain(|g| g.id != graph_id);

        if graphs.len() == before {
            return Ok(ApiResult::failure(404, "Specified graph not found."));
        }
        Ok(ApiResult::success())
    }
}
