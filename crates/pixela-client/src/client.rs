use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use tracing::{debug, instrument, warn};

use pixela_interfaces::{
    ApiResult, GraphApi, GraphCreateInput, GraphList, GraphUpdateInput, PixelaError, PixelaResult,
};

use crate::config::PixelaClientConfig;

/// Header carrying the user token on every authenticated Pixela request
pub const USER_TOKEN_HEADER: &str = "X-USER-TOKEN";

/// Client for the Pixela graph endpoints over HTTP
#[derive(Debug, Clone)]
pub struct PixelaClient {
    config: PixelaClientConfig,
    client: Client,
}

impl PixelaClient {
    /// Creates a new PixelaClient with the provided configuration
    pub fn new(config: PixelaClientConfig) -> PixelaResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                PixelaError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Creates a new PixelaClient for the given user against the given service URL
    pub fn with_url(
        base_url: impl Into<String>,
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> PixelaResult<Self> {
        Self::new(PixelaClientConfig::new(username, token).with_base_url(base_url))
    }

    /// The user this client acts for
    pub fn username(&self) -> &str {
        &self.config.username
    }

    fn graphs_url(&self) -> PixelaResult<Url> {
        self.endpoint(&[])
    }

    fn graph_url(&self, graph_id: &str) -> PixelaResult<Url> {
        self.endpoint(&[graph_id])
    }

    /// `{base}/v1/users/{username}/graphs` followed by `extra`, each segment
    /// percent-encoded
    fn endpoint(&self, extra: &[&str]) -> PixelaResult<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| PixelaError::Configuration(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                PixelaError::Configuration(format!(
                    "Base URL cannot carry a path: {}",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["v1", "users", self.config.username.as_str(), "graphs"])
            .extend(extra);
        Ok(url)
    }

    /// Maps an HTTP error to a PixelaError
    fn map_http_error(&self, error: reqwest::Error) -> PixelaError {
        if error.is_timeout() {
            PixelaError::Timeout(error.to_string())
        } else if error.is_connect() {
            PixelaError::Transport(format!("Connection error: {}", error))
        } else {
            PixelaError::Transport(format!("HTTP error: {}", error))
        }
    }

    /// Decodes the `{message, isSuccess}` body of a mutating call.
    ///
    /// Pixela answers rejected requests with a 4xx/5xx status and the same
    /// JSON shape, so those come back as a non-success `ApiResult`.
    async fn read_result(&self, response: Response) -> PixelaResult<ApiResult> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_http_error(e))?;

        match serde_json::from_str::<ApiResult>(&body) {
            Ok(mut result) => {
                result.status_code = status.as_u16();
                // A 2xx without isSuccess is still a failure as far as Pixela is concerned
                if !status.is_success() {
                    result.is_success = false;
                }
                if !result.is_success {
                    warn!(
                        status = status.as_u16(),
                        message = %result.message,
                        "Pixela rejected request"
                    );
                }
                Ok(result)
            }
            Err(e) if status.is_success() => {
                Err(PixelaError::Decode(format!("Failed to parse response: {}", e)))
            }
            Err(_) => {
                let message = if body.trim().is_empty() {
                    format!("HTTP error: {}", status)
                } else {
                    body
                };
                warn!(
                    status = status.as_u16(),
                    %message,
                    "Pixela rejected request with non-JSON body"
                );
                Ok(ApiResult::failure(status.as_u16(), message))
            }
        }
    }
}

#[async_trait]
impl GraphApi for PixelaClient {
    #[instrument(skip(self, input), fields(username = %self.config.username, graph_id = %input.id))]
    async fn create_graph(&self, input: &GraphCreateInput) -> PixelaResult<ApiResult> {
        debug!("Creating graph {:?}", input);

        let response = self.client.post(self.graphs_url()?)
            .header(USER_TOKEN_HEADER, &self.config.token)
            .json(input)
            .send()
            .await
            .map_err(|e| self.map_http_error(e))?;

        self.read_result(response).await
    }

    #[instrument(skip(self), fields(username = %self.config.username))]
    async fn get_graphs(&self) -> PixelaResult<GraphList> {
        debug!("Listing graphs");

        let response = self.client.get(self.graphs_url()?)
            .header(USER_TOKEN_HEADER, &self.config.token)
            .send()
            .await
            .map_err(|e| self.map_http_error(e))?;

        match response.status() {
            StatusCode::OK => {
                let list: GraphList = response.json().await.map_err(|e| {
                    PixelaError::Decode(format!("Failed to parse graph list: {}", e))
                })?;
                debug!(count = list.graphs.len(), "Fetched graph list");
                Ok(list)
            }
            status => {
                let result = self.read_result(response).await?;
                Err(PixelaError::Rejected {
                    status: status.as_u16(),
                    message: result.message,
                })
            }
        }
    }

    #[instrument(skip(self, input), fields(username = %self.config.username, graph_id = %graph_id))]
    async fn update_graph(
        &self,
        graph_id: &str,
        input: &GraphUpdateInput,
    ) -> PixelaResult<ApiResult> {
        debug!("Updating graph with {:?}", input);

        let response = self.client.put(self.graph_url(graph_id)?)
            .header(USER_TOKEN_HEADER, &self.config.token)
            .json(input)
            .send()
            .await
            .map_err(|e| self.map_http_error(e))?;

        self.read_result(response).await
    }

    #[instrument(skip(self), fields(username = %self.config.username, graph_id = %graph_id))]
    async fn delete_graph(&self, graph_id: &str) -> PixelaResult<ApiResult> {
        debug!("Deleting graph");

        let response = self.client.delete(self.graph_url(graph_id)?)
            .header(USER_TOKEN_HEADER, &self.config.token)
            .send()
            .await
            .map_err(|e| self.map_http_error(e))?;

        self.read_result(response).await
    }
}

/// Creates a GraphApi implementation from a configuration
pub fn create_pixela_client(config: PixelaClientConfig) -> PixelaResult<Arc<dyn GraphApi>> {
    let client = PixelaClient::new(config)?;
    Ok(Arc::new(client))
}
