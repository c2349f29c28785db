//! CRUD operations of the `pixela_graph` resource.
//!
//! Each operation takes the Graph API handle explicitly and issues its remote
//! calls one after another. Nothing is retried and nothing is cached between
//! calls.

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use pixela_interfaces::{ApiResult, GraphApi};

use crate::error::{ProviderError, ProviderResult};
use crate::graph_config::{format_last_updated, GraphConfig};

fn ensure_success(result: ApiResult) -> ProviderResult<()> {
    if result.is_success {
        return Ok(());
    }
    warn!(status = result.status_code, message = %result.message, "Remote call rejected");
    Err(ProviderError::RemoteRejected {
        status: result.status_code,
        message: result.message,
    })
}

/// Register the graph remotely. Returns the identifier of the new resource,
/// which is the graph id.
#[instrument(skip(api, config), fields(graph_id = %config.graph_id))]
pub async fn create(api: &dyn GraphApi, config: &GraphConfig) -> ProviderResult<String> {
    let result = api.create_graph(&config.to_create_input()).await?;
    ensure_success(result)?;

    info!("Created graph");
    Ok(config.graph_id.clone())
}

/// Re-derive every attribute from the remote graph list.
///
/// Pixela has no get-by-id endpoint, so this fetches the whole list and scans
/// it. `last_updated` is not stored remotely and comes back as `None`.
#[instrument(skip(api))]
pub async fn read(api: &dyn GraphApi, graph_id: &str) -> ProviderResult<GraphConfig> {
    let list = api.get_graphs().await?;
    debug!(count = list.graphs.len(), "Scanning graph list");

    list.find(graph_id)
        .map(GraphConfig::from)
        .ok_or_else(|| ProviderError::NotFound(graph_id.to_string()))
}

/// Apply `planned` on top of `prior` and return the refreshed record.
///
/// Changing `graph_id` or `type` fails before any remote call. When a mutable
/// attribute changed, the full set of mutable values is sent and
/// `last_updated` is stamped; otherwise only the final read happens.
#[instrument(skip(api, prior, planned))]
pub async fn update(
    api: &dyn GraphApi,
    graph_id: &str,
    prior: &GraphConfig,
    planned: &GraphConfig,
) -> ProviderResult<GraphConfig> {
    let changed = prior.changed_fields(planned);

    if let Some(field) = changed.iter().find(|f| f.is_immutable()) {
        return Err(ProviderError::ImmutableFieldChanged {
            field: field.as_str().to_string(),
            from: prior.field_value(*field),
            to: planned.field_value(*field),
        });
    }

    let mut last_updated = prior.last_updated.clone();

    if changed.is_empty() {
        debug!("No mutable attribute changed, skipping update call");
    } else {
        debug!(?changed, "Updating graph");
        let result = api.update_graph(graph_id, &planned.to_update_input()).await?;
        ensure_success(result)?;

        last_updated = Some(format_last_updated(Utc::now()));
        info!("Updated graph");
    }

    let mut refreshed = read(api, graph_id).await?;
    refreshed.last_updated = last_updated;
    Ok(refreshed)
}

/// Delete the graph. The caller drops its identifier once this succeeds.
#[instrument(skip(api))]
pub async fn delete(api: &dyn GraphApi, graph_id: &str) -> ProviderResult<()> {
    let result = api.delete_graph(graph_id).await?;
    ensure_success(result)?;

    info!("Deleted graph");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeGraphApi;
    use pixela_interfaces::PixelaError;
    use pretty_assertions::assert_eq;

    fn commits() -> GraphConfig {
        GraphConfig::new("g1", "Commits", "commit", "int", "shibafu")
    }

    #[tokio::test]
    async fn test_create_then_read_round_trip() {
        let api = FakeGraphApi::new();
        let config = commits().with_timezone("Asia/Tokyo").with_is_secret(true);

        let id = create(&api, &config).await.unwrap();
        assert_eq!(id, "g1");

        let read_back = read(&api, &id).await.unwrap();
        assert_eq!(read_back, config);
    }

    #[tokio::test]
    async fn test_read_fills_defaults() {
        let api = FakeGraphApi::new();
        create(&api, &commits()).await.unwrap();

        let read_back = read(&api, "g1").await.unwrap();
        assert_eq!(read_back.timezone, "UTC");
        assert_eq!(read_back.self_sufficient, "none");
        assert!(!read_back.is_secret);
        assert!(!read_back.publish_optional_data);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_remote_rejected() {
        let api = FakeGraphApi::new();
        create(&api, &commits()).await.unwrap();

        let err = create(&api, &commits()).await.unwrap_err();
        assert!(matches!(err, ProviderError::RemoteRejected { status: 409, .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_create_transport_error_surfaces() {
        let api = FakeGraphApi::new();
        api.fail_next(PixelaError::Transport("connection refused".to_string()));

        let err = create(&api, &commits()).await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::Transport(PixelaError::Transport("connection refused".to_string()))
        );
        assert!(api.graphs().is_empty());
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let api = FakeGraphApi::new();
        create(&api, &commits()).await.unwrap();

        let err = read(&api, "nope").await.unwrap_err();
        assert_eq!(err, ProviderError::NotFound("nope".to_string()));
    }

    #[tokio::test]
    async fn test_update_name_only() {
        let api = FakeGraphApi::new();
        let prior = commits().with_timezone("Asia/Tokyo");
        create(&api, &prior).await.unwrap();

        let mut planned = prior.clone();
        planned.name = "Pushes".to_string();

        let updated = update(&api, "g1", &prior, &planned).await.unwrap();
        assert_eq!(updated.name, "Pushes");
        assert_eq!(updated.graph_id, prior.graph_id);
        assert_eq!(updated.graph_type, prior.graph_type);
        assert_eq!(updated.unit, prior.unit);
        assert_eq!(updated.color, prior.color);
        assert_eq!(updated.timezone, prior.timezone);
        assert!(updated.last_updated.is_some());
        assert_eq!(api.update_calls(), 1);
    }

    #[tokio::test]
    async fn test_update_immutable_fields_rejected_without_remote_call() {
        let api = FakeGraphApi::new();
        let prior = commits();
        create(&api, &prior).await.unwrap();
        let calls_before = api.total_calls();

        let mut planned = prior.clone();
        planned.graph_type = "float".to_string();
        let err = update(&api, "g1", &prior, &planned).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::ImmutableFieldChanged { ref field, .. } if field == "type"
        ));

        let mut planned = prior.clone();
        planned.graph_id = "g2".to_string();
        planned.name = "Other".to_string();
        let err = update(&api, "g1", &prior, &planned).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::ImmutableFieldChanged { ref field, .. } if field == "graph_id"
        ));

        assert_eq!(api.total_calls(), calls_before);
    }

    #[tokio::test]
    async fn test_update_without_changes_only_reads() {
        let api = FakeGraphApi::new();
        let mut prior = commits();
        create(&api, &prior).await.unwrap();
        prior.last_updated = Some("Saturday, 17-Oct-26 08:00:00 UTC".to_string());

        let refreshed = update(&api, "g1", &prior, &prior.clone()).await.unwrap();
        assert_eq!(api.update_calls(), 0);
        assert_eq!(api.get_calls(), 1);
        assert_eq!(refreshed, prior);
    }

    #[tokio::test]
    async fn test_update_rejected_by_remote() {
        let api = FakeGraphApi::new();
        let prior = commits();

        let mut planned = prior.clone();
        planned.unit = "push".to_string();
        let err = update(&api, "g1", &prior, &planned).await.unwrap_err();
        assert!(matches!(err, ProviderError::RemoteRejected { status: 404, .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_delete_then_read_is_not_found() {
        let api = FakeGraphApi::new();
        create(&api, &commits()).await.unwrap();

        delete(&api, "g1").await.unwrap();

        let err = read(&api, "g1").await.unwrap_err();
        assert_eq!(err, ProviderError::NotFound("g1".to_string()));
    }

    #[tokio::test]
    async fn test_delete_missing_is_remote_rejected() {
        let api = FakeGraphApi::new();

        let err = delete(&api, "g1").await.unwrap_err();
        assert!(matches!(err, ProviderError::RemoteRejected { status: 404, .. }), "got {:?}", err);
    }
}
