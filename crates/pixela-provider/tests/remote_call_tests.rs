//! Which remote calls each operation makes, checked with a mockall GraphApi.

mod common;

use mockall::Sequence;
use pixela_interfaces::{ApiResult, GraphList, PixelaError};
use pixela_provider::{resource, GraphConfig, ProviderError};

use common::{commits_definition, MockGraphApi};

fn commits() -> GraphConfig {
    GraphConfig::new("g1", "Commits", "commit", "int", "shibafu")
}

#[tokio::test]
async fn test_create_sends_every_field() {
    let mut api = MockGraphApi::new();
    api.expect_create_graph()
        .withf(|input| {
            input.id == "g1"
                && input.graph_type == "int"
                && input.timezone == "Asia/Tokyo"
                && input.self_sufficient == "increment"
                && input.publish_optional_data
        })
        .times(1)
        .returning(|_| Ok(ApiResult::success()));

    let config = commits()
        .with_timezone("Asia/Tokyo")
        .with_self_sufficient("increment")
        .with_publish_optional_data(true);

    let id = resource::create(&api, &config).await.unwrap();
    assert_eq!(id, "g1");
}

#[tokio::test]
async fn test_create_forwards_remote_message() {
    let mut api = MockGraphApi::new();
    api.expect_create_graph()
        .returning(|_| Ok(ApiResult::failure(400, "Invalid color.")));

    let err = resource::create(&api, &commits()).await.unwrap_err();
    assert_eq!(
        err,
        ProviderError::RemoteRejected {
            status: 400,
            message: "Invalid color.".to_string(),
        }
    );
}

#[tokio::test]
async fn test_immutable_change_makes_no_remote_call() {
    let mut api = MockGraphApi::new();
    api.expect_create_graph().never();
    api.expect_get_graphs().never();
    api.expect_update_graph().never();
    api.expect_delete_graph().never();

    let prior = commits();
    let mut planned = prior.clone();
    planned.graph_type = "float".to_string();

    let err = resource::update(&api, "g1", &prior, &planned).await.unwrap_err();
    assert!(matches!(err, ProviderError::ImmutableFieldChanged { .. }));
}

#[tokio::test]
async fn test_update_sends_full_values_then_reads() {
    let mut api = MockGraphApi::new();
    let mut seq = Sequence::new();

    api.expect_update_graph()
        .withf(|graph_id, input| {
            // Unchanged attributes travel too, not just the diff
            graph_id.to_string() == "g1"
                && input.name == "Pushes"
                && input.unit == "commit"
                && input.color == "shibafu"
                && input.timezone == "UTC"
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(ApiResult::success()));

    api.expect_get_graphs()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| {
            let mut graph = commits_definition();
            graph.name = "Pushes".to_string();
            Ok(GraphList { graphs: vec![graph] })
        });

    let prior = commits();
    let mut planned = prior.clone();
    planned.name = "Pushes".to_string();

    let updated = resource::update(&api, "g1", &prior, &planned).await.unwrap();
    assert_eq!(updated.name, "Pushes");
    assert!(updated.last_updated.is_some());
}

#[tokio::test]
async fn test_noop_update_only_reads() {
    let mut api = MockGraphApi::new();
    api.expect_update_graph().never();
    api.expect_get_graphs()
        .times(1)
        .returning(|| Ok(GraphList { graphs: vec![commits_definition()] }));

    let prior = commits();
    let refreshed = resource::update(&api, "g1", &prior, &prior).await.unwrap();
    assert_eq!(refreshed, prior);
    assert!(refreshed.last_updated.is_none());
}

#[tokio::test]
async fn test_update_transport_error_skips_read() {
    let mut api = MockGraphApi::new();
    api.expect_update_graph()
        .returning(|_, _| Err(PixelaError::Transport("Connection error: refused".to_string())));
    api.expect_get_graphs().never();

    let prior = commits();
    let planned = prior.clone().with_is_secret(true);

    let err = resource::update(&api, "g1", &prior, &planned).await.unwrap_err();
    assert!(matches!(err, ProviderError::Transport(PixelaError::Transport(_))));
}

#[tokio::test]
async fn test_read_scans_the_whole_list() {
    let mut api = MockGraphApi::new();
    api.expect_get_graphs().times(2).returning(|| {
        let mut other = commits_definition();
        other.id = "g0".to_string();
        other.name = "Other".to_string();
        Ok(GraphList { graphs: vec![other, commits_definition()] })
    });

    let config = resource::read(&api, "g1").await.unwrap();
    assert_eq!(config, commits());

    let err = resource::read(&api, "g2").await.unwrap_err();
    assert_eq!(err, ProviderError::NotFound("g2".to_string()));
}

#[tokio::test]
async fn test_read_rejected_listing() {
    let mut api = MockGraphApi::new();
    api.expect_get_graphs().returning(|| {
        Err(PixelaError::Rejected {
            status: 404,
            message: "Specified user does not exist.".to_string(),
        })
    });

    let err = resource::read(&api, "g1").await.unwrap_err();
    assert!(matches!(err, ProviderError::RemoteRejected { status: 404, .. }));
}

#[tokio::test]
async fn test_delete_targets_identifier() {
    let mut api = MockGraphApi::new();
    api.expect_delete_graph()
        .withf(|graph_id| graph_id.to_string() == "g1")
        .times(1)
        .returning(|_| Ok(ApiResult::success()));

    resource::delete(&api, "g1").await.unwrap();
}
