//! HTTP-level tests for the retrieval pipeline, against a mock exchange.

use serde_json::json;
use txq_core::descriptors::{fetch_batch, DETAIL_FIELDS, INDICATOR_TEXT_FIELD};
use txq_core::page::{PageQuery, PageTraverser};
use txq_core::tag::resolve_tag;
use txq_core::{TxClient, TxError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TxClient {
    TxClient::new(&server.uri(), "test-token".to_string(), 5, false).unwrap()
}

#[tokio::test]
async fn resolve_tag_issues_one_request_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/threat_tags"))
        .and(query_param("text", "media_priority"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"name": "media_priority_samples", "id": "111"},
                {"name": "media_priority", "id": "9999"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = resolve_tag(&client, "media_priority").await.unwrap();
    assert_eq!(id, "9999");
}

#[tokio::test]
async fn resolve_tag_is_stable_across_repeated_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/threat_tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"name": "my_tag", "id": "42"}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = resolve_tag(&client, "my_tag").await.unwrap();
    let second = resolve_tag(&client, "my_tag").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn resolve_tag_with_no_exact_match_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/threat_tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"name": "my_tag_but_longer", "id": "7"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = resolve_tag(&client, "my_tag").await.unwrap_err();
    assert!(matches!(err, TxError::TagNotFound(name) if name == "my_tag"));
}

#[tokio::test]
async fn resolve_tag_with_duplicate_exact_matches_is_ambiguous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/threat_tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"name": "my_tag", "id": "1"},
                {"name": "my_tag", "id": "2"}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = resolve_tag(&client, "my_tag").await.unwrap_err();
    assert!(matches!(err, TxError::AmbiguousTag { count: 2, .. }));
}

/// Five tagged objects at page size 2 come back as batches [2, 2, 1] over
/// exactly three GETs, each following the previous response's cursor.
#[tokio::test]
async fn traverser_walks_cursor_chain_in_order() {
    let server = MockServer::start().await;
    let page2 = format!("{}/pages/2?cursor=abc", server.uri());
    let page3 = format!("{}/pages/3?cursor=def", server.uri());

    Mock::given(method("GET"))
        .and(path("/9999/tagged_objects"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "a1"}, {"id": "a2"}],
            "paging": {"next": page2}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pages/2"))
        .and(query_param("cursor", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "a3"}, {"id": "a4"}],
            "paging": {"next": page3}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pages/3"))
        .and(query_param("cursor", "def"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "a5"}],
            "paging": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = PageQuery {
        page_size: 2,
        ..PageQuery::default()
    };
    let mut traverser = PageTraverser::for_tag(&client, "9999", &query);

    let mut batches = Vec::new();
    while let Some(page) = traverser.next_page().await.unwrap() {
        batches.push(page.identifiers());
    }

    assert_eq!(
        batches,
        vec![
            vec!["a1".to_string(), "a2".to_string()],
            vec!["a3".to_string(), "a4".to_string()],
            vec!["a5".to_string()],
        ]
    );
    // Exhausted traversers stay exhausted.
    assert!(traverser.next_page().await.unwrap().is_none());
}

#[tokio::test]
async fn traverser_passes_time_filters_on_first_request_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/9999/tagged_objects"))
        .and(query_param("limit", "10"))
        .and(query_param("since", "1609459200"))
        .and(query_param("until", "1612137600"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "x"}],
            "paging": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = PageQuery {
        page_size: 10,
        since: Some("1609459200".to_string()),
        until: Some("1612137600".to_string()),
    };
    let mut traverser = PageTraverser::for_tag(&client, "9999", &query);
    let page = traverser.next_page().await.unwrap().unwrap();
    assert_eq!(page.identifiers(), vec!["x".to_string()]);
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn traverser_aborts_on_envelope_missing_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paging": {"next": "https://example.invalid/next"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut traverser = PageTraverser::from_url(&client, format!("{}/listing", server.uri()));
    let err = traverser.next_page().await.unwrap_err();
    assert!(matches!(err, TxError::MalformedEnvelope(_)));
}

#[tokio::test]
async fn fetch_batch_request_count_is_independent_of_indicator_text() {
    let server = MockServer::start().await;
    let base_fields = DETAIL_FIELDS.join(",");
    let with_text = format!("{},{}", base_fields, INDICATOR_TEXT_FIELD);
    let detail = json!({"1001": {"id": "1001", "type": "DOMAIN"}});

    Mock::given(method("GET"))
        .and(path("/threat_descriptors"))
        .and(query_param("ids", "1001"))
        .and(query_param("fields", base_fields.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/threat_descriptors"))
        .and(query_param("ids", "1001"))
        .and(query_param("fields", with_text.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ids = vec!["1001".to_string()];
    let plain = fetch_batch(&client, &ids, false).await.unwrap();
    let with_indicator = fetch_batch(&client, &ids, true).await.unwrap();
    assert_eq!(plain.len(), 1);
    assert_eq!(with_indicator.len(), 1);
}

#[tokio::test]
async fn fetch_batch_preserves_requested_order_and_tolerates_omissions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/threat_descriptors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "3": {"id": "3"},
            "1": {"id": "1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ids = vec!["1".to_string(), "2".to_string(), "3".to_string()];
    let descriptors = fetch_batch(&client, &ids, false).await.unwrap();

    let returned: Vec<&str> = descriptors
        .iter()
        .filter_map(|d| d.get("id").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(returned, vec!["1", "3"]);
}

#[tokio::test]
async fn fetch_batch_with_no_ids_issues_no_request() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let descriptors = fetch_batch(&client, &[], true).await.unwrap();
    assert!(descriptors.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}
