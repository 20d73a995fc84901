//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → RestExecutor → HTTP requests → pages

use futures::TryStreamExt;
use lakehouse_sdk::executor::RequestExecutor;
use lakehouse_sdk::{load_config_from_str, Error, PageCursorIterator, PageRequest};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{
    body_string_contains, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn executor_for(server: &MockServer, extra: &str) -> Arc<dyn RequestExecutor> {
    let yaml = format!(
        "service_url: {}/lakehouse/api/v2\nretry:\n  enabled: false\n{extra}",
        server.uri()
    );
    let config = load_config_from_str(&yaml).unwrap();
    Arc::new(config.build_executor().unwrap())
}

#[derive(Debug, Deserialize, PartialEq)]
struct IngestionJob {
    job_id: String,
    status: String,
}

// ============================================================================
// Cursor Walk
// ============================================================================

#[tokio::test]
async fn test_walks_all_pages_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lakehouse/api/v2/ingestion_jobs"))
        .and(query_param("start", "c1"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ingestion_jobs": [
                {"job_id": "j3", "status": "running"},
                {"job_id": "j4", "status": "running"}
            ],
            "next": "c2",
            "total_count": 5,
            "limit": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lakehouse/api/v2/ingestion_jobs"))
        .and(query_param("start", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ingestion_jobs": [{"job_id": "j5", "status": "running"}],
            "total_count": 5,
            "limit": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lakehouse/api/v2/ingestion_jobs"))
        .and(query_param_is_missing("start"))
        .and(query_param("status", "running"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ingestion_jobs": [
                {"job_id": "j1", "status": "running"},
                {"job_id": "j2", "status": "running"}
            ],
            "next": "c1",
            "total_count": 5,
            "limit": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let executor = executor_for(&server, "");
    let request = PageRequest::new().filter("status", "running").limit(2);
    let mut jobs =
        PageCursorIterator::<IngestionJob>::new(executor, "list_ingestion_jobs", request)
            .unwrap();

    let all = jobs.collect_all().await.unwrap();
    let ids: Vec<&str> = all.iter().map(|j| j.job_id.as_str()).collect();
    assert_eq!(ids, vec!["j1", "j2", "j3", "j4", "j5"]);
    assert!(all.iter().all(|j| j.status == "running"));

    assert!(!jobs.has_next());
    assert_eq!(jobs.pages_fetched(), 3);
    assert_eq!(jobs.last_page_meta().unwrap().total_count, Some(5));

    let err = jobs.next_page().await.unwrap_err();
    assert!(matches!(err, Error::IteratorExhausted { .. }));
}

#[tokio::test]
async fn test_empty_listing_single_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lakehouse/api/v2/presto_engines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "presto_engines": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let executor = executor_for(&server, "");
    let mut engines =
        PageCursorIterator::<Value>::new(executor, "list_presto_engines", PageRequest::new())
            .unwrap();

    assert!(engines.has_next());
    assert!(engines.next_page().await.unwrap().is_empty());
    assert!(!engines.has_next());
}

#[tokio::test]
async fn test_path_params_and_item_stream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/lakehouse/api/v2/spark_engines/spark-7/applications",
        ))
        .and(query_param("start", "next-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "applications": [{"application_id": "a3"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(
            "/lakehouse/api/v2/spark_engines/spark-7/applications",
        ))
        .and(query_param_is_missing("start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "applications": [{"application_id": "a1"}, {"application_id": "a2"}],
            "next": {"href": "next-token"}
        })))
        .mount(&server)
        .await;

    let executor = executor_for(&server, "");
    let request = PageRequest::new().path_param("engine_id", "spark-7");
    let apps = PageCursorIterator::<Value>::new(executor, "list_spark_engine_applications", request)
        .unwrap();

    let ids: Vec<String> = apps
        .into_items()
        .map_ok(|app| app["application_id"].as_str().unwrap_or_default().to_string())
        .try_collect()
        .await
        .unwrap();
    assert_eq!(ids, vec!["a1", "a2", "a3"]);
}

#[tokio::test]
async fn test_missing_path_param_rejected_before_io() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let executor = executor_for(&server, "");
    let err = PageCursorIterator::<Value>::new(
        executor,
        "list_spark_engine_applications",
        PageRequest::new(),
    )
    .unwrap_err();

    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(err.to_string().contains("engine_id"));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_transport_failure_is_retryable_by_caller() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lakehouse/api/v2/milvus_services"))
        .and(query_param("start", "c1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lakehouse/api/v2/milvus_services"))
        .and(query_param("start", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "milvus_services": [{"id": "m2"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lakehouse/api/v2/milvus_services"))
        .and(query_param_is_missing("start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "milvus_services": [{"id": "m1"}],
            "next": "c1"
        })))
        .mount(&server)
        .await;

    let executor = executor_for(&server, "");
    let mut services =
        PageCursorIterator::<Value>::new(executor, "list_milvus_services", PageRequest::new())
            .unwrap();

    let first = services.next_page().await.unwrap();
    assert_eq!(first[0]["id"], "m1");

    let err = services.next_page().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    assert!(err.is_transport());
    assert!(services.has_next());
    assert_eq!(services.state().cursor.as_deref(), Some("c1"));

    let second = services.next_page().await.unwrap();
    assert_eq!(second[0]["id"], "m2");
    assert!(!services.has_next());
}

#[tokio::test]
async fn test_non_array_items_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lakehouse/api/v2/spark_engines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spark_engines": {"id": "not-a-list"}
        })))
        .mount(&server)
        .await;

    let executor = executor_for(&server, "");
    let mut engines =
        PageCursorIterator::<Value>::new(executor, "list_spark_engines", PageRequest::new())
            .unwrap();

    let err = engines.next_page().await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(engines.has_next());
}

// ============================================================================
// Auth and Config
// ============================================================================

#[tokio::test]
async fn test_iam_token_fetched_once_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .and(body_string_contains("apikey=k-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "iam-abc",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lakehouse/api/v2/bucket_registrations"))
        .and(header("authorization", "Bearer iam-abc"))
        .and(header("AuthInstanceId", "crn:v1:test"))
        .and(query_param("start", "b2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bucket_registrations": [{"bucket_id": "b2"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lakehouse/api/v2/bucket_registrations"))
        .and(header("authorization", "Bearer iam-abc"))
        .and(query_param_is_missing("start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bucket_registrations": [{"bucket_id": "b1"}],
            "next": "b2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let extra = format!(
        "auth:\n  type: iam\n  api_key: k-42\n  token_url: {}/identity/token\nhttp:\n  headers:\n    AuthInstanceId: \"crn:v1:test\"\n",
        server.uri()
    );
    let executor = executor_for(&server, &extra);
    let mut buckets =
        PageCursorIterator::<Value>::new(executor, "list_bucket_registrations", PageRequest::new())
            .unwrap();

    let all = buckets.collect_all().await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_configured_operation_overrides_builtin() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lakehouse/api/v2/v3/presto_engines"))
        .and(query_param("cursor", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"engines": [{"id": "p-b"}]}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lakehouse/api/v2/v3/presto_engines"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"engines": [{"id": "p-a"}]},
            "pagination": {"next_token": "p2"}
        })))
        .mount(&server)
        .await;

    let extra = r#"operations:
  - name: list_presto_engines
    path: /v3/presto_engines
    page:
      items_path: data.engines
      cursor_path: $.pagination.next_token
      cursor_param: cursor
"#;
    let executor = executor_for(&server, extra);
    let mut engines =
        PageCursorIterator::<Value>::new(executor, "list_presto_engines", PageRequest::new())
            .unwrap();

    let all = engines.collect_all().await.unwrap();
    assert_eq!(all, vec![json!({"id": "p-a"}), json!({"id": "p-b"})]);
}

#[tokio::test]
async fn test_unknown_operation() {
    let server = MockServer::start().await;
    let executor = executor_for(&server, "");

    let err = PageCursorIterator::<Value>::new(executor, "list_widgets", PageRequest::new())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}
