//! HTTP request executor
//!
//! Resolves an operation name through the [`OperationRegistry`], renders its
//! URL under the service URL and performs the call with [`HttpClient`].

use super::RequestExecutor;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::operation::{ListOperation, OperationRegistry};
use crate::pagination::{PageLayout, PageRequest};
use crate::types::JsonValue;
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// Executes list operations against the lakehouse REST API
pub struct RestExecutor {
    http: HttpClient,
    registry: OperationRegistry,
    service_url: Url,
}

impl RestExecutor {
    /// Create an executor for `service_url`
    pub fn new(http: HttpClient, registry: OperationRegistry, service_url: &str) -> Result<Self> {
        let service_url = Url::parse(service_url)?;
        if service_url.cannot_be_a_base() {
            return Err(Error::invalid_value(
                "service_url",
                "URL cannot be used as a base",
            ));
        }
        Ok(Self {
            http,
            registry,
            service_url,
        })
    }

    /// Operations this executor knows about
    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Base URL every operation path is joined to
    pub fn service_url(&self) -> &Url {
        &self.service_url
    }

    /// Underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    fn operation(&self, name: &str) -> Result<&ListOperation> {
        self.registry.require(name)
    }
}

#[async_trait]
impl RequestExecutor for RestExecutor {
    async fn execute(&self, operation: &str, request: &PageRequest) -> Result<JsonValue> {
        let op = self.operation(operation)?;
        op.validate(request)?;

        let url = op.url(&self.service_url, &request.path_params)?;
        let config = RequestConfig {
            query: request.query_pairs(&op.page),
            ..RequestConfig::default()
        };

        debug!(
            "{} {} {} (cursor: {})",
            operation,
            op.method,
            url,
            request.cursor.as_deref().unwrap_or("-")
        );

        self.http
            .request_json::<JsonValue>(op.method.into(), url.as_str(), config)
            .await
    }

    fn page_layout(&self, operation: &str) -> Result<PageLayout> {
        Ok(self.operation(operation)?.page.clone())
    }

    fn validate_params(&self, operation: &str, request: &PageRequest) -> Result<()> {
        self.operation(operation)?.validate(request)
    }
}

impl std::fmt::Debug for RestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestExecutor")
            .field("service_url", &self.service_url.as_str())
            .field("operations", &self.registry.names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpClientConfig, RetryPolicy};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn executor(base: &str) -> RestExecutor {
        let config = HttpClientConfig::builder()
            .retry(RetryPolicy::disabled())
            .build();
        RestExecutor::new(
            HttpClient::with_config(config).unwrap(),
            OperationRegistry::with_builtins().unwrap(),
            base,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_non_base_url() {
        let err = RestExecutor::new(
            HttpClient::new().unwrap(),
            OperationRegistry::new(),
            "mailto:ops@example.com",
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_page_layout_from_registry() {
        let exec = executor("https://host/api/v2");
        let layout = exec.page_layout("list_presto_engines").unwrap();
        assert_eq!(layout.items_path, "presto_engines");

        let err = exec.page_layout("list_widgets").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_validate_params_requires_path_param() {
        let exec = executor("https://host/api/v2");
        let err = exec
            .validate_params("list_spark_engine_applications", &PageRequest::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_execute_sends_filters_limit_and_cursor() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/ingestion_jobs"))
            .and(query_param("status", "running"))
            .and(query_param("limit", "25"))
            .and(query_param("start", "c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ingestion_jobs": [{"job_id": "j2"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let exec = executor(&format!("{}/api/v2", server.uri()));
        let mut request = PageRequest::new().filter("status", "running").limit(25);
        request.cursor = Some("c1".to_string());

        let body = exec.execute("list_ingestion_jobs", &request).await.unwrap();
        assert_eq!(body["ingestion_jobs"][0]["job_id"], "j2");
    }

    #[tokio::test]
    async fn test_execute_first_page_has_no_cursor() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/spark_engines/spark-1/applications"))
            .and(query_param_is_missing("start"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "applications": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let exec = executor(&server.uri());
        let request = PageRequest::new().path_param("engine_id", "spark-1");

        let body = exec
            .execute("list_spark_engine_applications", &request)
            .await
            .unwrap();
        assert_eq!(body, json!({"applications": []}));
    }

    #[tokio::test]
    async fn test_execute_propagates_http_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/presto_engines"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let exec = executor(&server.uri());
        let err = exec
            .execute("list_presto_engines", &PageRequest::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::HttpStatus { status: 403, .. }));
        assert!(err.is_transport());
    }
}
