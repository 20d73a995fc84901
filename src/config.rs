//! SDK configuration
//!
//! [`SdkConfig`] is loaded from YAML and can be overridden from the
//! environment. It produces everything needed to build a [`RestExecutor`]:
//! the HTTP client settings, the authenticator config and the operation
//! registry.
//!
//! ```yaml
//! service_url: https://us-south.lakehouse.cloud.ibm.com/lakehouse/api/v2
//! auth:
//!   type: iam
//!   api_key: ${LAKEHOUSE_APIKEY}
//! http:
//!   timeout_seconds: 30
//!   headers:
//!     AuthInstanceId: crn:v1:...
//! retry:
//!   max_retries: 2
//! operations:
//!   - name: list_ingestion_jobs
//!     path: /ingestion_jobs
//!     page:
//!       items_path: ingestion_jobs
//! ```

use crate::auth::{AuthConfig, DEFAULT_IAM_TOKEN_URL};
use crate::error::{Error, Result};
use crate::executor::RestExecutor;
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig, RetryPolicy};
use crate::operation::{ListOperation, OperationRegistry};
use crate::types::{BackoffType, OptionStringExt, StringMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable overriding `service_url`
pub const ENV_SERVICE_URL: &str = "LAKEHOUSE_SERVICE_URL";

/// Environment variable switching auth to IAM with this API key
pub const ENV_APIKEY: &str = "LAKEHOUSE_APIKEY";

/// Environment variable switching auth to a static bearer token
pub const ENV_BEARER_TOKEN: &str = "LAKEHOUSE_BEARER_TOKEN";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete SDK configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Base URL every operation path is joined to
    #[serde(default)]
    pub service_url: String,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Retry settings
    #[serde(default)]
    pub retry: RetrySettings,

    /// Client-side rate limiting, off when absent
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Extra operations, replacing built-ins with the same name
    #[serde(default)]
    pub operations: Vec<ListOperation>,
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User agent, defaults to `lakehouse-sdk/<version>`
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent on every request
    #[serde(default)]
    pub headers: StringMap,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: None,
            headers: StringMap::new(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

// ============================================================================
// Retry Settings
// ============================================================================

/// Retry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Whether failed requests are retried at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff strategy
    #[serde(default)]
    pub backoff: BackoffType,

    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Backoff ceiling in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> u32 {
    4
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_max_backoff_ms() -> u64 {
    30000
}

// ============================================================================
// Loading
// ============================================================================

/// Load a config file, apply environment overrides and validate
pub fn load_config(path: impl AsRef<Path>) -> Result<SdkConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let mut config = SdkConfig::from_yaml(&content)?;
    config.apply_env_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Parse and validate a YAML config. The environment is not consulted.
pub fn load_config_from_str(yaml: &str) -> Result<SdkConfig> {
    let config = SdkConfig::from_yaml(yaml)?;
    config.validate()?;
    Ok(config)
}

/// Build a config from the environment alone
pub fn load_config_from_env() -> Result<SdkConfig> {
    let mut config = SdkConfig::default();
    config.apply_env_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

impl SdkConfig {
    /// Parse a YAML config without validating it
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))
    }

    /// Apply `LAKEHOUSE_*` overrides read through `lookup`.
    ///
    /// A bearer token replaces the configured auth; an API key replaces it
    /// with IAM auth and wins over a bearer token. Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVICE_URL).none_if_empty() {
            self.service_url = url;
        }

        if let Some(api_key) = lookup(ENV_APIKEY).none_if_empty() {
            let token_url = match &self.auth {
                AuthConfig::Iam { token_url, .. } => token_url.clone(),
                _ => DEFAULT_IAM_TOKEN_URL.to_string(),
            };
            self.auth = AuthConfig::Iam { api_key, token_url };
        } else if let Some(token) = lookup(ENV_BEARER_TOKEN).none_if_empty() {
            self.auth = AuthConfig::Bearer { token };
        }
    }

    /// Check the config is usable
    pub fn validate(&self) -> Result<()> {
        if self.service_url.trim().is_empty() {
            return Err(Error::missing_field("service_url"));
        }
        let url = Url::parse(&self.service_url)
            .map_err(|e| Error::invalid_value("service_url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "service_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        match &self.auth {
            AuthConfig::Bearer { token } if token.is_empty() => {
                return Err(Error::missing_field("auth.token"));
            }
            AuthConfig::Basic { username, .. } if username.is_empty() => {
                return Err(Error::missing_field("auth.username"));
            }
            AuthConfig::ApiKey { value, .. } if value.is_empty() => {
                return Err(Error::missing_field("auth.value"));
            }
            AuthConfig::Iam { api_key, token_url } => {
                if api_key.is_empty() {
                    return Err(Error::missing_field("auth.api_key"));
                }
                Url::parse(token_url)
                    .map_err(|e| Error::invalid_value("auth.token_url", e.to_string()))?;
            }
            _ => {}
        }

        if self.http.timeout_seconds == 0 {
            return Err(Error::invalid_value(
                "http.timeout_seconds",
                "must be greater than zero",
            ));
        }

        if self.retry.max_backoff_ms < self.retry.initial_backoff_ms {
            return Err(Error::invalid_value(
                "retry.max_backoff_ms",
                "must not be less than retry.initial_backoff_ms",
            ));
        }

        if let Some(limit) = &self.rate_limit {
            if limit.requests_per_second == 0 {
                return Err(Error::invalid_value(
                    "rate_limit.requests_per_second",
                    "must be greater than zero",
                ));
            }
        }

        Ok(())
    }

    /// Retry policy described by the retry settings
    pub fn to_retry_policy(&self) -> RetryPolicy {
        if !self.retry.enabled {
            return RetryPolicy::disabled();
        }
        RetryPolicy::with_max_retries(self.retry.max_retries).backoff(
            self.retry.backoff,
            Duration::from_millis(self.retry.initial_backoff_ms),
            Duration::from_millis(self.retry.max_backoff_ms),
        )
    }

    /// HTTP client config described by the http, retry and rate-limit settings
    pub fn to_http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_seconds))
            .retry(self.to_retry_policy());

        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        for (key, value) in &self.http.headers {
            builder = builder.header(key.clone(), value.clone());
        }
        builder = match &self.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };

        builder.build()
    }

    /// Built-in operations with the configured ones layered on top
    pub fn registry(&self) -> Result<OperationRegistry> {
        let mut registry = OperationRegistry::with_builtins()?;
        registry.extend(self.operations.iter().cloned())?;
        Ok(registry)
    }

    /// Build a ready-to-use executor
    pub fn build_executor(&self) -> Result<RestExecutor> {
        self.validate()?;
        let http = HttpClient::with_auth(self.to_http_config(), self.auth.clone())?;
        RestExecutor::new(http, self.registry()?, &self.service_url)
    }
}
