//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, load_config_from_env, SdkConfig};
use crate::error::Result;
use crate::executor::RequestExecutor;
use crate::operation::OperationRegistry;
use crate::pagination::{PageCursorIterator, PageRequest};
use crate::types::JsonValue;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Operations => self.list_operations(),
            Commands::List {
                operation,
                params,
                path_params,
                limit,
                max_pages,
            } => {
                let request = build_request(params, path_params, *limit);
                self.list(operation, request, *max_pages).await
            }
        }
    }

    /// Load the SDK config from `--config`, or from the environment
    fn load_config(&self) -> Result<SdkConfig> {
        match &self.cli.config {
            Some(path) => load_config(path),
            None => load_config_from_env(),
        }
    }

    /// Registry for `operations`; needs no service URL without `--config`
    fn registry(&self) -> Result<OperationRegistry> {
        match &self.cli.config {
            Some(path) => load_config(path)?.registry(),
            None => OperationRegistry::with_builtins(),
        }
    }

    fn list_operations(&self) -> Result<()> {
        let registry = self.registry()?;
        for op in registry.iter() {
            self.output(&json!({
                "name": op.name,
                "method": op.method.to_string(),
                "path": op.path,
                "items_path": op.page.items_path,
                "required_params": op.required_params,
                "description": op.description,
            }));
        }
        Ok(())
    }

    async fn list(
        &self,
        operation: &str,
        request: PageRequest,
        max_pages: Option<u32>,
    ) -> Result<()> {
        let config = self.load_config()?;
        let executor: Arc<dyn RequestExecutor> = Arc::new(config.build_executor()?);
        let mut pages = PageCursorIterator::<JsonValue>::new(executor, operation, request)?;

        let start = Instant::now();
        let mut items = 0usize;

        while pages.has_next() {
            if max_pages.is_some_and(|max| pages.pages_fetched() >= max) {
                info!("Stopping after {} pages (--max-pages)", pages.pages_fetched());
                break;
            }
            for item in pages.next_page().await? {
                self.output(&item);
                items += 1;
            }
        }

        let total = pages
            .last_page_meta()
            .and_then(|meta| meta.total_count)
            .map_or_else(|| "?".to_string(), |count| count.to_string());
        info!(
            "{}: {} items in {} pages (server total: {}) in {:?}",
            operation,
            items,
            pages.pages_fetched(),
            total,
            start.elapsed()
        );

        Ok(())
    }

    fn output(&self, value: &JsonValue) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(value).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
            }
        }
    }
}

/// Base request from CLI arguments
fn build_request(
    params: &[(String, String)],
    path_params: &[(String, String)],
    limit: Option<u32>,
) -> PageRequest {
    let mut request = PageRequest::new();
    for (key, value) in params {
        request = request.filter(key, value);
    }
    for (key, value) in path_params {
        request = request.path_param(key, value);
    }
    if let Some(limit) = limit {
        request = request.limit(limit);
    }
    request
}
