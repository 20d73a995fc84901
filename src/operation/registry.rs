//! Operation registry
//!
//! Built-in list operations plus any definitions loaded from configuration.

use super::definition::ListOperation;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Built-in list operations
const BUILTIN_OPERATIONS: &str = r#"
- name: list_ingestion_jobs
  path: /ingestion_jobs
  description: Ingestion jobs, newest first
  page:
    items_path: ingestion_jobs
- name: list_bucket_registrations
  path: /bucket_registrations
  description: Registered object-storage buckets
  page:
    items_path: bucket_registrations
- name: list_database_registrations
  path: /database_registrations
  description: Registered databases
  page:
    items_path: database_registrations
- name: list_presto_engines
  path: /presto_engines
  description: Presto engines
  page:
    items_path: presto_engines
- name: list_spark_engines
  path: /spark_engines
  description: Spark engines
  page:
    items_path: spark_engines
- name: list_spark_engine_applications
  path: /spark_engines/{engine_id}/applications
  description: Applications submitted to a Spark engine
  page:
    items_path: applications
- name: list_milvus_services
  path: /milvus_services
  description: Milvus services
  page:
    items_path: milvus_services
"#;

/// Named list operations, ordered by name
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    operations: BTreeMap<String, ListOperation>,
}

impl OperationRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in list operations
    pub fn with_builtins() -> Result<Self> {
        let builtins: Vec<ListOperation> = serde_yaml::from_str(BUILTIN_OPERATIONS)?;
        let mut registry = Self::new();
        registry.extend(builtins)?;
        Ok(registry)
    }

    /// Add an operation, replacing any existing one with the same name
    pub fn register(&mut self, operation: ListOperation) -> Result<()> {
        if operation.name.trim().is_empty() {
            return Err(Error::config("operation name cannot be empty"));
        }
        if operation.path.trim().is_empty() {
            return Err(Error::config(format!(
                "operation '{}' has an empty path",
                operation.name
            )));
        }
        if operation.page.items_path.trim().is_empty() {
            return Err(Error::config(format!(
                "operation '{}' has an empty items_path",
                operation.name
            )));
        }
        self.operations.insert(operation.name.clone(), operation);
        Ok(())
    }

    /// Add several operations
    pub fn extend(&mut self, operations: impl IntoIterator<Item = ListOperation>) -> Result<()> {
        for operation in operations {
            self.register(operation)?;
        }
        Ok(())
    }

    /// Look up an operation by name
    pub fn get(&self, name: &str) -> Option<&ListOperation> {
        self.operations.get(name)
    }

    /// Look up an operation, failing with `InvalidArgument` if unknown
    pub fn require(&self, name: &str) -> Result<&ListOperation> {
        self.get(name).ok_or_else(|| {
            Error::invalid_argument(format!(
                "unknown operation '{name}'. Known operations: {}",
                self.names().join(", ")
            ))
        })
    }

    /// All operation names
    pub fn names(&self) -> Vec<&str> {
        self.operations.keys().map(String::as_str).collect()
    }

    /// All operations, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = &ListOperation> {
        self.operations.values()
    }

    /// Number of registered operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
