// Hand-written connector double shared by the application tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::relation::ColumnSchema;
use crate::domain::tabular::TabularResult;
use crate::error::TollgateError;
use crate::ports::connector::Connector;

#[derive(Clone, Default)]
pub struct MockConnector {
    pub executed_queries: Arc<Mutex<Vec<String>>>,
    responses: Vec<(String, TabularResult)>,
    tables: HashMap<String, Vec<ColumnSchema>>,
}

#[allow(dead_code)]
impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any query containing `needle` returns `result`. First match wins.
    pub fn with_response(mut self, needle: &str, result: TabularResult) -> Self {
        self.responses.push((needle.to_string(), result));
        self
    }

    pub fn with_table(mut self, schema: &str, table: &str, columns: &[&str]) -> Self {
        let cols = columns
            .iter()
            .map(|c| ColumnSchema::new(*c, "VARCHAR", true))
            .collect();
        self.tables.insert(format!("{}.{}", schema, table), cols);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.executed_queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn execute(&self, query: &str) -> Result<(), TollgateError> {
        if let Ok(mut q) = self.executed_queries.lock() {
            q.push(query.to_string());
        }
        Ok(())
    }

    async fn query(&self, query: &str) -> Result<TabularResult, TollgateError> {
        if let Ok(mut q) = self.executed_queries.lock() {
            q.push(query.to_string());
        }
        let hit = self
            .responses
            .iter()
            .find(|(needle, _)| query.contains(needle.as_str()))
            .map(|(_, result)| result.clone());
        hit.ok_or_else(|| TollgateError::InternalError(format!("no mock response for: {}", query)))
    }

    async fn fetch_columns(
        &self,
        schema: &str,
        table_name: &str,
    ) -> Result<Vec<ColumnSchema>, TollgateError> {
        Ok(self
            .tables
            .get(&format!("{}.{}", schema, table_name))
            .cloned()
            .unwrap_or_default())
    }

    async fn register_source(&self, name: &str, path: &str) -> Result<(), TollgateError> {
        self.execute(&format!("REGISTER {} {}", name, path)).await
    }

    fn engine_name(&self) -> &str {
        "mock"
    }
}
