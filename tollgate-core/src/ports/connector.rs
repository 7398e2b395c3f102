// tollgate-core/src/ports/connector.rs

// What the core needs from a SQL engine, without knowing which engine it is.

use crate::domain::tabular::TabularResult;
use crate::error::TollgateError;
use async_trait::async_trait;

pub use crate::domain::relation::ColumnSchema;

#[async_trait]
pub trait Connector: Send + Sync {
    /// Runs a statement and discards any result (DDL, inserts).
    async fn execute(&self, query: &str) -> Result<(), TollgateError>;

    /// Runs a query and returns its result set column by column.
    async fn query(&self, query: &str) -> Result<TabularResult, TollgateError>;

    /// Columns of `schema.table` in ordinal order. Empty when the table does not exist.
    async fn fetch_columns(
        &self,
        schema: &str,
        table_name: &str,
    ) -> Result<Vec<ColumnSchema>, TollgateError>;

    /// Exposes a CSV file as a view named `name`.
    async fn register_source(&self, name: &str, path: &str) -> Result<(), TollgateError>;

    fn engine_name(&self) -> &str;
}
