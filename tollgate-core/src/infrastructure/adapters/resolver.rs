// tollgate-core/src/infrastructure/adapters/resolver.rs

use async_trait::async_trait;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::relation::Relation;
use crate::domain::sql::validate_identifier;
use crate::error::TollgateError;
use crate::ports::{Connector, RelationResolver};

/// Resolves model names through the engine catalog. Bare names land in the
/// default schema.
pub struct CatalogResolver<'a> {
    connector: &'a dyn Connector,
    default_schema: String,
}

impl<'a> CatalogResolver<'a> {
    pub fn new(connector: &'a dyn Connector, default_schema: impl Into<String>) -> Self {
        Self {
            connector,
            default_schema: default_schema.into(),
        }
    }

    fn split<'n>(&'n self, name: &'n str) -> Result<(&'n str, &'n str), TollgateError> {
        let (schema, table) = match name.trim().split_once('.') {
            Some((schema, table)) => (schema, table),
            None => (self.default_schema.as_str(), name.trim()),
        };
        validate_identifier(schema)?;
        validate_identifier(table)?;
        Ok((schema, table))
    }
}

#[async_trait]
impl RelationResolver for CatalogResolver<'_> {
    async fn resolve(&self, name: &str) -> Result<Relation, TollgateError> {
        let (schema, table) = self.split(name)?;
        let columns = self.connector.fetch_columns(schema, table).await?;

        if columns.is_empty() {
            return Err(DomainError::RelationNotFound(format!("{}.{}", schema, table)).into());
        }

        debug!(relation = %format!("{}.{}", schema, table), columns = columns.len(), "Resolved relation");
        Ok(Relation::new(schema, table, columns))
    }
}
