// tollgate-core/src/ports/resolver.rs

use crate::domain::relation::Relation;
use crate::error::TollgateError;
use async_trait::async_trait;

/// Maps a logical model name (`orders`, `staging.stg_orders`) to a queryable relation.
#[async_trait]
pub trait RelationResolver: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<Relation, TollgateError>;
}
