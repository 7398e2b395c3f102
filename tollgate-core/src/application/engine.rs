// tollgate-core/src/application/engine.rs

use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::domain::tabular::TabularResult;
use crate::error::TollgateError;
use crate::ports::connector::Connector;

/// Runs one query through the port with debug logging and timing.
/// Executor failures are logged and passed through untouched.
#[instrument(skip(connector, query), fields(engine = connector.engine_name(), query.len = query.len()))]
pub async fn execute_query(
    connector: &dyn Connector,
    query: &str,
) -> Result<TabularResult, TollgateError> {
    let start = Instant::now();
    debug!("Executing query: {}", query);

    let result = connector.query(query).await;
    let duration = start.elapsed();

    match result {
        Ok(table) => {
            debug!(rows = table.row_count(), "Query finished in {:.2?}", duration);
            Ok(table)
        }
        Err(e) => {
            error!("Query failed after {:.2?}: {}", duration, e);
            Err(e)
        }
    }
}
