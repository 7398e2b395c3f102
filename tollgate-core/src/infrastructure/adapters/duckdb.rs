// tollgate-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate};
use duckdb::types::{TimeUnit, Value};
use duckdb::{Config, Connection, params};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::sql::{quote_ident, quote_literal};
use crate::domain::tabular::{ScalarValue, TabularColumn, TabularResult};
use crate::error::TollgateError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::{ColumnSchema, Connector};

pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, InfrastructureError> {
        Self::new(":memory:")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, TollgateError> {
        self.conn
            .lock()
            .map_err(|_| InfrastructureError::Database(DatabaseError::Poisoned).into())
    }
}

fn db_err(e: duckdb::Error) -> TollgateError {
    TollgateError::Infrastructure(InfrastructureError::from(e))
}

fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(Duration::days(i64::from(days)))
}

/// Maps an engine value onto the small scalar set the core understands.
fn to_scalar(value: Value) -> ScalarValue {
    match value {
        Value::Null => ScalarValue::Null,
        Value::Boolean(b) => ScalarValue::Boolean(b),
        Value::TinyInt(v) => ScalarValue::Integer(i64::from(v)),
        Value::SmallInt(v) => ScalarValue::Integer(i64::from(v)),
        Value::Int(v) => ScalarValue::Integer(i64::from(v)),
        Value::BigInt(v) => ScalarValue::Integer(v),
        Value::UTinyInt(v) => ScalarValue::Integer(i64::from(v)),
        Value::USmallInt(v) => ScalarValue::Integer(i64::from(v)),
        Value::UInt(v) => ScalarValue::Integer(i64::from(v)),
        Value::UBigInt(v) => i64::try_from(v)
            .map(ScalarValue::Integer)
            .unwrap_or(ScalarValue::Float(v as f64)),
        Value::HugeInt(v) => i64::try_from(v)
            .map(ScalarValue::Integer)
            .unwrap_or(ScalarValue::Float(v as f64)),
        Value::Float(v) => ScalarValue::Float(f64::from(v)),
        Value::Double(v) => ScalarValue::Float(v),
        Value::Decimal(d) => {
            let text = d.to_string();
            text.parse::<f64>()
                .map(ScalarValue::Float)
                .unwrap_or(ScalarValue::Text(text))
        }
        Value::Text(s) | Value::Enum(s) => ScalarValue::Text(s),
        Value::Date32(days) => match date_from_days(days) {
            Some(d) => ScalarValue::Text(d.format("%Y-%m-%d").to_string()),
            None => ScalarValue::Integer(i64::from(days)),
        },
        Value::Timestamp(unit, raw) => {
            let micros = match unit {
                TimeUnit::Second => raw.saturating_mul(1_000_000),
                TimeUnit::Millisecond => raw.saturating_mul(1_000),
                TimeUnit::Microsecond => raw,
                TimeUnit::Nanosecond => raw / 1_000,
            };
            match DateTime::from_timestamp_micros(micros) {
                Some(ts) => ScalarValue::Text(ts.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string()),
                None => ScalarValue::Integer(raw),
            }
        }
        other => ScalarValue::Text(format!("{:?}", other)),
    }
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn execute(&self, query: &str) -> Result<(), TollgateError> {
        let conn = self.lock()?;
        conn.execute_batch(query).map_err(db_err)
    }

    async fn query(&self, query: &str) -> Result<TabularResult, TollgateError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query).map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        let names: Vec<String> = rows
            .as_ref()
            .map(|s| s.column_names())
            .unwrap_or_default();
        let mut data: Vec<Vec<ScalarValue>> = Vec::new();

        while let Some(row) = rows.next().map_err(db_err)? {
            let mut values = Vec::with_capacity(names.len());
            for i in 0..names.len() {
                let value: Value = row.get(i).map_err(db_err)?;
                values.push(to_scalar(value));
            }
            data.push(values);
        }

        Ok(TabularResult::from_rows(names, data))
    }

    async fn fetch_columns(
        &self,
        schema: &str,
        table_name: &str,
    ) -> Result<Vec<ColumnSchema>, TollgateError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT column_name, data_type, is_nullable \
                 FROM information_schema.columns \
                 WHERE table_schema = ? AND table_name = ? \
                 ORDER BY ordinal_position",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![schema, table_name], |row| {
                let nullable: String = row.get(2)?;
                Ok(ColumnSchema {
                    name: row.get(0)?,
                    data_type: row.get(1)?,
                    is_nullable: nullable.eq_ignore_ascii_case("YES"),
                })
            })
            .map_err(db_err)?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row.map_err(db_err)?);
        }
        Ok(columns)
    }

    async fn register_source(&self, name: &str, path: &str) -> Result<(), TollgateError> {
        let query = format!(
            "CREATE OR REPLACE VIEW {} AS SELECT * FROM read_csv_auto({})",
            quote_ident(name),
            quote_literal(path)
        );
        self.execute(&query).await
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[tokio::test]
    async fn test_duckdb_flow() -> Result<()> {
        let connector = DuckDBConnector::in_memory()?;
        connector
            .execute("CREATE TABLE users (id INTEGER NOT NULL, name VARCHAR)")
            .await?;

        let columns = connector.fetch_columns("main", "users").await?;
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "id");
        assert_eq!(columns[0].data_type, "INTEGER");
        assert!(!columns[0].is_nullable);
        assert!(columns[1].is_nullable);

        assert!(connector.fetch_columns("main", "missing").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_query_maps_values() -> Result<()> {
        let connector = DuckDBConnector::in_memory()?;
        let result = connector
            .query(
                "SELECT 1 AS i, 2.5::DOUBLE AS f, 'x' AS t, NULL AS n, TRUE AS b, \
                 DATE '2024-03-01' AS d, 12.50::DECIMAL(10,2) AS m",
            )
            .await?;

        assert_eq!(result.column_names(), vec!["i", "f", "t", "n", "b", "d", "m"]);
        assert_eq!(
            result.row(0),
            vec![
                ScalarValue::Integer(1),
                ScalarValue::Float(2.5),
                ScalarValue::Text("x".into()),
                ScalarValue::Null,
                ScalarValue::Boolean(true),
                ScalarValue::Text("2024-03-01".into()),
                ScalarValue::Float(12.5),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_duckdb_error() -> Result<()> {
        let connector = DuckDBConnector::in_memory()?;
        let result = connector.query("SELECT * FROM non_existent_table").await;
        assert!(result.is_err());
        Ok(())
    }
}
