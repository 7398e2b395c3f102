// tollgate-core/src/infrastructure/adapters/mod.rs

pub mod duckdb;
pub mod resolver;

pub use self::duckdb::DuckDBConnector;
pub use resolver::CatalogResolver;
