// tollgate-core/src/lib.rs

#![allow(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports: contracts towards the SQL engine and the catalog.
pub mod ports;

// 2. Domain: rule catalog, rule engine, quality-check model, macros.
// Depends on nothing but itself.
pub mod domain;

// 3. Infrastructure: DuckDB, YAML config, Jinja, filesystem.
pub mod infrastructure;

// 4. Application: validation runner, quality aggregator, reporter, suites.
pub mod application;

pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::TollgateError;
