// tollgate-core/src/application/mod.rs

pub mod clean;
pub mod engine;
pub mod ports;
pub mod quality;
pub mod report;
pub mod suite;
pub mod validation;

#[cfg(test)]
mod mock;

// --- RE-EXPORTS (FACADE) ---
// `use tollgate_core::application::{run_suite, run_validation, Reporter};`

pub use clean::clean_project;
pub use engine::execute_query;
pub use quality::run_quality_checks;
pub use report::{ReportLevel, ReportLine, Reporter};
pub use suite::{ModelOutcome, OutcomeStatus, RunResults, SuiteRun, ValidationOutcome, register_sources, run_suite};
pub use validation::{ValidationContext, compile_validation, run_validation};
