// tollgate-core/src/domain/quality/mod.rs

pub mod check;
pub mod config;
pub mod policy;
pub mod queries;
pub mod summary;

pub use check::{CheckKind, CheckResult, CheckStatus, Finding};
pub use config::{DEFAULT_NULL_THRESHOLD_PCT, QualityCheckConfig};
pub use policy::{DateSpan, EMPTY_TABLE};
pub use summary::{QualityRun, QualityRunSummary, success_rate};
