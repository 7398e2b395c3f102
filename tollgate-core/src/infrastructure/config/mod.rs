pub mod project;
pub mod suite;

pub use project::{LoggingConfig, PROJECT_FILES, ProjectConfig, load_project_config};
pub use suite::{ModelSuite, SuiteFile, discover_suites, load_suite_file};
