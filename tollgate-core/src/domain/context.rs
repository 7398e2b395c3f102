// tollgate-core/src/domain/context.rs

use chrono::{Local, NaiveDate};

/// Environments that get per-check narration unless told otherwise.
pub const DEFAULT_VERBOSE_ENVIRONMENTS: &[&str] = &["dev", "ci"];

/// Everything a run needs to know about where and how it executes.
/// Passed explicitly to the runner, the aggregator and the reporter.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    environment: String,
    verbose: bool,
    executing: bool,
    today: NaiveDate,
    target_schema: String,
}

impl ExecutionContext {
    pub fn new(environment: impl Into<String>) -> Self {
        let environment = environment.into();
        let verbose = DEFAULT_VERBOSE_ENVIRONMENTS
            .iter()
            .any(|env| env.eq_ignore_ascii_case(&environment));
        Self {
            environment,
            verbose,
            executing: true,
            today: Local::now().date_naive(),
            target_schema: "main".to_string(),
        }
    }

    /// Recomputes verbosity from a custom list of environment names.
    pub fn with_verbose_environments(mut self, environments: &[String]) -> Self {
        self.verbose = environments
            .iter()
            .any(|env| env.eq_ignore_ascii_case(&self.environment));
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_executing(mut self, executing: bool) -> Self {
        self.executing = executing;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_target_schema(mut self, schema: impl Into<String>) -> Self {
        self.target_schema = schema.into();
        self
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// False during dry runs: queries are built but never sent.
    pub fn is_executing(&self) -> bool {
        self.executing
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn target_schema(&self) -> &str {
        &self.target_schema
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new("dev")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_follows_environment() {
        assert!(ExecutionContext::new("dev").is_verbose());
        assert!(ExecutionContext::new("CI").is_verbose());
        assert!(!ExecutionContext::new("prod").is_verbose());
    }

    #[test]
    fn test_custom_verbose_environments() {
        let ctx = ExecutionContext::new("staging")
            .with_verbose_environments(&["staging".to_string()]);
        assert!(ctx.is_verbose());

        let ctx = ExecutionContext::new("dev").with_verbose_environments(&[]);
        assert!(!ctx.is_verbose());
    }

    #[test]
    fn test_explicit_override_wins() {
        let ctx = ExecutionContext::new("prod").with_verbose(true);
        assert!(ctx.is_verbose());
        assert!(ctx.is_executing());
        assert!(!ctx.with_executing(false).is_executing());
    }
}
