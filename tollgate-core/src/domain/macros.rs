// tollgate-core/src/domain/macros.rs

// Reusable SQL macros shared by templates and validations.

/// Schema a model lands in. Without a custom schema the target schema is
/// used as is; otherwise the custom name is appended: `analytics_staging`.
pub fn generate_schema_name(custom_schema: Option<&str>, target_schema: &str) -> String {
    match custom_schema.map(str::trim).filter(|s| !s.is_empty()) {
        Some(custom) => format!("{}_{}", target_schema, custom),
        None => target_schema.to_string(),
    }
}

/// Converts an integer amount in cents into a fixed-scale decimal in dollars.
/// `expr` is inserted verbatim, it may be a column or any expression.
pub fn cents_to_dollars(expr: &str, scale: u32) -> String {
    format!("CAST(({}) / 100 AS DECIMAL(16, {}))", expr, scale)
}
