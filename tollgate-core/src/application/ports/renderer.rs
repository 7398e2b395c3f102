use crate::error::TollgateError;

/// Renders templated rule parameters (`{{ ref('orders') }}`) into plain SQL.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, TollgateError>;
}
