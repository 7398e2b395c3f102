// tollgate-core/src/infrastructure/compiler/jinja.rs

// Turns templated expressions ({{ ref() }}, {{ source() }}, macros) into SQL
// the engine can run.

use minijinja::Environment;

use crate::application::ports::TemplateEngine;
use crate::domain::macros;
use crate::domain::sql::quote_ident;
use crate::error::TollgateError;
use crate::infrastructure::error::InfrastructureError;

pub struct JinjaRenderer {
    env: Environment<'static>,
}

impl JinjaRenderer {
    pub fn new(target_schema: impl Into<String>) -> Self {
        let target_schema = target_schema.into();
        let mut env = Environment::new();

        // source('shop', 'orders') -> "shop_orders", the view name of a registered source
        env.add_function("source", |domain: String, name: String| -> String {
            quote_ident(&format!("{}_{}", domain, name))
        });

        let ref_schema = target_schema.clone();
        env.add_function("ref", move |model: String| -> String {
            match model.split_once('.') {
                Some((schema, table)) => format!("{}.{}", quote_ident(schema), quote_ident(table)),
                None => format!("{}.{}", quote_ident(&ref_schema), quote_ident(&model)),
            }
        });

        env.add_function(
            "cents_to_dollars",
            |column: String, scale: Option<u32>| -> String {
                macros::cents_to_dollars(&column, scale.unwrap_or(2))
            },
        );

        env.add_function(
            "generate_schema_name",
            move |custom: Option<String>| -> String {
                macros::generate_schema_name(custom.as_deref(), &target_schema)
            },
        );

        Self { env }
    }

    pub fn render_str(&self, template: &str) -> Result<String, InfrastructureError> {
        Ok(self.env.render_str(template, ())?)
    }
}

impl Default for JinjaRenderer {
    fn default() -> Self {
        Self::new("main")
    }
}

impl TemplateEngine for JinjaRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, TollgateError> {
        self.env
            .render_str(template, context)
            .map_err(|e| TollgateError::Infrastructure(InfrastructureError::TemplateError(e)))
    }
}
