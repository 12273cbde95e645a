use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tera::{Context, Tera};

use crate::error::{BidStackError, Result};

/// Template engine for configured strings such as the export filename
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    tera: Arc<RwLock<Tera>>,
}

impl TemplateEngine {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tera: Arc::new(RwLock::new(Tera::default())),
        })
    }

    /// Render a template string with the given context
    pub fn render_string(&self, template: &str, context: &TemplateContext) -> Result<String> {
        let tera_context = context.to_tera_context();

        // render_str needs &mut Tera; the lock is only held while rendering
        let mut tera = self.tera.write().map_err(|e| {
            BidStackError::Template(format!("Failed to acquire template lock: {}", e))
        })?;

        tera.render_str(template, &tera_context)
            .map_err(|e| BidStackError::Template(format!("Template rendering error: {}", e)))
    }

    /// Render the export filename template with a `YYYYMMDD_HHMMSS` timestamp
    pub fn render_filename(&self, template: &str, timestamp: &str) -> Result<String> {
        if !Self::is_template(template) {
            return Ok(template.to_string());
        }

        let ctx = TemplateContext::new().with_var("timestamp", Value::String(timestamp.into()));
        let rendered = self.render_string(template, &ctx)?;
        let rendered = rendered.trim().to_string();

        if rendered.is_empty() {
            return Err(BidStackError::Template(
                "Filename template rendered to an empty string".to_string(),
            ));
        }

        Ok(rendered)
    }

    /// Check if a string contains template syntax
    pub fn is_template(s: &str) -> bool {
        s.contains("{{") && s.contains("}}")
    }
}

/// Context for template rendering
#[derive(Debug, Clone)]
pub struct TemplateContext {
    vars: HashMap<String, Value>,
    /// Environment variables (loaded from system environment)
    env: HashMap<String, Value>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
            env: Self::load_env_vars(),
        }
    }

    /// Load environment variables from the system
    fn load_env_vars() -> HashMap<String, Value> {
        std::env::vars()
            .map(|(k, v)| (k, Value::String(v)))
            .collect()
    }

    pub fn with_var(mut self, key: impl Into<String>, value: Value) -> Self {
        self.vars.insert(key.into(), value);
        self
    }

    /// Convert to Tera context
    pub fn to_tera_context(&self) -> Context {
        let mut context = Context::new();

        // Add environment variables (first, so they can be overridden)
        context.insert("env", &self.env);

        for (key, value) in &self.vars {
            context.insert(key, value);
        }

        context
    }
}

impl Default for TemplateContext {
    fn default() -> Self {
        Self::new()
    }
}
