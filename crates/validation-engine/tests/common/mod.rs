// Shared fixtures for the integration tests
#![allow(dead_code)]

use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use validation_engine::{
    MetadataRegistry, TypeInfo, ValidationContext, ValidationOptions, ValidationRule, Value,
    ValueInfo,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Inclusive numeric range with a fixed message
pub struct Range {
    pub min: f64,
    pub max: f64,
    pub message: &'static str,
}

impl Range {
    pub fn new(min: f64, max: f64, message: &'static str) -> Self {
        Self { min, max, message }
    }
}

impl ValidationRule for Range {
    fn is_satisfied_by(&self, value: &Value) -> anyhow::Result<bool> {
        match value.as_f64() {
            Some(n) => Ok(n >= self.min && n <= self.max),
            None => anyhow::bail!("Range cannot be applied to a non-numeric value."),
        }
    }

    fn format_message(&self, _display_name: &str) -> String {
        self.message.to_string()
    }
}

pub fn context(registry: MetadataRegistry) -> ValidationContext {
    ValidationContext::new(options(registry, 32))
}

pub fn options(registry: MetadataRegistry, max_depth: usize) -> Arc<ValidationOptions> {
    Arc::new(
        ValidationOptions::new()
            .with_resolver(registry)
            .with_max_depth(max_depth),
    )
}

/// `TreeNode { Children: [TreeNode], Parent: TreeNode }`
pub fn tree_node_type() -> TypeInfo {
    TypeInfo::new("TreeNode")
        .member(ValueInfo::new("Children").nested().collection())
        .member(ValueInfo::new("Parent").nested())
}
