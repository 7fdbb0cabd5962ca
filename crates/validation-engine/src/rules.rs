//! Rule capability consumed by the traversal engine
//!
//! Concrete rules (range, length, patterns, ...) live with whatever discovers
//! the metadata. The engine only needs a predicate and a message formatter.

use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A single declarative check attached to a member or parameter
pub trait ValidationRule: Send + Sync {
    /// Evaluate the rule. An `Err` is recorded as a validation message and
    /// does not stop the remaining rules.
    fn is_satisfied_by(&self, value: &Value) -> anyhow::Result<bool>;

    /// Message recorded when the rule is not satisfied
    fn format_message(&self, display_name: &str) -> String;
}

/// Shared handle to a rule, as stored in metadata
pub type RuleRef = Arc<dyn ValidationRule>;

/// Message recorded for a null value bound to a required member or parameter
pub fn required_message(display_name: &str) -> String {
    format!("The {} field is required.", display_name)
}

/// Rule built from a closure and a message template
///
/// `{0}` in the template is replaced by the display name of the member.
pub struct FnRule<F> {
    message: String,
    predicate: F,
}

impl<F> FnRule<F>
where
    F: Fn(&Value) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    pub fn new(message: impl Into<String>, predicate: F) -> Self {
        Self {
            message: message.into(),
            predicate,
        }
    }

    /// Wrap into the shared form stored by metadata
    pub fn into_ref(self) -> RuleRef {
        Arc::new(self)
    }
}

impl<F> ValidationRule for FnRule<F>
where
    F: Fn(&Value) -> anyhow::Result<bool> + Send + Sync,
{
    fn is_satisfied_by(&self, value: &Value) -> anyhow::Result<bool> {
        (self.predicate)(value)
    }

    fn format_message(&self, display_name: &str) -> String {
        self.message.replace("{0}", display_name)
    }
}

impl<F> fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_message() {
        assert_eq!(required_message("Last name"), "The Last name field is required.");
    }

    #[test]
    fn test_fn_rule_formats_display_name() {
        let rule = FnRule::new("{0} must be positive.", |value: &Value| {
            Ok(value.as_i64().map_or(true, |n| n > 0))
        });
        assert!(!rule.is_satisfied_by(&Value::from(-1)).unwrap());
        assert!(rule.is_satisfied_by(&Value::from(3)).unwrap());
        assert_eq!(rule.format_message("Quantity"), "Quantity must be positive.");
    }

    #[test]
    fn test_fn_rule_propagates_failure() {
        let rule = FnRule::new("unused", |_: &Value| -> anyhow::Result<bool> {
            anyhow::bail!("lookup failed")
        });
        let err = rule.is_satisfied_by(&Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "lookup failed");
    }
}
