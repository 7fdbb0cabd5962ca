//! Per-call validation state
//!
//! A [`ValidationContext`] is created fresh for every top-level validation
//! request and threaded by `&mut` through the traversal. It owns the current
//! path prefix, the depth counter and the error map; it is never shared
//! between requests.

use crate::errors::ErrorMap;
use crate::options::ValidationOptions;
use crate::services::Services;
use crate::value::TypeName;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Message recorded at the root path once the error cap is reached
pub const MAX_ERRORS_MESSAGE: &str = "The maximum number of allowed errors has been reached.";

/// Notification emitted each time errors are recorded for a path
#[derive(Debug, Clone, Copy)]
pub struct ValidationErrorEvent<'a> {
    /// Member, parameter or type the errors belong to
    pub name: &'a str,
    pub path: &'a str,
    pub errors: &'a [String],
    /// Type declaring the member, `None` for top-level parameters
    pub container_type: Option<&'a TypeName>,
}

type ErrorObserver = Box<dyn Fn(&ValidationErrorEvent<'_>) + Send + Sync>;

pub struct ValidationContext {
    options: Arc<ValidationOptions>,
    services: Services,
    pub(crate) prefix: String,
    pub(crate) depth: usize,
    errors: Option<ErrorMap>,
    observer: Option<ErrorObserver>,
}

impl ValidationContext {
    pub fn new(options: Arc<ValidationOptions>) -> Self {
        Self {
            options,
            services: Services::default(),
            prefix: String::new(),
            depth: 0,
            errors: None,
            observer: None,
        }
    }

    /// Ambient services handed to custom object validation
    pub fn with_services(mut self, services: Services) -> Self {
        self.services = services;
        self
    }

    /// Start validation under a path prefix instead of the root
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_error_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&ValidationErrorEvent<'_>) + Send + Sync + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Errors recorded so far; `None` until the first one
    pub fn errors(&self) -> Option<&ErrorMap> {
        self.errors.as_ref()
    }

    pub fn into_errors(self) -> Option<ErrorMap> {
        self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.as_ref().map_or(true, ErrorMap::is_empty)
    }

    /// Record a single message at `path`
    pub fn add_error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        let path = path.into();
        let name = path.clone();
        self.record(&name, path, vec![message.into()], None);
    }

    /// Total messages recorded so far
    pub fn error_count(&self) -> usize {
        self.errors.as_ref().map_or(0, ErrorMap::message_count)
    }

    /// Whether the configured error cap has been hit; nothing further is
    /// recorded or traversed once it has
    pub fn has_reached_max_errors(&self) -> bool {
        self.options
            .max_errors()
            .map_or(false, |max_errors| self.error_count() >= max_errors)
    }

    /// Record a batch of messages at `path` and notify the observer
    ///
    /// With an error cap, the last free slot is taken by
    /// [`MAX_ERRORS_MESSAGE`] at the root path and the rest of the batch is
    /// dropped.
    pub(crate) fn record(
        &mut self,
        name: &str,
        path: String,
        mut messages: Vec<String>,
        container_type: Option<&TypeName>,
    ) {
        if messages.is_empty() || self.has_reached_max_errors() {
            return;
        }

        let mut overflow = false;
        if let Some(max_errors) = self.options.max_errors() {
            let room = max_errors.saturating_sub(1).saturating_sub(self.error_count());
            if messages.len() > room {
                messages.truncate(room);
                overflow = true;
            }
        }

        if !messages.is_empty() {
            self.append(name, path, messages, container_type);
        }

        if overflow {
            warn!(
                "Validation stopped after reaching {} error(s)",
                self.options.max_errors().unwrap_or_default()
            );
            self.append("", String::new(), vec![MAX_ERRORS_MESSAGE.to_string()], None);
        }
    }

    fn append(
        &mut self,
        name: &str,
        path: String,
        messages: Vec<String>,
        container_type: Option<&TypeName>,
    ) {
        if let Some(observer) = &self.observer {
            observer(&ValidationErrorEvent {
                name,
                path: &path,
                errors: &messages,
                container_type,
            });
        }
        self.errors
            .get_or_insert_with(ErrorMap::new)
            .extend(path, messages);
    }

    /// Swap the prefix, returning the previous one for restoration
    pub(crate) fn replace_prefix(&mut self, prefix: String) -> String {
        std::mem::replace(&mut self.prefix, prefix)
    }
}

impl fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("options", &self.options)
            .field("services", &self.services)
            .field("prefix", &self.prefix)
            .field("depth", &self.depth)
            .field("errors", &self.errors)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn context() -> ValidationContext {
        ValidationContext::new(Arc::new(ValidationOptions::default()))
    }

    #[test]
    fn test_error_map_absent_until_first_error() {
        let mut ctx = context();
        assert!(ctx.errors().is_none());
        assert!(ctx.is_valid());

        ctx.add_error("Name", "The Name field is required.");
        assert!(!ctx.is_valid());
        assert_eq!(ctx.errors().unwrap().get("Name").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_batch_is_not_recorded() {
        let mut ctx = context();
        ctx.record("Name", "Name".to_string(), Vec::new(), None);
        assert!(ctx.errors().is_none());
    }

    #[test]
    fn test_observer_sees_each_batch() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut ctx = context().with_error_observer(move |event| {
            sink.lock()
                .unwrap()
                .push((event.path.to_string(), event.errors.len()));
        });

        let owner = TypeName::from("Customer");
        ctx.record(
            "Age",
            "Customer.Age".to_string(),
            vec!["a".into(), "b".into()],
            Some(&owner),
        );
        ctx.add_error("", "Object is inconsistent.");

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![("Customer.Age".to_string(), 2), (String::new(), 1)]
        );
    }

    #[test]
    fn test_error_cap_records_terminal_message() {
        let options = ValidationOptions::default().with_max_errors(3);
        let mut ctx = ValidationContext::new(Arc::new(options));

        ctx.add_error("Name", "a");
        ctx.record(
            "Age",
            "Age".to_string(),
            vec!["b".into(), "c".into(), "d".into()],
            None,
        );
        assert!(ctx.has_reached_max_errors());

        ctx.add_error("Email", "ignored");
        let errors = ctx.into_errors().unwrap();
        let keys: Vec<_> = errors.keys().collect();
        assert_eq!(keys, vec!["Name", "Age", ""]);
        assert_eq!(errors.get("Age").unwrap(), ["b"]);
        assert_eq!(errors.get("").unwrap(), [MAX_ERRORS_MESSAGE]);
        assert_eq!(errors.message_count(), 3);
    }

    #[test]
    fn test_uncapped_context_never_reaches_limit() {
        let mut ctx = context();
        for i in 0..100 {
            ctx.add_error(format!("Items[{}]", i), "bad");
        }
        assert!(!ctx.has_reached_max_errors());
        assert_eq!(ctx.error_count(), 100);
    }

    #[test]
    fn test_replace_prefix_round_trip() {
        let mut ctx = context().with_prefix("order");
        let previous = ctx.replace_prefix("order.Items[0]".to_string());
        assert_eq!(ctx.prefix(), "order.Items[0]");
        ctx.replace_prefix(previous);
        assert_eq!(ctx.prefix(), "order");
    }
}
