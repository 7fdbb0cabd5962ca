//! Custom object-level validation
//!
//! A type whose validity depends on more than its individual members attaches
//! an [`ObjectValidator`] to its [`crate::TypeInfo`]. The hook runs after the
//! member rules and may suspend, e.g. to consult a service.

use crate::services::Services;
use crate::value::Object;
use async_trait::async_trait;

/// One result yielded by a custom validation hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub message: String,
    pub member_names: Vec<String>,
}

impl ValidationResult {
    /// Error recorded against the object itself
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            member_names: Vec::new(),
        }
    }

    /// Error recorded against each of the named members
    pub fn for_members<I, S>(message: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message: message.into(),
            member_names: members.into_iter().map(Into::into).collect(),
        }
    }

    /// A passing result; carries no message and is never recorded
    pub fn success() -> Self {
        Self::error(String::new())
    }

    pub fn is_success(&self) -> bool {
        self.message.is_empty()
    }
}

/// What a custom validation hook can see of the surrounding validation call
#[derive(Debug, Clone, Copy)]
pub struct ObjectValidationContext<'a> {
    display_name: &'a str,
    member_name: Option<&'a str>,
    path: &'a str,
    services: &'a Services,
}

impl<'a> ObjectValidationContext<'a> {
    pub fn new(
        display_name: &'a str,
        member_name: Option<&'a str>,
        path: &'a str,
        services: &'a Services,
    ) -> Self {
        Self {
            display_name,
            member_name,
            path,
            services,
        }
    }

    /// Display name of the object, its type name for object-level hooks
    pub fn display_name(&self) -> &'a str {
        self.display_name
    }

    pub fn member_name(&self) -> Option<&'a str> {
        self.member_name
    }

    /// Path of the object being validated; empty at the root
    pub fn path(&self) -> &'a str {
        self.path
    }

    pub fn services(&self) -> &'a Services {
        self.services
    }
}

/// Hook implemented by types with custom object-level validation
#[async_trait]
pub trait ObjectValidator: Send + Sync {
    async fn validate(
        &self,
        value: &Object,
        context: &ObjectValidationContext<'_>,
    ) -> Vec<ValidationResult>;
}

/// Synchronous hook built from a closure
pub struct FnObjectValidator<F>(F);

impl<F> FnObjectValidator<F>
where
    F: Fn(&Object, &ObjectValidationContext<'_>) -> Vec<ValidationResult> + Send + Sync,
{
    pub fn new(validate: F) -> Self {
        Self(validate)
    }
}

#[async_trait]
impl<F> ObjectValidator for FnObjectValidator<F>
where
    F: Fn(&Object, &ObjectValidationContext<'_>) -> Vec<ValidationResult> + Send + Sync,
{
    async fn validate(
        &self,
        value: &Object,
        context: &ObjectValidationContext<'_>,
    ) -> Vec<ValidationResult> {
        (self.0)(value, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_constructors() {
        let whole = ValidationResult::error("Dates overlap.");
        assert!(whole.member_names.is_empty());
        assert!(!whole.is_success());

        let scoped = ValidationResult::for_members("Too early.", ["Start", "End"]);
        assert_eq!(scoped.member_names, vec!["Start", "End"]);

        assert!(ValidationResult::success().is_success());
    }

    #[tokio::test]
    async fn test_fn_validator_sees_context() {
        let validator = FnObjectValidator::new(|object: &Object, ctx: &ObjectValidationContext<'_>| {
            vec![ValidationResult::error(format!(
                "{} at '{}' has {} members",
                ctx.display_name(),
                ctx.path(),
                object.len()
            ))]
        });
        let services = Services::new();
        let context = ObjectValidationContext::new("Booking", None, "Bookings[0]", &services);
        let object = Object::new("Booking").with("Start", 1);

        let results = validator.validate(&object, &context).await;
        assert_eq!(results, vec![ValidationResult::error("Booking at 'Bookings[0]' has 1 members")]);
    }
}
