//! Traversal engine
//!
//! Depth-first walk over parameters, members, nested objects and collection
//! items. Every data problem lands in the context's error map; the only
//! failure that aborts the walk is exceeding the configured maximum depth.
//!
//! Traversal order for one object:
//!
//! 1. members, in declaration order (rules, then nested objects/items)
//! 2. the type's custom validation hook, if any
//! 3. members of each attached subtype, against the same instance
//!
//! Once the context's error cap is reached, every remaining step is skipped.

use crate::context::ValidationContext;
use crate::custom::{ObjectValidationContext, ObjectValidator};
use crate::error::{Result, ValidationError};
use crate::metadata::{MemberInfo, ParameterInfo, TypeInfo, ValueInfo};
use crate::path::{item_path, member_path};
use crate::resolver::ParameterDescriptor;
use crate::rules::required_message;
use crate::value::{Object, TypeName, Value};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, trace, warn};

/// Boxed future used where the traversal recurses
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

impl ParameterInfo {
    /// Validate the value bound to this parameter
    pub async fn validate(&self, value: &Value, context: &mut ValidationContext) -> Result<()> {
        let path = member_path(context.prefix(), self.name());
        validate_value(self.info(), None, path, value, context).await
    }
}

impl MemberInfo {
    /// Validate the value this member holds on its containing object
    pub async fn validate(&self, value: &Value, context: &mut ValidationContext) -> Result<()> {
        let path = member_path(context.prefix(), self.name());
        validate_value(self.info(), Some(self.declaring_type()), path, value, context).await
    }
}

impl TypeInfo {
    /// Validate an instance of this type at the context's current prefix
    ///
    /// Null values and non-object values pass without errors.
    pub fn validate<'a>(
        &'a self,
        value: &'a Value,
        context: &'a mut ValidationContext,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let Some(object) = value.as_object() else {
                return Ok(());
            };
            if context.has_reached_max_errors() {
                return Ok(());
            }

            context.depth += 1;
            let max_depth = context.options().max_depth();
            if context.depth > max_depth {
                warn!(
                    "Validation depth {} exceeded at '{}' in {}",
                    max_depth,
                    context.prefix(),
                    self.type_name()
                );
                return Err(ValidationError::MaxDepthExceeded {
                    max_depth,
                    path: context.prefix().to_string(),
                    type_name: self.type_name().clone(),
                });
            }

            trace!(
                "Validating {} at '{}' (depth {})",
                self.type_name(),
                context.prefix(),
                context.depth
            );

            self.validate_members(object, context).await?;

            if let Some(validator) = self.validator() {
                if !context.has_reached_max_errors() {
                    self.validate_object(&**validator, object, context).await;
                }
            }

            for subtype in self.subtypes() {
                subtype.validate_members(object, context).await?;
            }

            context.depth -= 1;
            Ok(())
        })
    }

    async fn validate_members(&self, object: &Object, context: &mut ValidationContext) -> Result<()> {
        for member in self.members() {
            member.validate(object.member(member.name()), context).await?;
        }
        Ok(())
    }

    async fn validate_object(
        &self,
        validator: &dyn ObjectValidator,
        object: &Object,
        context: &mut ValidationContext,
    ) {
        let results = {
            let hook_context = ObjectValidationContext::new(
                self.type_name().as_str(),
                None,
                context.prefix(),
                context.services(),
            );
            validator.validate(object, &hook_context).await
        };

        for result in results {
            if result.is_success() {
                continue;
            }
            if result.member_names.is_empty() {
                let path = context.prefix().to_string();
                context.record(self.type_name().as_str(), path, vec![result.message], None);
                continue;
            }
            for member in &result.member_names {
                let path = member_path(context.prefix(), member);
                context.record(
                    member,
                    path,
                    vec![result.message.clone()],
                    Some(self.type_name()),
                );
            }
        }
    }
}

impl ValidationContext {
    /// Resolve and validate every bound endpoint argument at the root prefix
    ///
    /// Arguments whose parameter does not resolve through the chain are not
    /// validatable and are skipped.
    pub async fn validate_arguments(&mut self, arguments: &[(ParameterDescriptor, Value)]) -> Result<()> {
        for (descriptor, value) in arguments {
            let Some(parameter) = self.options().resolve_parameter(descriptor) else {
                debug!(
                    "No validation metadata for parameter '{}' of {}",
                    descriptor.name, descriptor.endpoint
                );
                continue;
            };
            parameter.validate(value, self).await?;
        }

        debug!(
            "Validated {} argument(s): {} path(s) with errors",
            arguments.len(),
            self.errors().map_or(0, |errors| errors.len())
        );
        Ok(())
    }
}

/// Required check, rule loop, then descent into nested objects or items
async fn validate_value(
    info: &ValueInfo,
    container: Option<&TypeName>,
    path: String,
    value: &Value,
    context: &mut ValidationContext,
) -> Result<()> {
    if context.has_reached_max_errors() {
        return Ok(());
    }

    if value.is_null() {
        if info.is_required() {
            let message = required_message(info.display_name());
            context.record(info.name(), path, vec![message], container);
        }
        return Ok(());
    }

    let messages = run_rules(info, value);
    if !messages.is_empty() {
        context.record(info.name(), path.clone(), messages, container);
    }

    if !info.has_nested_type() {
        return Ok(());
    }

    if info.is_collection() {
        if let Some(items) = value.as_list() {
            for (index, item) in items.iter().enumerate() {
                if context.has_reached_max_errors() {
                    break;
                }
                if item.is_null() {
                    continue;
                }
                validate_nested(item, item_path(&path, index), context).await?;
            }
        }
        return Ok(());
    }

    validate_nested(value, path, context).await
}

/// Dispatch on the runtime type and validate under `path`
async fn validate_nested(value: &Value, path: String, context: &mut ValidationContext) -> Result<()> {
    let Some(type_name) = value.type_name() else {
        return Ok(());
    };
    let Some(type_info) = context.options().resolve_type(type_name) else {
        debug!("No validation metadata for type {} at '{}'", type_name, path);
        return Ok(());
    };

    let previous = context.replace_prefix(path);
    type_info.validate(value, context).await?;
    context.replace_prefix(previous);
    Ok(())
}

fn run_rules(info: &ValueInfo, value: &Value) -> Vec<String> {
    let mut messages = Vec::new();
    for rule in info.rules() {
        match rule.is_satisfied_by(value) {
            Ok(true) => {}
            Ok(false) => messages.push(rule.format_message(info.display_name())),
            Err(err) => {
                debug!("Rule on '{}' failed to evaluate: {}", info.name(), err);
                messages.push(err.to_string());
            }
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ValidationOptions;
    use crate::resolver::MetadataRegistry;
    use crate::rules::FnRule;
    use std::sync::Arc;

    fn context_with(registry: MetadataRegistry) -> ValidationContext {
        ValidationContext::new(Arc::new(ValidationOptions::new().with_resolver(registry)))
    }

    #[tokio::test]
    async fn test_optional_null_skips_rules() {
        let parameter = ParameterInfo::new(
            "String",
            ValueInfo::new("nickname").rule(FnRule::new("never", |_: &Value| Ok(false))),
        );
        let mut ctx = context_with(MetadataRegistry::new());
        parameter.validate(&Value::Null, &mut ctx).await.unwrap();
        assert!(ctx.errors().is_none());
    }

    #[tokio::test]
    async fn test_rule_error_is_recorded_and_loop_continues() {
        let parameter = ParameterInfo::new(
            "Int32",
            ValueInfo::new("quantity")
                .rule(FnRule::new("unused", |_: &Value| -> anyhow::Result<bool> {
                    anyhow::bail!("rate service unavailable")
                }))
                .rule(FnRule::new("{0} must be even.", |v: &Value| {
                    Ok(v.as_i64().map_or(true, |n| n % 2 == 0))
                })),
        );
        let mut ctx = context_with(MetadataRegistry::new());
        parameter.validate(&Value::from(3), &mut ctx).await.unwrap();

        let errors = ctx.into_errors().unwrap();
        assert_eq!(
            errors.get("quantity").unwrap(),
            ["rate service unavailable", "quantity must be even."]
        );
    }

    #[tokio::test]
    async fn test_depth_restored_after_nested_call() {
        let registry = MetadataRegistry::new();
        registry.register_type(TypeInfo::new("Address").member(ValueInfo::new("City").required()));
        let parameter = ParameterInfo::new("Address", ValueInfo::new("address").nested());
        let mut ctx = context_with(registry);

        parameter
            .validate(&Value::from(Object::new("Address")), &mut ctx)
            .await
            .unwrap();

        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.prefix(), "");
        assert!(ctx.errors().unwrap().contains_key("address.City"));
    }

    #[tokio::test]
    async fn test_non_object_value_passes_type_validation() {
        let type_info = TypeInfo::new("Address").member(ValueInfo::new("City").required());
        let mut ctx = context_with(MetadataRegistry::new());
        type_info.validate(&Value::from("not an object"), &mut ctx).await.unwrap();
        type_info.validate(&Value::Null, &mut ctx).await.unwrap();
        assert!(ctx.errors().is_none());
        assert_eq!(ctx.depth(), 0);
    }

    #[tokio::test]
    async fn test_unresolved_nested_type_is_skipped() {
        let parameter = ParameterInfo::new("Blob", ValueInfo::new("payload").nested());
        let mut ctx = context_with(MetadataRegistry::new());
        parameter
            .validate(&Value::from(Object::new("Blob")), &mut ctx)
            .await
            .unwrap();
        assert!(ctx.errors().is_none());
    }
}
