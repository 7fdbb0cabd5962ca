//! Recursive object-graph validation
//!
//! Walks bound endpoint arguments through resolved metadata, applying
//! required checks, member rules, custom object hooks and polymorphic
//! subtype members, and collects every problem into a path-keyed
//! [`ErrorMap`].
//!
//! ```ignore
//! let registry = MetadataRegistry::new();
//! registry.register_type(TypeInfo::new("Address").member(ValueInfo::new("City").required()));
//! registry.register_parameter(
//!     "POST /customers",
//!     ParameterInfo::new("Address", ValueInfo::new("address").nested()),
//! );
//!
//! let options = Arc::new(ValidationOptions::new().with_resolver(registry));
//! let mut context = ValidationContext::new(options);
//! context.validate_arguments(&arguments).await?;
//! if let Some(errors) = context.into_errors() {
//!     // 400 with the error map
//! }
//! ```

pub mod config;
pub mod context;
pub mod custom;
pub mod engine;
pub mod error;
pub mod errors;
pub mod metadata;
pub mod options;
pub mod path;
pub mod resolver;
pub mod rules;
pub mod services;
pub mod value;

pub use config::{ConfigError, ValidationSettings};
pub use context::{ValidationContext, ValidationErrorEvent, MAX_ERRORS_MESSAGE};
pub use custom::{FnObjectValidator, ObjectValidationContext, ObjectValidator, ValidationResult};
pub use error::{Result, ValidationError};
pub use errors::ErrorMap;
pub use metadata::{MemberInfo, ParameterInfo, TypeInfo, ValueInfo};
pub use options::ValidationOptions;
pub use resolver::{CachingResolver, FnResolver, InfoResolver, MetadataRegistry, ParameterDescriptor};
pub use rules::{required_message, FnRule, RuleRef, ValidationRule};
pub use services::Services;
pub use value::{Object, TypeName, Value};
