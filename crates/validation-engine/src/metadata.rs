//! Validation metadata
//!
//! Immutable descriptions of what to check on a parameter, a property, or a
//! whole type. Metadata is produced once by discovery (generated code or a
//! registry filled at startup), shared through `Arc`, and only read here.

use crate::custom::ObjectValidator;
use crate::rules::{RuleRef, ValidationRule};
use crate::value::TypeName;
use std::fmt;
use std::sync::Arc;

/// Shape shared by parameters and members
#[derive(Clone)]
pub struct ValueInfo {
    name: String,
    display_name: String,
    is_nullable: bool,
    is_required: bool,
    has_nested_type: bool,
    is_collection: bool,
    rules: Vec<RuleRef>,
}

impl ValueInfo {
    /// New shape with the display name defaulting to `name`
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            is_nullable: false,
            is_required: false,
            has_nested_type: false,
            is_collection: false,
            rules: Vec::new(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// The value (or each item, for collections) may resolve to a `TypeInfo`
    pub fn nested(mut self) -> Self {
        self.has_nested_type = true;
        self
    }

    pub fn collection(mut self) -> Self {
        self.is_collection = true;
        self
    }

    pub fn rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn rule_ref(mut self, rule: RuleRef) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn has_nested_type(&self) -> bool {
        self.has_nested_type
    }

    pub fn is_collection(&self) -> bool {
        self.is_collection
    }

    pub fn rules(&self) -> &[RuleRef] {
        &self.rules
    }
}

impl fmt::Debug for ValueInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueInfo")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("is_nullable", &self.is_nullable)
            .field("is_required", &self.is_required)
            .field("has_nested_type", &self.has_nested_type)
            .field("is_collection", &self.is_collection)
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// A top-level endpoint parameter
#[derive(Debug, Clone)]
pub struct ParameterInfo {
    parameter_type: TypeName,
    info: ValueInfo,
}

impl ParameterInfo {
    pub fn new(parameter_type: impl Into<TypeName>, info: ValueInfo) -> Self {
        Self {
            parameter_type: parameter_type.into(),
            info,
        }
    }

    /// Declared type of the parameter
    pub fn parameter_type(&self) -> &TypeName {
        &self.parameter_type
    }

    pub fn info(&self) -> &ValueInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }
}

/// A property of a validatable type
#[derive(Debug, Clone)]
pub struct MemberInfo {
    declaring_type: TypeName,
    info: ValueInfo,
}

impl MemberInfo {
    pub fn new(declaring_type: impl Into<TypeName>, info: ValueInfo) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            info,
        }
    }

    pub fn declaring_type(&self) -> &TypeName {
        &self.declaring_type
    }

    pub fn info(&self) -> &ValueInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }
}

/// Full validation shape of one type
///
/// `subtypes` holds the related type shapes whose members are checked against
/// the same instance after this type's own members, e.g. the base type of a
/// derived type in a polymorphic hierarchy.
#[derive(Clone)]
pub struct TypeInfo {
    type_name: TypeName,
    members: Vec<MemberInfo>,
    validator: Option<Arc<dyn ObjectValidator>>,
    subtypes: Vec<Arc<TypeInfo>>,
}

impl TypeInfo {
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            members: Vec::new(),
            validator: None,
            subtypes: Vec::new(),
        }
    }

    /// Append a member declared on this type
    pub fn member(mut self, info: ValueInfo) -> Self {
        self.members.push(MemberInfo::new(self.type_name.clone(), info));
        self
    }

    pub fn with_validator(mut self, validator: impl ObjectValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn subtype(mut self, subtype: Arc<TypeInfo>) -> Self {
        self.subtypes.push(subtype);
        self
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    pub fn validator(&self) -> Option<&Arc<dyn ObjectValidator>> {
        self.validator.as_ref()
    }

    pub fn implements_custom_validation(&self) -> bool {
        self.validator.is_some()
    }

    pub fn subtypes(&self) -> &[Arc<TypeInfo>] {
        &self.subtypes
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_name", &self.type_name)
            .field("members", &self.members)
            .field("custom_validation", &self.validator.is_some())
            .field(
                "subtypes",
                &self
                    .subtypes
                    .iter()
                    .map(|s| s.type_name.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
