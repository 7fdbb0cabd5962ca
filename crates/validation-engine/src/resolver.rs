//! Metadata resolvers
//!
//! Resolvers are chained in [`crate::ValidationOptions`]; the first one that
//! knows a type or parameter wins. Three implementations ship here:
//!
//! 1. [`MetadataRegistry`] - pre-built metadata registered at startup
//! 2. [`CachingResolver`] - memoizes any resolver by type identity
//! 3. [`FnResolver`] - closures, for ad-hoc discovery

use crate::metadata::{ParameterInfo, TypeInfo};
use crate::value::TypeName;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Identifies one parameter of one endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterDescriptor {
    pub endpoint: String,
    pub name: String,
    pub parameter_type: TypeName,
}

impl ParameterDescriptor {
    pub fn new(
        endpoint: impl Into<String>,
        name: impl Into<String>,
        parameter_type: impl Into<TypeName>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            name: name.into(),
            parameter_type: parameter_type.into(),
        }
    }
}

/// Source of validation metadata
pub trait InfoResolver: Send + Sync {
    /// Metadata for a runtime type, `None` if the type is not validatable
    fn resolve_type(&self, type_name: &TypeName) -> Option<Arc<TypeInfo>>;

    /// Metadata for an endpoint parameter, `None` if it is not validatable
    fn resolve_parameter(&self, descriptor: &ParameterDescriptor) -> Option<Arc<ParameterInfo>>;
}

/// Resolver over metadata registered up front
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    types: DashMap<TypeName, Arc<TypeInfo>>,
    parameters: DashMap<ParameterDescriptor, Arc<ParameterInfo>>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, returning the shared handle so it can be attached
    /// as a subtype of other types
    pub fn register_type(&self, type_info: TypeInfo) -> Arc<TypeInfo> {
        let type_info = Arc::new(type_info);
        if self
            .types
            .insert(type_info.type_name().clone(), Arc::clone(&type_info))
            .is_some()
        {
            debug!("Replaced validation metadata for type {}", type_info.type_name());
        }
        type_info
    }

    /// Register a parameter under its endpoint, name and declared type
    pub fn register_parameter(
        &self,
        endpoint: impl Into<String>,
        parameter: ParameterInfo,
    ) -> Arc<ParameterInfo> {
        let parameter = Arc::new(parameter);
        let descriptor = ParameterDescriptor::new(
            endpoint,
            parameter.name(),
            parameter.parameter_type().clone(),
        );
        self.parameters.insert(descriptor, Arc::clone(&parameter));
        parameter
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }
}

impl InfoResolver for MetadataRegistry {
    fn resolve_type(&self, type_name: &TypeName) -> Option<Arc<TypeInfo>> {
        self.types.get(type_name).map(|entry| Arc::clone(entry.value()))
    }

    fn resolve_parameter(&self, descriptor: &ParameterDescriptor) -> Option<Arc<ParameterInfo>> {
        self.parameters
            .get(descriptor)
            .map(|entry| Arc::clone(entry.value()))
    }
}

/// Memoizing wrapper, including negative answers
///
/// The inner resolver is consulted at most once per type or descriptor
/// (barring concurrent first lookups, which may both reach it).
pub struct CachingResolver<R> {
    inner: R,
    types: DashMap<TypeName, Option<Arc<TypeInfo>>>,
    parameters: DashMap<ParameterDescriptor, Option<Arc<ParameterInfo>>>,
}

impl<R: InfoResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            types: DashMap::new(),
            parameters: DashMap::new(),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of cached type answers, hits and misses alike
    pub fn cached_types(&self) -> usize {
        self.types.len()
    }

    pub fn clear(&self) {
        self.types.clear();
        self.parameters.clear();
    }
}

impl<R: InfoResolver> InfoResolver for CachingResolver<R> {
    fn resolve_type(&self, type_name: &TypeName) -> Option<Arc<TypeInfo>> {
        if let Some(cached) = self.types.get(type_name) {
            return cached.value().clone();
        }
        // Resolve outside the map lock; discovery may recurse into this cache.
        let resolved = self.inner.resolve_type(type_name);
        self.types.insert(type_name.clone(), resolved.clone());
        resolved
    }

    fn resolve_parameter(&self, descriptor: &ParameterDescriptor) -> Option<Arc<ParameterInfo>> {
        if let Some(cached) = self.parameters.get(descriptor) {
            return cached.value().clone();
        }
        let resolved = self.inner.resolve_parameter(descriptor);
        self.parameters.insert(descriptor.clone(), resolved.clone());
        resolved
    }
}

type TypeFn = dyn Fn(&TypeName) -> Option<Arc<TypeInfo>> + Send + Sync;
type ParameterFn = dyn Fn(&ParameterDescriptor) -> Option<Arc<ParameterInfo>> + Send + Sync;

/// Resolver backed by closures
pub struct FnResolver {
    types: Box<TypeFn>,
    parameters: Box<ParameterFn>,
}

impl FnResolver {
    /// Type resolution only; parameters never resolve
    pub fn new<F>(types: F) -> Self
    where
        F: Fn(&TypeName) -> Option<Arc<TypeInfo>> + Send + Sync + 'static,
    {
        Self {
            types: Box::new(types),
            parameters: Box::new(|_: &ParameterDescriptor| None),
        }
    }

    pub fn with_parameters<F>(mut self, parameters: F) -> Self
    where
        F: Fn(&ParameterDescriptor) -> Option<Arc<ParameterInfo>> + Send + Sync + 'static,
    {
        self.parameters = Box::new(parameters);
        self
    }
}

impl InfoResolver for FnResolver {
    fn resolve_type(&self, type_name: &TypeName) -> Option<Arc<TypeInfo>> {
        (self.types)(type_name)
    }

    fn resolve_parameter(&self, descriptor: &ParameterDescriptor) -> Option<Arc<ParameterInfo>> {
        (self.parameters)(descriptor)
    }
}
