use crate::config::{ValidationSettings, DEFAULT_MAX_DEPTH};
use crate::metadata::{ParameterInfo, TypeInfo};
use crate::resolver::{InfoResolver, ParameterDescriptor};
use crate::value::TypeName;
use std::fmt;
use std::sync::Arc;

/// Engine configuration: the resolver chain, the depth bound and the
/// optional error cap
///
/// Built once at startup and shared read-only by every validation call.
#[derive(Clone)]
pub struct ValidationOptions {
    resolvers: Vec<Arc<dyn InfoResolver>>,
    max_depth: usize,
    max_errors: Option<usize>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            resolvers: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_errors: None,
        }
    }
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &ValidationSettings) -> Self {
        let options = Self::default().with_max_depth(settings.max_depth);
        match settings.max_errors {
            Some(max_errors) => options.with_max_errors(max_errors),
            None => options,
        }
    }

    /// Append a resolver; earlier resolvers take precedence
    pub fn with_resolver(mut self, resolver: impl InfoResolver + 'static) -> Self {
        self.add_resolver(Arc::new(resolver));
        self
    }

    pub fn add_resolver(&mut self, resolver: Arc<dyn InfoResolver>) {
        self.resolvers.push(resolver);
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Stop validating once this many messages have been recorded
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = Some(max_errors);
        self
    }

    pub fn max_errors(&self) -> Option<usize> {
        self.max_errors
    }

    pub fn resolvers(&self) -> &[Arc<dyn InfoResolver>] {
        &self.resolvers
    }

    /// First answer from the resolver chain for a runtime type
    pub fn resolve_type(&self, type_name: &TypeName) -> Option<Arc<TypeInfo>> {
        self.resolvers
            .iter()
            .find_map(|resolver| resolver.resolve_type(type_name))
    }

    /// First answer from the resolver chain for an endpoint parameter
    pub fn resolve_parameter(&self, descriptor: &ParameterDescriptor) -> Option<Arc<ParameterInfo>> {
        self.resolvers
            .iter()
            .find_map(|resolver| resolver.resolve_parameter(descriptor))
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationOptions")
            .field("resolvers", &self.resolvers.len())
            .field("max_depth", &self.max_depth)
            .field("max_errors", &self.max_errors)
            .finish()
    }
}
