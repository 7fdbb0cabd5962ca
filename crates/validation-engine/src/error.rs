use crate::value::TypeName;
use thiserror::Error;

/// Fatal validation failures
///
/// Data problems never surface here; they are collected in the context's
/// error map. Only structural problems abort a validation call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "Maximum validation depth of {max_depth} exceeded at '{path}' in '{type_name}'. \
         This is likely caused by a circular reference in the object graph. \
         Consider increasing the MaxDepth in ValidationOptions if deeper validation is required."
    )]
    MaxDepthExceeded {
        max_depth: usize,
        path: String,
        type_name: TypeName,
    },
}

pub type Result<T, E = ValidationError> = std::result::Result<T, E>;
