//! Binding Errors
//!
//! One error type for the whole crate. Configuration problems surface when a
//! descriptor is built; everything else aborts the parse that raised it.

use thiserror::Error;

use crate::bind::coerce::CoercionKind;

/// Error raised while building a binder or binding a document
#[derive(Debug, Error)]
pub enum BindError {
    /// A path pattern string could not be parsed
    #[error("invalid path pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },

    /// A type descriptor is unusable (no constructor, empty pattern, ...)
    #[error("invalid binding for `{type_name}`: {message}")]
    Config { type_name: String, message: String },

    /// Captured text could not be converted to the destination kind
    #[error("cannot bind `{text}` at {path} to field `{field}` as {kind}: {message}")]
    Coercion {
        field: String,
        path: String,
        kind: CoercionKind,
        text: String,
        message: String,
    },

    /// The tokenizer rejected the input
    #[error("malformed XML: {message}")]
    Tokenizer { message: String },

    /// Input ended before the root element closed
    #[error("unexpected end of input inside {path}")]
    UnexpectedEof { path: String },

    /// The root pattern never matched an element
    #[error("no element matched root pattern `{pattern}`")]
    RootNotFound { pattern: String },
}

impl BindError {
    pub(crate) fn config(type_name: &str, message: impl Into<String>) -> Self {
        BindError::Config {
            type_name: type_name.to_string(),
            message: message.into(),
        }
    }

    /// True for errors raised while building a binder rather than parsing
    pub fn is_configuration(&self) -> bool {
        matches!(self, BindError::Pattern { .. } | BindError::Config { .. })
    }
}
