use thiserror::Error;

/// Errors from loading or resolving a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A type expression string is malformed.
    #[error("syntax error in {text:?} at offset {offset}: {reason}")]
    Syntax {
        text: String,
        offset: usize,
        reason: String,
    },

    /// A name is neither builtin nor declared.
    #[error("unknown type name: {0}")]
    UnknownType(String),

    /// A declaration reuses a builtin type name.
    #[error("declaration {0:?} shadows a builtin type")]
    ShadowsBuiltin(String),

    /// A declaration refers back to itself.
    #[error("recursive type declaration: {0}")]
    Recursive(String),

    /// The schema document could not be decoded.
    #[error("invalid schema document: {0}")]
    Document(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
