use std::fmt;

use tydb_types::Type;

/// Outcome kind of a failed item operation.
///
/// Success is `Ok(_)`; every failure maps onto exactly one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// Well-formed but intentionally declined.
    Noop,
    /// Operand type mismatch.
    Type,
    /// Key or field not present.
    Index,
    /// Mechanical failure unrelated to data typing.
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Noop => "NOOP",
            Self::Type => "Type",
            Self::Index => "Index",
            Self::Error => "Error",
        })
    }
}

/// Errors from item operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ItemError {
    /// The operation is valid in form but this item declines it.
    #[error("operation declined: {0}")]
    Declined(String),

    /// An operand had the wrong type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// The item's kind does not support the operation.
    #[error("{op} is not supported on {ty}")]
    Unsupported { op: &'static str, ty: Type },

    /// The key or field does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Two distinct keys hashed to the same digest.
    #[error("digest collision on key {0}")]
    Collision(String),

    /// A key could not be hashed.
    #[error("cannot hash key: {0}")]
    Hash(String),
}

impl ItemError {
    /// The status kind this error reports.
    pub fn status(&self) -> Status {
        match self {
            Self::Declined(_) => Status::Noop,
            Self::TypeMismatch { .. } | Self::Unsupported { .. } => Status::Type,
            Self::NotFound(_) => Status::Index,
            Self::Collision(_) | Self::Hash(_) => Status::Error,
        }
    }

    /// Mismatch between a declared type and the type actually supplied.
    pub fn mismatch(expected: &Type, found: &Type) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Mismatch between a declared type and an untyped input shape.
    pub fn shape(expected: &Type, found: &serde_json::Value) -> Self {
        let found = match found {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "JSON boolean",
            serde_json::Value::Number(_) => "JSON number",
            serde_json::Value::String(_) => "JSON string",
            serde_json::Value::Array(_) => "JSON array",
            serde_json::Value::Object(_) => "JSON object",
        };
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Result alias for item operations.
pub type ItemResult<T> = Result<T, ItemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_a_status() {
        assert_eq!(ItemError::Declined("x".into()).status(), Status::Noop);
        assert_eq!(
            ItemError::mismatch(&Type::String, &Type::Number).status(),
            Status::Type
        );
        assert_eq!(
            ItemError::Unsupported {
                op: "get_key",
                ty: Type::Boolean
            }
            .status(),
            Status::Type
        );
        assert_eq!(ItemError::NotFound("k".into()).status(), Status::Index);
        assert_eq!(ItemError::Collision("k".into()).status(), Status::Error);
        assert_eq!(ItemError::Hash("nan".into()).status(), Status::Error);
    }

    #[test]
    fn messages_name_the_types() {
        let err = ItemError::mismatch(&Type::String, &Type::array(Type::Number));
        assert_eq!(
            err.to_string(),
            "type mismatch: expected string, found array<number>"
        );
        let err = ItemError::shape(&Type::Number, &serde_json::Value::Null);
        assert_eq!(err.to_string(), "type mismatch: expected number, found null");
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::Noop.to_string(), "NOOP");
        assert_eq!(Status::Index.to_string(), "Index");
    }
}
