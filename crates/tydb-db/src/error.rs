use thiserror::Error;
use tydb_item::{ItemError, Status};
use tydb_schema::SchemaError;

use crate::selector::SelectorError;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error("{0}")]
    Item(#[from] ItemError),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl DbError {
    /// Item status, if the failure happened while walking or mutating items.
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Item(e) => Some(e.status()),
            Self::Selector(_) | Self::Schema(_) => None,
        }
    }
}

/// Result alias for database operations.
pub type DbResult<T> = Result<T, DbError>;
