use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{}", db_message(.0))]
    Db(#[from] tydb_db::DbError),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema error: {0}")]
    Schema(#[from] tydb_schema::SchemaError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Prefix item failures with their status kind.
fn db_message(err: &tydb_db::DbError) -> String {
    match err.status() {
        Some(status) => format!("{status}: {err}"),
        None => err.to_string(),
    }
}

/// Every failure is reported as `{"err": <message>}` with status 500.
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::warn!(error = %message, "request failed");
        let body = serde_json::json!({ "err": message }).to_string();
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
