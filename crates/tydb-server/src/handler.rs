use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, Method};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::error::{ServerError, ServerResult};
use crate::router::SharedDatabase;

type Params = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// A pre-rendered JSON body.
pub struct JsonText(pub String);

impl IntoResponse for JsonText {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, "application/json")], self.0).into_response()
    }
}

/// `GET /json?selector=<path>`: render the selected item as JSON.
pub async fn json_handler(
    State(db): State<SharedDatabase>,
    method: Method,
    params: Params,
) -> ServerResult<JsonText> {
    if method != Method::GET {
        return Err(ServerError::BadRequest("only GET is supported for /json".into()));
    }
    let params = params.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let selector = single_selector(&params)?;

    let db = db
        .read()
        .map_err(|_| ServerError::Internal("database lock poisoned".into()))?;
    let item = db.query_string(selector)?;
    Ok(JsonText(item.render_json()))
}

/// `POST /set?selector=<path>` with a JSON body: assign the body to the
/// selected item and render the updated item.
pub async fn set_handler(
    State(db): State<SharedDatabase>,
    method: Method,
    params: Params,
    body: Bytes,
) -> ServerResult<JsonText> {
    if method != Method::POST {
        return Err(ServerError::BadRequest("only POST is supported for /set".into()));
    }
    let params = params.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let selector = single_selector(&params)?;
    if body.is_empty() {
        return Err(ServerError::BadRequest("expected a request body".into()));
    }
    let value: serde_json::Value = serde_json::from_slice(&body)?;

    let mut db = db
        .write()
        .map_err(|_| ServerError::Internal("database lock poisoned".into()))?;
    let item = db.set(selector, &value)?;
    tracing::info!(selector, "item updated");
    Ok(JsonText(item.render_json()))
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler(State(db): State<SharedDatabase>) -> ServerResult<Json<serde_json::Value>> {
    let db = db
        .read()
        .map_err(|_| ServerError::Internal("database lock poisoned".into()))?;
    Ok(Json(json!({
        "name": "tydb-server",
        "version": env!("CARGO_PKG_VERSION"),
        "root_type": db.root_type().to_string(),
    })))
}

fn single_selector(params: &[(String, String)]) -> ServerResult<&str> {
    let mut values = params
        .iter()
        .filter(|(name, _)| name == "selector")
        .map(|(_, value)| value.as_str());
    match (values.next(), values.next()) {
        (Some(selector), None) => Ok(selector),
        _ => Err(ServerError::BadRequest(
            "only one form value expected for the selector".into(),
        )),
    }
}
