use std::sync::{Arc, RwLock};

use axum::extract::DefaultBodyLimit;
use axum::routing::{any, get};
use axum::Router;
use tower_http::trace::TraceLayer;
use tydb_db::Database;

use crate::handler;

/// The database shared by all request handlers.
///
/// Reads take the read lock; `/set` holds the write lock across
/// resolve-and-assign so no reader observes a half-applied write.
pub type SharedDatabase = Arc<RwLock<Database>>;

/// Build the axum router with all tydb endpoints.
///
/// `/json` and `/set` accept any method so that a wrong method gets the
/// same `{"err": ...}` response as every other failure.
pub fn build_router(db: SharedDatabase, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/json", any(handler::json_handler))
        .route("/set", any(handler::set_handler))
        .route("/health", get(handler::health_handler))
        .route("/info", get(handler::info_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}
