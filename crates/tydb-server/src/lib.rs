//! HTTP front end for a tydb database.
//!
//! Two endpoints carry the data:
//!
//! - `GET /json?selector=<path>` renders the selected item as JSON.
//! - `POST /set?selector=<path>` assigns the JSON request body to the
//!   selected item and renders the result.
//!
//! Any failure answers `500` with `{"err": "<message>"}`. `/health` and
//! `/info` are provided for operators.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_router, SharedDatabase};
pub use server::TydbServer;
