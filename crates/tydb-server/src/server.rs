use std::sync::{Arc, RwLock};

use tokio::net::TcpListener;
use tydb_db::Database;
use tydb_schema::Schema;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, SharedDatabase};

/// HTTP server owning one database.
pub struct TydbServer {
    config: ServerConfig,
    db: SharedDatabase,
}

impl TydbServer {
    pub fn new(config: ServerConfig, database: Database) -> Self {
        Self {
            config,
            db: Arc::new(RwLock::new(database)),
        }
    }

    /// Load the schema named by the config and start from its zero value.
    pub fn from_config(config: ServerConfig) -> ServerResult<Self> {
        let schema = Schema::load(&config.schema_path)?;
        let database = Database::new(&schema)?;
        Ok(Self::new(config, database))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Handle to the shared database.
    pub fn database(&self) -> SharedDatabase {
        Arc::clone(&self.db)
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.database(), self.config.max_body_bytes)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("tydb server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tydb_types::Type;

    #[test]
    fn server_construction() {
        let server = TydbServer::new(ServerConfig::default(), Database::from_type(Type::Number));
        assert_eq!(server.config().bind_addr, "127.0.0.1:7480".parse().unwrap());
        let _router = server.router();
    }

    #[test]
    fn from_config_loads_schema() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "root = \"hashmap<string, number>\"").unwrap();
        let config = ServerConfig {
            schema_path: file.path().to_path_buf(),
            ..ServerConfig::default()
        };
        let server = TydbServer::from_config(config).unwrap();
        let db = server.database();
        let db = db.read().unwrap();
        assert_eq!(*db.root_type(), Type::hashmap(Type::String, Type::Number));
    }

    #[test]
    fn from_config_reports_missing_schema() {
        let config = ServerConfig {
            schema_path: "/nonexistent/schema.toml".into(),
            ..ServerConfig::default()
        };
        assert!(matches!(
            TydbServer::from_config(config),
            Err(ServerError::Schema(_))
        ));
    }
}
