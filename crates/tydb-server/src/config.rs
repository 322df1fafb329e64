use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server settings, usually read from a TOML file.
///
/// Every field is optional in the file and falls back to its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Schema document declaring the root type.
    pub schema_path: PathBuf,
    /// Largest accepted `/set` request body.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 7480)),
            schema_path: PathBuf::from("schema.toml"),
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:7480".parse::<SocketAddr>().unwrap());
        assert_eq!(c.schema_path, PathBuf::from("schema.toml"));
        assert_eq!(c.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let c = ServerConfig::from_toml_str("bind_addr = \"0.0.0.0:8000\"\n").unwrap();
        assert_eq!(c.bind_addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.max_body_bytes, ServerConfig::default().max_body_bytes);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ServerConfig::from_toml_str("port = 1\n").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "schema_path = \"db/schema.json\"").unwrap();
        writeln!(file, "max_body_bytes = 4096").unwrap();
        let c = ServerConfig::load(file.path()).unwrap();
        assert_eq!(c.schema_path, PathBuf::from("db/schema.json"));
        assert_eq!(c.max_body_bytes, 4096);
    }
}
