//! Configuration module for the Equipe backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Which storage backend the process runs against.
///
/// The two backends are never composed; exactly one is active per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Firebase,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Active storage backend
    pub storage: StorageBackend,
    /// Path to SQLite database file (sqlite backend)
    pub db_path: PathBuf,
    /// Base URL of the Firebase Realtime Database tree (firebase backend)
    pub firebase_url: Option<String>,
    /// Auth token appended to Realtime Database requests
    pub firebase_auth: Option<String>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let storage = match env::var("EQUIPE_STORAGE").as_deref() {
            Ok("firebase") => StorageBackend::Firebase,
            Ok("sqlite") | Err(_) => StorageBackend::Sqlite,
            Ok(other) => panic!("Invalid EQUIPE_STORAGE value: {}", other),
        };

        let db_path = env::var("EQUIPE_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let firebase_url = env::var("EQUIPE_FIREBASE_URL").ok();
        let firebase_auth = env::var("EQUIPE_FIREBASE_AUTH").ok();

        let bind_addr = env::var("EQUIPE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid EQUIPE_BIND_ADDR format");

        let log_level = env::var("EQUIPE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            storage,
            db_path,
            firebase_url,
            firebase_auth,
            bind_addr,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("EQUIPE_STORAGE");
        env::remove_var("EQUIPE_DB_PATH");
        env::remove_var("EQUIPE_FIREBASE_URL");
        env::remove_var("EQUIPE_FIREBASE_AUTH");
        env::remove_var("EQUIPE_BIND_ADDR");
        env::remove_var("EQUIPE_LOG_LEVEL");

        let config = Config::from_env();

        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.db_path, PathBuf::from("./data/app.sqlite"));
        assert!(config.firebase_url.is_none());
        assert!(config.firebase_auth.is_none());
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
    }
}
