//! Configuration for the chat server.
//!
//! Read from TOML. Every key is optional:
//!
//! ```toml
//! [database]
//! url = "sqlite://hrchat.db"
//! seed = true
//!
//! [server]
//! bind = "127.0.0.1:5000"
//! cors = false
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ChatError, ChatResult};

/// Name of the config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "hrchat.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Create the tables and write the sample rows at startup
    pub seed: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://hrchat.db".to_string(),
            seed: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: String,

    /// Allow cross-origin requests from any origin
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            cors: false,
        }
    }
}

impl ChatConfig {
    /// Create a new configuration builder
    pub fn builder() -> ChatConfigBuilder {
        ChatConfigBuilder::default()
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> ChatResult<Self> {
        toml::from_str(content).map_err(|e| ChatError::Config(e.to_string()))
    }

    /// Read a config file.
    pub fn from_file(path: &Path) -> ChatResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChatError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `./hrchat.toml` is tried, then
    /// `hrchat/config.toml` under the user's config directory, and finally the
    /// built-in defaults are used.
    pub fn load(explicit: Option<&Path>) -> ChatResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::discover(Path::new("."), dirs::config_dir()) {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// First existing config file: `<cwd>/hrchat.toml`, then `<config_dir>/hrchat/config.toml`.
    fn discover(cwd: &Path, config_dir: Option<PathBuf>) -> Option<PathBuf> {
        let local = cwd.join(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        config_dir
            .map(|dir| dir.join("hrchat").join("config.toml"))
            .filter(|path| path.exists())
    }
}

/// Builder for ChatConfig
#[derive(Debug, Default)]
pub struct ChatConfigBuilder {
    config: ChatConfig,
}

impl ChatConfigBuilder {
    /// Start from an already loaded configuration
    pub fn from_config(config: ChatConfig) -> Self {
        Self { config }
    }

    /// Set the database URL
    pub fn database(mut self, url: impl Into<String>) -> Self {
        self.config.database.url = url.into();
        self
    }

    /// Enable or disable sample-data seeding
    pub fn seed(mut self, seed: bool) -> Self {
        self.config.database.seed = seed;
        self
    }

    /// Set the bind address
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.config.server.bind = addr.into();
        self
    }

    /// Enable or disable CORS
    pub fn cors(mut self, enabled: bool) -> Self {
        self.config.server.cors = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ChatConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.database.url, "sqlite://hrchat.db");
        assert!(config.database.seed);
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert!(!config.server.cors);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ChatConfig::from_toml_str(
            r#"
            [server]
            bind = "0.0.0.0:8080"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert!(!config.server.cors);
        assert_eq!(config.database.url, "sqlite://hrchat.db");
    }

    #[test]
    fn test_full_toml() {
        let config = ChatConfig::from_toml_str(
            r#"
            [database]
            url = "sqlite::memory:"
            seed = false

            [server]
            bind = "127.0.0.1:9000"
            cors = true
            "#,
        )
        .unwrap();
        assert_eq!(config.database.url, "sqlite::memory:");
        assert!(!config.database.seed);
        assert!(config.server.cors);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = ChatConfig::from_toml_str("[database]\nseed = \"yes\"").unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = ChatConfig::load(Some(Path::new("/nonexistent/hrchat.toml"))).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }

    /// A fresh directory under the system temp dir, removed on drop.
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("hrchat-{}-{}", name, std::process::id()));
            let _ = std::fs::remove_dir_all(&dir);
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_load_explicit_file_overrides_defaults() {
        let scratch = ScratchDir::new("explicit");
        let path = scratch.0.join("custom.toml");
        std::fs::write(&path, "[server]\nbind = \"0.0.0.0:7000\"\ncors = true\n").unwrap();

        let config = ChatConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:7000");
        assert!(config.server.cors);
        assert_eq!(config.database.url, "sqlite://hrchat.db");
    }

    #[test]
    fn test_discover_prefers_local_file() {
        let cwd = ScratchDir::new("discover-cwd");
        let user = ScratchDir::new("discover-user");
        std::fs::create_dir_all(user.0.join("hrchat")).unwrap();
        std::fs::write(user.0.join("hrchat").join("config.toml"), "").unwrap();

        let found = ChatConfig::discover(&cwd.0, Some(user.0.clone()));
        assert_eq!(found, Some(user.0.join("hrchat").join("config.toml")));

        std::fs::write(cwd.0.join(LOCAL_CONFIG_FILE), "[database]\nseed = false\n").unwrap();
        let found = ChatConfig::discover(&cwd.0, Some(user.0.clone())).unwrap();
        assert_eq!(found, cwd.0.join(LOCAL_CONFIG_FILE));
        assert!(!ChatConfig::from_file(&found).unwrap().database.seed);
    }

    #[test]
    fn test_discover_nothing_found() {
        let cwd = ScratchDir::new("discover-empty");
        assert_eq!(ChatConfig::discover(&cwd.0, None), None);
        assert_eq!(ChatConfig::discover(&cwd.0, Some(cwd.0.join("missing"))), None);
    }

    #[test]
    fn test_builder_from_loaded_config() {
        let loaded = ChatConfig::from_toml_str("[server]\ncors = true").unwrap();
        let config = ChatConfigBuilder::from_config(loaded).bind("127.0.0.1:6000").build();
        assert!(config.server.cors);
        assert_eq!(config.server.bind, "127.0.0.1:6000");
    }

    #[test]
    fn test_builder_overrides() {
        let config = ChatConfig::builder()
            .database("sqlite::memory:")
            .bind("0.0.0.0:3000")
            .seed(false)
            .cors(true)
            .build();
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.server.bind, "0.0.0.0:3000");
        assert!(!config.database.seed);
        assert!(config.server.cors);
    }
}
