//! Client configuration
//!
//! Resolution order: defaults, then an optional YAML file, then `GDS_*`
//! environment variables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::error::{GdsError, GdsResult};

/// Connection settings for `HttpQueryRunner`
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the Neo4j HTTP API
    pub url: String,
    /// Username for basic auth (None = no auth)
    pub user: Option<String>,
    /// Password for basic auth
    pub password: Option<String>,
    /// Target database
    pub database: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:7474".to_string(),
            user: Some("neo4j".to_string()),
            password: None,
            database: "neo4j".to_string(),
            timeout_secs: 60,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Parse a YAML document; missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> GdsResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> GdsResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading client configuration");
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Apply `GDS_URL`, `GDS_USER`, `GDS_PASSWORD` and `GDS_DATABASE`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("GDS_URL") {
            self.url = url;
        }
        if let Some(user) = lookup("GDS_USER") {
            self.user = Some(user);
        }
        if let Some(password) = lookup("GDS_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(database) = lookup("GDS_DATABASE") {
            self.database = database;
        }
        self
    }

    pub fn validate(&self) -> GdsResult<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(GdsError::ConfigError(format!(
                "url must start with http:// or https://, got '{}'",
                self.url
            )));
        }
        if self.database.is_empty() {
            return Err(GdsError::ConfigError("database must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(GdsError::ConfigError("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ClientConfig::from_yaml_str("url: https://gds.example.com:7473\n").unwrap();
        assert_eq!(config.url, "https://gds.example.com:7473");
        assert_eq!(config.database, "neo4j");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "url: http://db:7474\nuser: analyst\npassword: secret\ndatabase: movies"
        )
        .unwrap();

        let config = ClientConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.user.as_deref(), Some("analyst"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.database, "movies");
    }

    #[test]
    fn test_debug_hides_password() {
        let config = ClientConfig {
            password: Some("hunter2".to_string()),
            ..ClientConfig::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("http://localhost:7474"));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            ClientConfig::from_yaml_str("url: bolt://localhost:7687\n"),
            Err(GdsError::ConfigError(_))
        ));
        assert!(matches!(
            ClientConfig::from_yaml_str("timeout_secs: [1, 2]\n"),
            Err(GdsError::YamlError(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [("GDS_URL", "http://other:7474"), ("GDS_DATABASE", "fraud")]
            .into_iter()
            .collect();

        let config = ClientConfig::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.url, "http://other:7474");
        assert_eq!(config.database, "fraud");
        assert_eq!(config.user.as_deref(), Some("neo4j"));
    }
}
