use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_DATABASE_PATH,
    error::{BsError, BsResult},
    store::DEFAULT_BUSY_TIMEOUT_MS,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BsConfig {
    /// Database file; empty means the platform data directory.
    pub database: String,
    /// Key that identifies the ingestion service principal.
    pub service_key: String,
    pub busy_timeout_ms: u64,
}

impl Default for BsConfig {
    fn default() -> Self {
        Self {
            database: String::new(),
            service_key: String::new(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl BsConfig {
    pub fn database_path(&self) -> PathBuf {
        if self.database.trim().is_empty() {
            DEFAULT_DATABASE_PATH.clone()
        } else {
            PathBuf::from(self.database.trim())
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Displayable `(key, value)` pairs; the service key is masked.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let service_key = if self.service_key.is_empty() {
            "-".to_string()
        } else {
            "*".repeat(8)
        };

        vec![
            (
                "database",
                self.database_path().to_string_lossy().to_string(),
            ),
            ("service_key", service_key),
            ("busy_timeout_ms", self.busy_timeout_ms.to_string()),
        ]
    }

    pub fn set(&mut self, key: &str, value: &str) -> BsResult<()> {
        match key.to_lowercase().as_str() {
            "database" => self.database = value.trim().to_string(),
            "service_key" => self.service_key = value.trim().to_string(),
            "busy_timeout_ms" => {
                self.busy_timeout_ms = value.trim().parse().map_err(|_| BsError::Invalid {
                    code: "INVALID_CONFIG_VALUE",
                    message: format!("Invalid busy_timeout_ms '{value}'"),
                })?;
            }
            _ => {
                return Err(BsError::Invalid {
                    code: "UNKNOWN_CONFIG_KEY",
                    message: format!("Unknown config key '{key}'"),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set() {
        let mut config = BsConfig::default();
        config.set("DATABASE", " /tmp/q.db ").unwrap();
        config.set("service_key", "s3cret").unwrap();
        config.set("busy_timeout_ms", "250").unwrap();

        assert_eq!(config.database_path(), PathBuf::from("/tmp/q.db"));
        assert_eq!(config.service_key, "s3cret");
        assert_eq!(config.busy_timeout(), Duration::from_millis(250));

        assert!(config.set("busy_timeout_ms", "soon").is_err());
        assert!(config.set("colour", "red").is_err());
    }

    #[test]
    fn test_default_database_path() {
        let config = BsConfig::default();
        assert_eq!(config.database_path(), *DEFAULT_DATABASE_PATH);
        assert_eq!(config.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
    }

    #[test]
    fn test_partial_config() {
        let config: BsConfig = serde_json::from_str(r#"{"service_key":"abc"}"#).unwrap();
        assert_eq!(config.service_key, "abc");
        assert_eq!(config.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
    }

    #[test]
    fn test_entries_mask_service_key() {
        let mut config = BsConfig::default();
        assert_eq!(config.entries()[1], ("service_key", "-".to_string()));

        config.set("service_key", "s3cret").unwrap();
        config.set("database", "/tmp/q.db").unwrap();
        let entries = config.entries();
        assert_eq!(entries[0], ("database", "/tmp/q.db".to_string()));
        assert_eq!(entries[1], ("service_key", "********".to_string()));
        assert!(entries.iter().all(|(_, value)| !value.contains("s3cret")));
    }
}
