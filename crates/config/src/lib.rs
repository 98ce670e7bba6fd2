use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Where the bookstore keeps its tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(format!("expected `memory` or `sqlite`, got `{}`", other)),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => f.write_str("memory"),
            StorageBackend::Sqlite => f.write_str("sqlite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub storage: StorageBackend,
    pub database_url: String,
    pub max_connections: u32,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Sqlite,
            database_url: "bookstore.db".to_string(),
            max_connections: 4,
            log_filter: "bookstore=info,application=info,domain=info,infrastructure=info"
                .to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment, reading a `.env`
    /// file first when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let storage = match lookup("STORAGE_BACKEND") {
            Some(value) => {
                value
                    .parse::<StorageBackend>()
                    .map_err(|reason| ConfigError::Invalid {
                        key: "STORAGE_BACKEND",
                        reason,
                    })?
            }
            None => defaults.storage,
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|count| *count > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "DATABASE_MAX_CONNECTIONS",
                    reason: format!("expected a positive integer, got `{}`", value),
                })?,
            None => defaults.max_connections,
        };

        Ok(Self {
            storage,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections,
            log_filter: lookup("LOG_FILTER").unwrap_or(defaults.log_filter),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(Config::from_lookup(lookup(&[])), Ok(Config::default()));
    }

    #[test]
    fn reads_every_key() {
        let config = Config::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "Memory"),
            ("DATABASE_URL", "/tmp/shop.db"),
            ("DATABASE_MAX_CONNECTIONS", "8"),
            ("LOG_FILTER", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.database_url, "/tmp/shop.db");
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.log_filter, "debug");
    }

    #[rstest]
    #[case("STORAGE_BACKEND", "postgres")]
    #[case("DATABASE_MAX_CONNECTIONS", "lots")]
    #[case("DATABASE_MAX_CONNECTIONS", "0")]
    fn rejects_invalid_values(#[case] key: &'static str, #[case] value: &str) {
        let err = Config::from_lookup(lookup(&[(key, value)])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: k, .. } if k == key));
    }
}
