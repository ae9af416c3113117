//! Configuration loading utilities
//!
//! Handles loading configuration from files and the environment with
//! file-first, environment-overrides precedence.

use std::env;
use std::fs;
use std::path::Path;

use crate::core::error::{Error, Result};

use super::RxlensConfig;

/// Load configuration with full precedence: defaults, then the file (if
/// given), then environment variables on top.
pub fn load(file: Option<&Path>) -> Result<RxlensConfig> {
    match file {
        Some(path) => {
            let mut config = load_from_file(path)?;
            apply_env(&mut config)?;
            Ok(config)
        }
        None => load_from_env(),
    }
}

/// Load configuration from environment variables over defaults
pub fn load_from_env() -> Result<RxlensConfig> {
    let mut config = RxlensConfig::default();
    apply_env(&mut config)?;
    Ok(config)
}

fn apply_env(config: &mut RxlensConfig) -> Result<()> {
    if let Ok(url) = env::var("RXLENS_DB_URL").or_else(|_| env::var("DATABASE_URL")) {
        config.database.url = url;
    }

    if let Ok(pool_size) = env::var("RXLENS_DB_POOL_SIZE") {
        config.database.max_connections = pool_size
            .parse()
            .map_err(|e| Error::Configuration(format!("Invalid RXLENS_DB_POOL_SIZE: {}", e)))?;
    }

    if let Ok(timeout) = env::var("RXLENS_DB_TIMEOUT") {
        config.database.acquire_timeout = timeout
            .parse()
            .map_err(|e| Error::Configuration(format!("Invalid RXLENS_DB_TIMEOUT: {}", e)))?;
    }

    if let Ok(dir) = env::var("RXLENS_OUT_DIR") {
        config.output.directory = dir;
    }

    if let Ok(format) = env::var("RXLENS_OUT_FORMAT") {
        config.output.format = format;
    }

    if let Ok(level) = env::var("RXLENS_LOG_LEVEL").or_else(|_| env::var("RUST_LOG")) {
        config.logging.level = level;
    }

    Ok(())
}

/// Load configuration from a file (YAML or TOML based on extension)
pub fn load_from_file(path: &Path) -> Result<RxlensConfig> {
    if !path.exists() {
        return Err(Error::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        Error::Configuration(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => load_from_yaml(&contents),
        Some("toml") => load_from_toml(&contents),
        Some(ext) => Err(Error::Configuration(format!(
            "Unsupported config file format: {}",
            ext
        ))),
        None => load_from_yaml(&contents).or_else(|_| load_from_toml(&contents)),
    }
}

fn load_from_yaml(yaml: &str) -> Result<RxlensConfig> {
    serde_yaml::from_str(yaml)
        .map_err(|e| Error::Configuration(format!("Invalid YAML configuration: {}", e)))
}

fn load_from_toml(toml: &str) -> Result<RxlensConfig> {
    toml::from_str(toml)
        .map_err(|e| Error::Configuration(format!("Invalid TOML configuration: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_round_trip() {
        let config = load_from_toml(
            r#"
            [database]
            url = "postgres://claims-db:5432/claims"
            max_connections = 8

            [output]
            format = "svg"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.url, "postgres://claims-db:5432/claims");
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.output.format, "svg");
        // Unset sections keep their defaults
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = load_from_yaml("database:\n  url: sqlite::memory:\n").unwrap();
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(load_from_toml("database = nonsense").is_err());
    }
}
