//! Configuration loaded from a TOML file. Every section is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub directory: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            directory: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Defaults applied to Monte Carlo requests that omit these fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub default_paths: u32,
    pub default_seed: u64,
    pub swr_paths_per_iteration: u32,
    pub swr_final_paths: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_paths: 5_000,
            default_seed: 42,
            swr_paths_per_iteration: 1_000,
            swr_final_paths: 5_000,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = Config::from_toml("").expect("parses");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.simulation.default_paths, 5_000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 9000

            [storage]
            backend = "memory"

            [simulation]
            default_seed = 7
            "#,
        )
        .expect("parses");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.simulation.default_seed, 7);
        assert_eq!(config.simulation.swr_final_paths, 5_000);
    }

    #[test]
    fn example_config_parses() {
        let config = Config::from_toml(include_str!("../fincalc.toml.example")).expect("parses");
        assert_eq!(config.storage.directory, PathBuf::from("data"));
        assert_eq!(config.simulation.swr_paths_per_iteration, 1_000);
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("fincalc.toml");
        fs::write(&path, "[server]\nport = \"nope\"\n").expect("write");
        let err = Config::load(&path).expect_err("must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("fincalc.toml"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = Config::load_or_default(dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(config.server.port, 8080);
        assert!(matches!(
            Config::load(dir.path().join("absent.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
