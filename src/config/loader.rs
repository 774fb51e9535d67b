//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{LedgerError, LedgerResult};

use super::types::{LedgerConfig, SeedEmployees, ServerConfig};

/// Loads the service configuration from a directory.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── server.yaml     # Bind address and listing defaults (required)
/// └── employees.yaml  # Records created at startup (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use conges_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Listening on {}", loader.config().server().bind_address());
/// # Ok::<(), conges_ledger::error::LedgerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: LedgerConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if `server.yaml` is missing, or
    /// `ConfigParseError` if any present file is not valid YAML for its type.
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref();

        let server = Self::load_yaml::<ServerConfig>(&path.join("server.yaml"))?;

        let employees_path = path.join("employees.yaml");
        let seed = if employees_path.exists() {
            Self::load_yaml::<SeedEmployees>(&employees_path)?
        } else {
            SeedEmployees::default()
        };

        Ok(Self {
            config: LedgerConfig::new(server, seed.employees),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> LedgerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LedgerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| LedgerError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> LedgerConfig {
        self.config
    }
}
