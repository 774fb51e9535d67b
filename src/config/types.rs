//! Configuration types for the ledger service.
//!
//! These structures are deserialized from the YAML files of a configuration
//! directory. Company policy is fixed and never configured.

use serde::Deserialize;

use crate::models::Employee;

/// HTTP server settings from `server.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. "127.0.0.1".
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Page size used when a listing request does not give one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

fn default_page_size() -> u32 {
    20
}

impl ServerConfig {
    /// Returns `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Seed records from `employees.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedEmployees {
    /// Records to create at startup. They must not carry ids.
    #[serde(default)]
    pub employees: Vec<Employee>,
}

/// The complete service configuration.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    server: ServerConfig,
    seed_employees: Vec<Employee>,
}

impl LedgerConfig {
    /// Creates a configuration from its parts.
    pub fn new(server: ServerConfig, seed_employees: Vec<Employee>) -> Self {
        Self {
            server,
            seed_employees,
        }
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    /// Returns the records to create at startup.
    pub fn seed_employees(&self) -> &[Employee] {
        &self.seed_employees
    }
}
