//! Configuration loading for the ledger service.
//!
//! Server settings and seed employee records are read from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use conges_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Seed records: {}", config.config().seed_employees().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{LedgerConfig, SeedEmployees, ServerConfig};
