//! Application state shared by the request handlers.

use std::sync::Arc;

use crate::ledger::LeaveLedger;
use crate::storage::InMemoryEmployeeRepository;

/// The ledger type served over HTTP.
pub type SharedLedger = LeaveLedger<InMemoryEmployeeRepository>;

/// Shared application state.
///
/// Holds the ledger and the listing defaults from the server configuration.
#[derive(Clone)]
pub struct AppState {
    ledger: Arc<SharedLedger>,
    default_page_size: u32,
}

impl AppState {
    /// Creates the state around a ledger.
    pub fn new(ledger: SharedLedger, default_page_size: u32) -> Self {
        Self {
            ledger: Arc::new(ledger),
            default_page_size,
        }
    }

    /// Returns the ledger.
    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Returns the page size used when a listing does not give one.
    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }
}
