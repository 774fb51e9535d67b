//! Storage of employee leave records.
//!
//! The ledger only talks to storage through [`EmployeeRepository`]. Saving is
//! atomic per record; any isolation between concurrent writers of the same
//! record is the repository's concern.

mod memory;

pub use memory::InMemoryEmployeeRepository;

use crate::error::StorageError;
use crate::models::{Employee, EmployeeId, Page, PageRequest};

/// Storage contract for employee leave records.
pub trait EmployeeRepository: Send + Sync {
    /// Returns the number of stored records.
    fn count_all(&self) -> Result<u64, StorageError>;

    /// Returns the record with the given id.
    fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StorageError>;

    /// Returns the first record (by id) with exactly this name.
    fn find_by_name(&self, name: &str) -> Result<Option<Employee>, StorageError>;

    /// Returns the records with exactly this name, ordered by id, optionally
    /// restricted to one page.
    fn find_all_by_name(
        &self,
        name: &str,
        page: Option<&PageRequest>,
    ) -> Result<Vec<Employee>, StorageError>;

    /// Returns one page of the records with exactly this name, ordered by id,
    /// with the total number of matches.
    fn find_page_by_name(
        &self,
        name: &str,
        page: &PageRequest,
    ) -> Result<Page<Employee>, StorageError>;

    /// Returns one page of all records, ordered by id.
    fn find_all(&self, page: &PageRequest) -> Result<Page<Employee>, StorageError>;

    /// Stores a record, assigning an id when it has none, and returns the
    /// stored record.
    fn save(&self, employee: Employee) -> Result<Employee, StorageError>;

    /// Removes the record with the given id, if any.
    fn delete_by_id(&self, id: EmployeeId) -> Result<(), StorageError>;

    /// Share of the prior-year accrued leave already taken, across all
    /// records. Zero when nothing was accrued.
    fn prior_year_total_leave_taken_ratio(&self) -> Result<f64, StorageError>;
}
