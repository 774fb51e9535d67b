//! In-memory employee repository.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use crate::error::StorageError;
use crate::models::{Employee, EmployeeId, Page, PageRequest};

use super::EmployeeRepository;

#[derive(Debug, Default)]
struct Store {
    records: BTreeMap<EmployeeId, Employee>,
    last_id: EmployeeId,
}

/// Keeps employee records in a map guarded by a read-write lock.
///
/// Ids are assigned sequentially from 1.
///
/// # Example
///
/// ```
/// use conges_ledger::models::Employee;
/// use conges_ledger::storage::{EmployeeRepository, InMemoryEmployeeRepository};
/// use chrono::NaiveDate;
///
/// let repository = InMemoryEmployeeRepository::new();
/// let saved = repository
///     .save(Employee::new(
///         "Ana",
///         NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///     ))
///     .unwrap();
/// assert_eq!(saved.id, Some(1));
/// assert_eq!(repository.count_all().unwrap(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryEmployeeRepository {
    store: RwLock<Store>,
}

impl InMemoryEmployeeRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Store>, StorageError> {
        self.store.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Store>, StorageError> {
        self.store.write().map_err(|_| StorageError::LockPoisoned)
    }
}

impl EmployeeRepository for InMemoryEmployeeRepository {
    fn count_all(&self) -> Result<u64, StorageError> {
        Ok(self.read()?.records.len() as u64)
    }

    fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StorageError> {
        Ok(self.read()?.records.get(&id).cloned())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Employee>, StorageError> {
        Ok(self
            .read()?
            .records
            .values()
            .find(|employee| employee.name == name)
            .cloned())
    }

    fn find_all_by_name(
        &self,
        name: &str,
        page: Option<&PageRequest>,
    ) -> Result<Vec<Employee>, StorageError> {
        let store = self.read()?;
        let matching = store.records.values().filter(|employee| employee.name == name);
        let employees = match page {
            Some(page) => matching
                .skip(page.offset())
                .take(page.limit())
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        };
        Ok(employees)
    }

    fn find_page_by_name(
        &self,
        name: &str,
        page: &PageRequest,
    ) -> Result<Page<Employee>, StorageError> {
        let store = self.read()?;
        let mut total = 0u64;
        let mut data = Vec::new();
        for (index, employee) in store
            .records
            .values()
            .filter(|employee| employee.name == name)
            .enumerate()
        {
            total += 1;
            if index >= page.offset() && data.len() < page.limit() {
                data.push(employee.clone());
            }
        }
        Ok(Page::new(data, page, total))
    }

    fn find_all(&self, page: &PageRequest) -> Result<Page<Employee>, StorageError> {
        let store = self.read()?;
        let data = store
            .records
            .values()
            .skip(page.offset())
            .take(page.limit())
            .cloned()
            .collect();
        Ok(Page::new(data, page, store.records.len() as u64))
    }

    fn save(&self, mut employee: Employee) -> Result<Employee, StorageError> {
        let mut store = self.write()?;
        let id = match employee.id {
            Some(id) => id,
            None => {
                store.last_id += 1;
                store.last_id
            }
        };
        store.last_id = store.last_id.max(id);
        employee.id = Some(id);
        store.records.insert(id, employee.clone());
        debug!(employee_id = id, "Employee record saved");
        Ok(employee)
    }

    fn delete_by_id(&self, id: EmployeeId) -> Result<(), StorageError> {
        self.write()?.records.remove(&id);
        Ok(())
    }

    fn prior_year_total_leave_taken_ratio(&self) -> Result<f64, StorageError> {
        let store = self.read()?;
        let (taken, accrued) = store
            .records
            .values()
            .fold((0.0, 0.0), |(taken, accrued), employee| {
                (
                    taken + employee.leave_taken_prior_year,
                    accrued + employee.leave_accrued_prior_year,
                )
            });
        if accrued == 0.0 {
            return Ok(0.0);
        }
        Ok(taken / accrued)
    }
}
