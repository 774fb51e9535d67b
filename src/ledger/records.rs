//! Administration of employee records.
//!
//! These operations enforce the identity contract: storage assigns ids, a
//! new record must not carry one, and an update or delete must name an
//! existing record.

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Employee, EmployeeId, Page, PageRequest};
use crate::storage::EmployeeRepository;

use super::LeaveLedger;

impl<R: EmployeeRepository> LeaveLedger<R> {
    /// Returns the number of employee records.
    pub fn count_employees(&self) -> LedgerResult<u64> {
        Ok(self.repository.count_all()?)
    }

    /// Returns one page of employee records, ordered by id.
    pub fn list_employees(&self, page: &PageRequest) -> LedgerResult<Page<Employee>> {
        Ok(self.repository.find_all(page)?)
    }

    /// Returns the employee records with exactly this name.
    pub fn list_employees_by_name(
        &self,
        name: &str,
        page: Option<&PageRequest>,
    ) -> LedgerResult<Vec<Employee>> {
        Ok(self.repository.find_all_by_name(name, page)?)
    }

    /// Returns one page of the employee records with exactly this name,
    /// with the total number of matches.
    pub fn page_employees_by_name(
        &self,
        name: &str,
        page: &PageRequest,
    ) -> LedgerResult<Page<Employee>> {
        Ok(self.repository.find_page_by_name(name, page)?)
    }

    /// Returns the first employee record with exactly this name.
    pub fn find_employee_by_name(&self, name: &str) -> LedgerResult<Option<Employee>> {
        Ok(self.repository.find_by_name(name)?)
    }

    /// Returns the employee record with the given id, if any.
    pub fn get_employee(&self, id: EmployeeId) -> LedgerResult<Option<Employee>> {
        Ok(self.repository.find_by_id(id)?)
    }

    /// Returns the employee record with the given id.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` if no record has this id.
    pub fn employee(&self, id: EmployeeId) -> LedgerResult<Employee> {
        self.get_employee(id)?
            .ok_or(LedgerError::EmployeeNotFound { id })
    }

    /// Stores a new employee record and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `IdentityProvided` if the record already has an id.
    ///
    /// # Example
    ///
    /// ```
    /// use conges_ledger::error::LedgerError;
    /// use conges_ledger::ledger::LeaveLedger;
    /// use conges_ledger::models::Employee;
    /// use conges_ledger::storage::InMemoryEmployeeRepository;
    /// use chrono::NaiveDate;
    ///
    /// let ledger = LeaveLedger::new(InMemoryEmployeeRepository::new());
    /// let mut employee = Employee::new(
    ///     "Ana",
    ///     NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    /// );
    ///
    /// let created = ledger.create_employee(employee.clone()).unwrap();
    /// assert_eq!(created.id, Some(1));
    ///
    /// employee.id = Some(5);
    /// assert!(matches!(
    ///     ledger.create_employee(employee),
    ///     Err(LedgerError::IdentityProvided)
    /// ));
    /// ```
    pub fn create_employee(&self, employee: Employee) -> LedgerResult<Employee> {
        if employee.id.is_some() {
            return Err(LedgerError::IdentityProvided);
        }
        let created = self.repository.save(employee)?;
        info!(employee_id = ?created.id, name = %created.name, "Employee created");
        Ok(created)
    }

    /// Replaces an existing employee record.
    ///
    /// # Errors
    ///
    /// Returns `IdentityMissing` if the record has no id, or
    /// `EmployeeNotFound` if no record has its id.
    pub fn update_employee(&self, employee: Employee) -> LedgerResult<Employee> {
        let id = employee.id.ok_or(LedgerError::IdentityMissing)?;
        self.employee(id)?;
        let updated = self.repository.save(employee)?;
        info!(employee_id = id, "Employee updated");
        Ok(updated)
    }

    /// Deletes an employee record.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` if no record has this id.
    pub fn delete_employee(&self, id: EmployeeId) -> LedgerResult<()> {
        self.employee(id)?;
        self.repository.delete_by_id(id)?;
        info!(employee_id = id, "Employee deleted");
        Ok(())
    }
}
