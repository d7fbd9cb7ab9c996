//! Employee use-case service.
//!
//! # Responsibility
//! - CRUD over employees with assignment links populated on reads.
//! - Task-derived counts and the performance score.
//!
//! # Invariants
//! - Name validation runs before any store access.
//! - `update` overwrites exactly the two names and the two stored counters;
//!   assignment links are left alone.

use crate::clock::{Clock, SystemClock};
use crate::context::{DbContext, PendingChange};
use crate::model::employee::{Employee, EmployeeId};
use crate::model::task::TASK_STATUS_COMPLETED;
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::task_repo::{StatusFilter, TaskFilter, TaskRepository};
use crate::repo::EmployeeIncludes;
use crate::service::{
    commit_change, inserted_id, percentage, storage, ServiceError, ServiceResult,
};
use log::info;
use rust_decimal::Decimal;

/// Employee operations over one borrowed unit of work.
pub struct EmployeeService<'ctx, C: Clock = SystemClock> {
    ctx: &'ctx mut DbContext,
    clock: C,
}

impl<'ctx> EmployeeService<'ctx, SystemClock> {
    /// Creates a service reading "now" from the system clock.
    pub fn new(ctx: &'ctx mut DbContext) -> Self {
        Self::with_clock(ctx, SystemClock)
    }
}

impl<'ctx, C: Clock> EmployeeService<'ctx, C> {
    pub fn with_clock(ctx: &'ctx mut DbContext, clock: C) -> Self {
        Self { ctx, clock }
    }

    /// Lists all employees with their assignment links.
    pub fn list(&self) -> ServiceResult<Vec<Employee>> {
        self.ctx
            .employees()
            .list_employees(EmployeeIncludes::ALL)
            .map_err(storage("error retrieving employees"))
    }

    /// Gets one employee with assignment links, or `None` when absent.
    pub fn get(&self, id: EmployeeId) -> ServiceResult<Option<Employee>> {
        self.ctx
            .employees()
            .get_employee(id, EmployeeIncludes::ALL)
            .map_err(storage(format!("error retrieving employee with id {id}")))
    }

    /// Inserts a new employee and returns it with the store-assigned id.
    ///
    /// A failed commit leaves the context without pending changes.
    pub fn create(&mut self, employee: Employee) -> ServiceResult<Employee> {
        employee.validate()?;

        let outcome = commit_change(
            self.ctx,
            PendingChange::AddEmployee(employee.clone()),
            "error creating employee",
        )?;

        let mut created = employee;
        created.id = inserted_id(outcome)?;
        info!(
            "event=employee_create module=service status=ok employee_id={}",
            created.id
        );
        Ok(created)
    }

    /// Overwrites names and stored counters of an existing employee.
    pub fn update(&mut self, employee: &Employee) -> ServiceResult<Employee> {
        let mut existing = self
            .ctx
            .employees()
            .get_employee(employee.id, EmployeeIncludes::NONE)
            .map_err(storage("error updating employee"))?
            .ok_or(ServiceError::NotFound {
                entity: "employee",
                id: employee.id,
            })?;

        existing.first_name = employee.first_name.clone();
        existing.last_name = employee.last_name.clone();
        existing.completed_task_count = employee.completed_task_count;
        existing.overdue_task_count = employee.overdue_task_count;

        commit_change(
            self.ctx,
            PendingChange::UpdateEmployee(existing.clone()),
            "error updating employee",
        )?;

        info!(
            "event=employee_update module=service status=ok employee_id={}",
            existing.id
        );
        Ok(existing)
    }

    /// Removes an employee. Returns `false` when no such row exists.
    pub fn delete(&mut self, id: EmployeeId) -> ServiceResult<bool> {
        let operation = format!("error deleting employee with id {id}");
        let exists = self
            .ctx
            .employees()
            .get_employee(id, EmployeeIncludes::NONE)
            .map_err(storage(operation.as_str()))?
            .is_some();
        if !exists {
            return Ok(false);
        }

        commit_change(self.ctx, PendingChange::RemoveEmployee(id), operation)?;

        info!("event=employee_delete module=service status=ok employee_id={id}");
        Ok(true)
    }

    /// Counts the employee's tasks whose status is exactly `Completed`.
    pub fn completed_task_count(&self, employee_id: EmployeeId) -> ServiceResult<u32> {
        let filter = TaskFilter::for_employee(employee_id)
            .with_status(StatusFilter::Is(TASK_STATUS_COMPLETED.to_string()));
        self.ctx.tasks().count_tasks(&filter).map_err(storage(format!(
            "error getting completed tasks count for employee {employee_id}"
        )))
    }

    /// Counts the employee's unfinished tasks whose end date has passed.
    pub fn overdue_task_count(&self, employee_id: EmployeeId) -> ServiceResult<u32> {
        let filter = TaskFilter::for_employee(employee_id)
            .with_status(StatusFilter::IsNot(TASK_STATUS_COMPLETED.to_string()))
            .ending_before(self.clock.now());
        self.ctx.tasks().count_tasks(&filter).map_err(storage(format!(
            "error getting overdue tasks count for employee {employee_id}"
        )))
    }

    /// `completed / (completed + overdue) * 100`, or zero with no such tasks.
    pub fn performance_score(&self, employee_id: EmployeeId) -> ServiceResult<Decimal> {
        let completed = self.completed_task_count(employee_id)?;
        let overdue = self.overdue_task_count(employee_id)?;
        Ok(percentage(completed, completed + overdue))
    }
}
