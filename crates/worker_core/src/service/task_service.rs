//! Task use-case service.
//!
//! Tasks feed the employee counts and project completion figures. Status is
//! an open string; only `Completed` has meaning elsewhere in core.

use crate::context::{DbContext, PendingChange};
use crate::model::employee::EmployeeId;
use crate::model::project::ProjectId;
use crate::model::task::{Task, TaskId};
use crate::model::ValidationError;
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::task_repo::{TaskFilter, TaskRepository};
use crate::repo::{EmployeeIncludes, ProjectIncludes};
use crate::service::{commit_change, inserted_id, storage, ServiceError, ServiceResult};
use log::info;

/// Task operations over one borrowed unit of work.
pub struct TaskService<'ctx> {
    ctx: &'ctx mut DbContext,
}

impl<'ctx> TaskService<'ctx> {
    pub fn new(ctx: &'ctx mut DbContext) -> Self {
        Self { ctx }
    }

    pub fn get(&self, id: TaskId) -> ServiceResult<Option<Task>> {
        self.ctx
            .tasks()
            .get_task(id)
            .map_err(storage(format!("error retrieving task with id {id}")))
    }

    pub fn list_for_project(&self, project_id: ProjectId) -> ServiceResult<Vec<Task>> {
        self.ctx
            .tasks()
            .list_tasks(&TaskFilter::for_project(project_id))
            .map_err(storage(format!(
                "error retrieving tasks for project {project_id}"
            )))
    }

    pub fn list_for_employee(&self, employee_id: EmployeeId) -> ServiceResult<Vec<Task>> {
        self.ctx
            .tasks()
            .list_tasks(&TaskFilter::for_employee(employee_id))
            .map_err(storage(format!(
                "error retrieving tasks for employee {employee_id}"
            )))
    }

    /// Inserts a task owned by an existing project and employee.
    pub fn create(&mut self, task: Task) -> ServiceResult<Task> {
        task.validate()?;

        let operation = "error creating task";
        self.ctx
            .projects()
            .get_project(task.project_id, ProjectIncludes::NONE)
            .map_err(storage(operation))?
            .ok_or(ServiceError::NotFound {
                entity: "project",
                id: task.project_id,
            })?;
        self.ctx
            .employees()
            .get_employee(task.employee_id, EmployeeIncludes::NONE)
            .map_err(storage(operation))?
            .ok_or(ServiceError::NotFound {
                entity: "employee",
                id: task.employee_id,
            })?;

        let outcome = commit_change(self.ctx, PendingChange::AddTask(task.clone()), operation)?;

        let mut created = task;
        created.id = inserted_id(outcome)?;
        info!(
            "event=task_create module=service status=ok task_id={} project_id={} employee_id={}",
            created.id, created.project_id, created.employee_id
        );
        Ok(created)
    }

    /// Replaces the status of an existing task.
    pub fn set_status(&mut self, id: TaskId, status: impl Into<String>) -> ServiceResult<Task> {
        let status = status.into();
        if status.trim().is_empty() {
            return Err(ValidationError::BlankTaskStatus.into());
        }

        let operation = format!("error updating status of task {id}");
        let mut task = self
            .ctx
            .tasks()
            .get_task(id)
            .map_err(storage(operation.as_str()))?
            .ok_or(ServiceError::NotFound { entity: "task", id })?;

        task.status = status;
        commit_change(self.ctx, PendingChange::UpdateTask(task.clone()), operation)?;

        info!(
            "event=task_status module=service status=ok task_id={id} task_status={}",
            task.status
        );
        Ok(task)
    }

    /// Removes a task. Returns `false` when no such row exists.
    pub fn delete(&mut self, id: TaskId) -> ServiceResult<bool> {
        let operation = format!("error deleting task with id {id}");
        let exists = self
            .ctx
            .tasks()
            .get_task(id)
            .map_err(storage(operation.as_str()))?
            .is_some();
        if !exists {
            return Ok(false);
        }

        commit_change(self.ctx, PendingChange::RemoveTask(id), operation)?;
        Ok(true)
    }
}
