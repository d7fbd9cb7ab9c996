//! Project use-case service.
//!
//! # Responsibility
//! - CRUD over projects with assignment links and tasks populated on reads.
//! - Date-window listings (overdue, active) relative to the injected clock.
//! - Computed delay and completion percentage.
//! - Assigning and unassigning employees.
//!
//! # Invariants
//! - `create` requires a non-blank name and `start_date < end_date`; `update`
//!   re-checks neither.
//! - `update` writes the caller's `delay_days` verbatim. It is unrelated to
//!   `calculate_delay`, which is derived from `end_date` and "now".

use crate::clock::{Clock, SystemClock};
use crate::context::{DbContext, PendingChange};
use crate::model::assignment::Assignment;
use crate::model::employee::EmployeeId;
use crate::model::project::{Project, ProjectId};
use crate::model::task::TASK_STATUS_COMPLETED;
use crate::repo::assignment_repo::AssignmentRepository;
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::project_repo::{ProjectRepository, ProjectWindow};
use crate::repo::task_repo::{StatusFilter, TaskFilter, TaskRepository};
use crate::repo::{EmployeeIncludes, ProjectIncludes};
use crate::service::{
    commit_change, inserted_id, percentage, storage, ServiceError, ServiceResult,
};
use log::info;
use rust_decimal::Decimal;

/// Project operations over one borrowed unit of work.
pub struct ProjectService<'ctx, C: Clock = SystemClock> {
    ctx: &'ctx mut DbContext,
    clock: C,
}

impl<'ctx> ProjectService<'ctx, SystemClock> {
    pub fn new(ctx: &'ctx mut DbContext) -> Self {
        Self::with_clock(ctx, SystemClock)
    }
}

impl<'ctx, C: Clock> ProjectService<'ctx, C> {
    pub fn with_clock(ctx: &'ctx mut DbContext, clock: C) -> Self {
        Self { ctx, clock }
    }

    /// Lists all projects with assignment links and tasks.
    pub fn list(&self) -> ServiceResult<Vec<Project>> {
        self.ctx
            .projects()
            .list_projects(ProjectWindow::All, ProjectIncludes::ALL)
            .map_err(storage("error retrieving projects"))
    }

    /// Gets one project with assignment links and tasks, or `None`.
    pub fn get(&self, id: ProjectId) -> ServiceResult<Option<Project>> {
        self.ctx
            .projects()
            .get_project(id, ProjectIncludes::ALL)
            .map_err(storage(format!("error retrieving project with id {id}")))
    }

    /// Inserts a new project and returns it with the store-assigned id.
    pub fn create(&mut self, project: Project) -> ServiceResult<Project> {
        project.validate()?;

        let outcome = commit_change(
            self.ctx,
            PendingChange::AddProject(project.clone()),
            "error creating project",
        )?;

        let mut created = project;
        created.id = inserted_id(outcome)?;
        info!(
            "event=project_create module=service status=ok project_id={}",
            created.id
        );
        Ok(created)
    }

    /// Overwrites name, dates and stored delay of an existing project.
    pub fn update(&mut self, project: &Project) -> ServiceResult<Project> {
        let mut existing = self
            .ctx
            .projects()
            .get_project(project.id, ProjectIncludes::NONE)
            .map_err(storage("error updating project"))?
            .ok_or(ServiceError::NotFound {
                entity: "project",
                id: project.id,
            })?;

        existing.name = project.name.clone();
        existing.start_date = project.start_date;
        existing.end_date = project.end_date;
        existing.delay_days = project.delay_days;

        commit_change(
            self.ctx,
            PendingChange::UpdateProject(existing.clone()),
            "error updating project",
        )?;

        info!(
            "event=project_update module=service status=ok project_id={}",
            existing.id
        );
        Ok(existing)
    }

    /// Removes a project with its tasks and links. `false` when absent.
    pub fn delete(&mut self, id: ProjectId) -> ServiceResult<bool> {
        let operation = format!("error deleting project with id {id}");
        let exists = self
            .ctx
            .projects()
            .get_project(id, ProjectIncludes::NONE)
            .map_err(storage(operation.as_str()))?
            .is_some();
        if !exists {
            return Ok(false);
        }

        commit_change(self.ctx, PendingChange::RemoveProject(id), operation)?;

        info!("event=project_delete module=service status=ok project_id={id}");
        Ok(true)
    }

    /// Projects whose end date is strictly before now, tasks included.
    pub fn overdue_projects(&self) -> ServiceResult<Vec<Project>> {
        self.ctx
            .projects()
            .list_projects(
                ProjectWindow::EndingBefore(self.clock.now()),
                ProjectIncludes::TASKS,
            )
            .map_err(storage("error retrieving overdue projects"))
    }

    /// Projects with `start_date <= now <= end_date`, tasks included.
    pub fn active_projects(&self) -> ServiceResult<Vec<Project>> {
        self.ctx
            .projects()
            .list_projects(
                ProjectWindow::ActiveAt(self.clock.now()),
                ProjectIncludes::TASKS,
            )
            .map_err(storage("error retrieving active projects"))
    }

    /// Whole days elapsed since the end date, truncated; zero while not past it.
    pub fn calculate_delay(&self, project_id: ProjectId) -> ServiceResult<i64> {
        let project = self
            .ctx
            .projects()
            .get_project(project_id, ProjectIncludes::NONE)
            .map_err(storage(format!(
                "error calculating delay for project {project_id}"
            )))?
            .ok_or(ServiceError::NotFound {
                entity: "project",
                id: project_id,
            })?;

        let now = self.clock.now();
        if now <= project.end_date {
            return Ok(0);
        }
        Ok((now - project.end_date).num_days())
    }

    /// Share of the project's tasks that are completed, or zero with no tasks.
    pub fn completion_percentage(&self, project_id: ProjectId) -> ServiceResult<Decimal> {
        let operation =
            format!("error calculating completion percentage for project {project_id}");
        let tasks = self.ctx.tasks();

        let total = tasks
            .count_tasks(&TaskFilter::for_project(project_id))
            .map_err(storage(operation.as_str()))?;
        if total == 0 {
            return Ok(Decimal::ZERO);
        }

        let completed = tasks
            .count_tasks(
                &TaskFilter::for_project(project_id)
                    .with_status(StatusFilter::Is(TASK_STATUS_COMPLETED.to_string())),
            )
            .map_err(storage(operation))?;
        Ok(percentage(completed, total))
    }

    /// Links an employee to a project.
    ///
    /// Both must exist. Returns `false` when the link is already present.
    pub fn assign_employee(
        &mut self,
        project_id: ProjectId,
        employee_id: EmployeeId,
    ) -> ServiceResult<bool> {
        let operation = format!("error assigning employee {employee_id} to project {project_id}");
        self.ensure_link_ends_exist(project_id, employee_id, &operation)?;

        let assignment = Assignment::new(project_id, employee_id);
        if self
            .ctx
            .assignments()
            .exists(assignment)
            .map_err(storage(operation.as_str()))?
        {
            return Ok(false);
        }

        commit_change(self.ctx, PendingChange::AddAssignment(assignment), operation)?;

        info!(
            "event=project_assign module=service status=ok project_id={project_id} employee_id={employee_id}"
        );
        Ok(true)
    }

    /// Removes an employee/project link. Returns `false` when none existed.
    pub fn unassign_employee(
        &mut self,
        project_id: ProjectId,
        employee_id: EmployeeId,
    ) -> ServiceResult<bool> {
        let operation =
            format!("error unassigning employee {employee_id} from project {project_id}");
        let assignment = Assignment::new(project_id, employee_id);
        if !self
            .ctx
            .assignments()
            .exists(assignment)
            .map_err(storage(operation.as_str()))?
        {
            return Ok(false);
        }

        commit_change(self.ctx, PendingChange::RemoveAssignment(assignment), operation)?;

        info!(
            "event=project_unassign module=service status=ok project_id={project_id} employee_id={employee_id}"
        );
        Ok(true)
    }

    fn ensure_link_ends_exist(
        &self,
        project_id: ProjectId,
        employee_id: EmployeeId,
        operation: &str,
    ) -> ServiceResult<()> {
        self.ctx
            .projects()
            .get_project(project_id, ProjectIncludes::NONE)
            .map_err(storage(operation))?
            .ok_or(ServiceError::NotFound {
                entity: "project",
                id: project_id,
            })?;
        self.ctx
            .employees()
            .get_employee(employee_id, EmployeeIncludes::NONE)
            .map_err(storage(operation))?
            .ok_or(ServiceError::NotFound {
                entity: "employee",
                id: employee_id,
            })?;
        Ok(())
    }
}
