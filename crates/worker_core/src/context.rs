//! Unit-of-work persistence context.
//!
//! # Responsibility
//! - Own the SQLite connection for one unit of work.
//! - Expose read access to the four entity sets through their repositories.
//! - Stage adds, updates and removals, then flush them in one transaction.
//!
//! # Invariants
//! - `save_changes` is all-or-nothing: a failure rolls the transaction back
//!   and leaves the pending list untouched for inspection or retry.
//! - The context never retries on its own.
//! - A context is not shared across threads; callers scope one per operation.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::assignment::Assignment;
use crate::model::employee::{Employee, EmployeeId};
use crate::model::project::{Project, ProjectId};
use crate::model::task::{Task, TaskId};
use crate::repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::RepoResult;
use log::{debug, error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;

/// One staged mutation awaiting `save_changes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    AddEmployee(Employee),
    UpdateEmployee(Employee),
    RemoveEmployee(EmployeeId),
    AddProject(Project),
    UpdateProject(Project),
    RemoveProject(ProjectId),
    AddTask(Task),
    UpdateTask(Task),
    RemoveTask(TaskId),
    AddAssignment(Assignment),
    RemoveAssignment(Assignment),
}

impl PendingChange {
    fn label(&self) -> &'static str {
        match self {
            Self::AddEmployee(_) => "add_employee",
            Self::UpdateEmployee(_) => "update_employee",
            Self::RemoveEmployee(_) => "remove_employee",
            Self::AddProject(_) => "add_project",
            Self::UpdateProject(_) => "update_project",
            Self::RemoveProject(_) => "remove_project",
            Self::AddTask(_) => "add_task",
            Self::UpdateTask(_) => "update_task",
            Self::RemoveTask(_) => "remove_task",
            Self::AddAssignment(_) => "add_assignment",
            Self::RemoveAssignment(_) => "remove_assignment",
        }
    }
}

/// Result of applying one pending change, in staging order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeOutcome {
    pub rows_affected: usize,
    /// Store-assigned id for `Add*` changes on entities with surrogate keys.
    pub inserted_id: Option<i64>,
}

/// Connection plus change tracker for one unit of work.
pub struct DbContext {
    conn: Connection,
    pending: Vec<PendingChange>,
}

impl DbContext {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            pending: Vec::new(),
        }
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn employees(&self) -> SqliteEmployeeRepository<'_> {
        SqliteEmployeeRepository::new(&self.conn)
    }

    pub fn projects(&self) -> SqliteProjectRepository<'_> {
        SqliteProjectRepository::new(&self.conn)
    }

    pub fn tasks(&self) -> SqliteTaskRepository<'_> {
        SqliteTaskRepository::new(&self.conn)
    }

    pub fn assignments(&self) -> SqliteAssignmentRepository<'_> {
        SqliteAssignmentRepository::new(&self.conn)
    }

    pub fn add_employee(&mut self, employee: Employee) {
        self.stage(PendingChange::AddEmployee(employee));
    }

    pub fn update_employee(&mut self, employee: Employee) {
        self.stage(PendingChange::UpdateEmployee(employee));
    }

    pub fn remove_employee(&mut self, id: EmployeeId) {
        self.stage(PendingChange::RemoveEmployee(id));
    }

    pub fn add_project(&mut self, project: Project) {
        self.stage(PendingChange::AddProject(project));
    }

    pub fn update_project(&mut self, project: Project) {
        self.stage(PendingChange::UpdateProject(project));
    }

    pub fn remove_project(&mut self, id: ProjectId) {
        self.stage(PendingChange::RemoveProject(id));
    }

    pub fn add_task(&mut self, task: Task) {
        self.stage(PendingChange::AddTask(task));
    }

    pub fn update_task(&mut self, task: Task) {
        self.stage(PendingChange::UpdateTask(task));
    }

    pub fn remove_task(&mut self, id: TaskId) {
        self.stage(PendingChange::RemoveTask(id));
    }

    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.stage(PendingChange::AddAssignment(assignment));
    }

    pub fn remove_assignment(&mut self, assignment: Assignment) {
        self.stage(PendingChange::RemoveAssignment(assignment));
    }

    pub fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_changes(&self) -> &[PendingChange] {
        &self.pending
    }

    /// Drops every staged change without touching the store.
    pub fn discard_changes(&mut self) {
        self.pending.clear();
    }

    /// Flushes all pending changes in one transaction.
    ///
    /// Returns one outcome per staged change. On error nothing is written and
    /// the pending list is kept as it was.
    pub fn save_changes(&mut self) -> RepoResult<Vec<ChangeOutcome>> {
        if self.pending.is_empty() {
            return Ok(Vec::new());
        }

        let started_at = Instant::now();
        let change_count = self.pending.len();

        match apply_all(&mut self.conn, &self.pending) {
            Ok(outcomes) => {
                self.pending.clear();
                info!(
                    "event=unit_of_work_commit module=context status=ok changes={} duration_ms={}",
                    change_count,
                    started_at.elapsed().as_millis()
                );
                Ok(outcomes)
            }
            Err(err) => {
                error!(
                    "event=unit_of_work_commit module=context status=error changes={} duration_ms={} error={}",
                    change_count,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    pub(crate) fn stage(&mut self, change: PendingChange) {
        debug!(
            "event=unit_of_work_stage module=context change={} pending={}",
            change.label(),
            self.pending.len() + 1
        );
        self.pending.push(change);
    }
}

fn apply_all(conn: &mut Connection, pending: &[PendingChange]) -> RepoResult<Vec<ChangeOutcome>> {
    let tx = conn.transaction()?;
    let mut outcomes = Vec::with_capacity(pending.len());
    for change in pending {
        outcomes.push(apply_change(&tx, change)?);
    }
    tx.commit()?;
    Ok(outcomes)
}

fn apply_change(conn: &Connection, change: &PendingChange) -> RepoResult<ChangeOutcome> {
    let employees = SqliteEmployeeRepository::new(conn);
    let projects = SqliteProjectRepository::new(conn);
    let tasks = SqliteTaskRepository::new(conn);
    let assignments = SqliteAssignmentRepository::new(conn);

    let outcome = match change {
        PendingChange::AddEmployee(employee) => inserted(employees.insert_employee(employee)?),
        PendingChange::UpdateEmployee(employee) => affected(employees.update_employee(employee)?),
        PendingChange::RemoveEmployee(id) => affected(employees.delete_employee(*id)?),
        PendingChange::AddProject(project) => inserted(projects.insert_project(project)?),
        PendingChange::UpdateProject(project) => affected(projects.update_project(project)?),
        PendingChange::RemoveProject(id) => affected(projects.delete_project(*id)?),
        PendingChange::AddTask(task) => inserted(tasks.insert_task(task)?),
        PendingChange::UpdateTask(task) => affected(tasks.update_task(task)?),
        PendingChange::RemoveTask(id) => affected(tasks.delete_task(*id)?),
        PendingChange::AddAssignment(assignment) => {
            affected(assignments.insert_assignment(*assignment)?)
        }
        PendingChange::RemoveAssignment(assignment) => {
            affected(assignments.delete_assignment(*assignment)?)
        }
    };
    Ok(outcome)
}

fn inserted(id: i64) -> ChangeOutcome {
    ChangeOutcome {
        rows_affected: 1,
        inserted_id: Some(id),
    }
}

fn affected(rows_affected: usize) -> ChangeOutcome {
    ChangeOutcome {
        rows_affected,
        inserted_id: None,
    }
}
