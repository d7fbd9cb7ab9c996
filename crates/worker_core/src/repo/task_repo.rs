//! Task repository contract and SQLite implementation.
//!
//! Counting queries used by the employee/project aggregates are expressed as
//! one [`TaskFilter`] so the SQL stays in this module.

use crate::clock::from_epoch_nanos;
use crate::model::employee::EmployeeId;
use crate::model::project::ProjectId;
use crate::model::task::{Task, TaskId};
use crate::repo::{encode_datetime, RepoResult};
use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    project_id,
    employee_id,
    title,
    status,
    end_date
FROM tasks";

/// Status predicate for task filters. Comparison is exact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Any,
    Is(String),
    IsNot(String),
}

/// Conjunctive filter over the `tasks` entity set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub project_id: Option<ProjectId>,
    pub employee_id: Option<EmployeeId>,
    pub status: StatusFilter,
    /// Keeps tasks whose end date is strictly before this instant.
    pub end_before: Option<NaiveDateTime>,
}

impl TaskFilter {
    pub fn for_project(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            ..Self::default()
        }
    }

    pub fn for_employee(employee_id: EmployeeId) -> Self {
        Self {
            employee_id: Some(employee_id),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn ending_before(mut self, instant: NaiveDateTime) -> Self {
        self.end_before = Some(instant);
        self
    }

    fn where_clause(&self) -> RepoResult<(String, Vec<Value>)> {
        let mut sql = String::from(" WHERE 1 = 1");
        let mut bind_values = Vec::new();

        if let Some(project_id) = self.project_id {
            sql.push_str(" AND project_id = ?");
            bind_values.push(Value::Integer(project_id));
        }
        if let Some(employee_id) = self.employee_id {
            sql.push_str(" AND employee_id = ?");
            bind_values.push(Value::Integer(employee_id));
        }
        match &self.status {
            StatusFilter::Any => {}
            StatusFilter::Is(status) => {
                sql.push_str(" AND status = ?");
                bind_values.push(Value::Text(status.clone()));
            }
            StatusFilter::IsNot(status) => {
                sql.push_str(" AND status <> ?");
                bind_values.push(Value::Text(status.clone()));
            }
        }
        if let Some(end_before) = self.end_before {
            sql.push_str(" AND end_date < ?");
            bind_values.push(Value::Integer(encode_datetime(
                end_before,
                "tasks.end_date filter",
            )?));
        }

        Ok((sql, bind_values))
    }
}

/// Repository interface for the `tasks` entity set.
pub trait TaskRepository {
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, filter: &TaskFilter) -> RepoResult<Vec<Task>>;
    fn count_tasks(&self, filter: &TaskFilter) -> RepoResult<u32>;
    fn insert_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn update_task(&self, task: &Task) -> RepoResult<usize>;
    fn delete_task(&self, id: TaskId) -> RepoResult<usize>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self, filter: &TaskFilter) -> RepoResult<Vec<Task>> {
        let (where_sql, bind_values) = filter.where_clause()?;
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL}{where_sql} ORDER BY id ASC;"))?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn count_tasks(&self, filter: &TaskFilter) -> RepoResult<u32> {
        let (where_sql, bind_values) = filter.where_clause()?;
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM tasks{where_sql};"),
            params_from_iter(bind_values),
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }

    fn insert_task(&self, task: &Task) -> RepoResult<TaskId> {
        let end_date = encode_datetime(task.end_date, "tasks.end_date")?;
        self.conn.execute(
            "INSERT INTO tasks (
                project_id,
                employee_id,
                title,
                status,
                end_date
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                task.project_id,
                task.employee_id,
                task.title.as_str(),
                task.status.as_str(),
                end_date,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_task(&self, task: &Task) -> RepoResult<usize> {
        let end_date = encode_datetime(task.end_date, "tasks.end_date")?;
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                project_id = ?1,
                employee_id = ?2,
                title = ?3,
                status = ?4,
                end_date = ?5
             WHERE id = ?6;",
            params![
                task.project_id,
                task.employee_id,
                task.title.as_str(),
                task.status.as_str(),
                end_date,
                task.id,
            ],
        )?;
        Ok(changed)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<usize> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        Ok(changed)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    Ok(Task {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        employee_id: row.get("employee_id")?,
        title: row.get("title")?,
        status: row.get("status")?,
        end_date: from_epoch_nanos(row.get("end_date")?),
    })
}
