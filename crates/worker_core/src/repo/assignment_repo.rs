//! Assignment (project/employee link) repository.

use crate::model::assignment::Assignment;
use crate::model::employee::EmployeeId;
use crate::model::project::ProjectId;
use crate::repo::RepoResult;
use rusqlite::{params, Connection, Row};

/// Repository interface for the `project_employees` link table.
pub trait AssignmentRepository {
    fn list_for_employee(&self, employee_id: EmployeeId) -> RepoResult<Vec<Assignment>>;
    fn list_for_project(&self, project_id: ProjectId) -> RepoResult<Vec<Assignment>>;
    fn exists(&self, assignment: Assignment) -> RepoResult<bool>;
    /// Returns affected rows; `0` when the link already exists.
    fn insert_assignment(&self, assignment: Assignment) -> RepoResult<usize>;
    fn delete_assignment(&self, assignment: Assignment) -> RepoResult<usize>;
}

/// SQLite-backed assignment repository.
pub struct SqliteAssignmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssignmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query(&self, sql: &str, id: i64) -> RepoResult<Vec<Assignment>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([id], parse_assignment_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl AssignmentRepository for SqliteAssignmentRepository<'_> {
    fn list_for_employee(&self, employee_id: EmployeeId) -> RepoResult<Vec<Assignment>> {
        self.query(
            "SELECT project_id, employee_id
             FROM project_employees
             WHERE employee_id = ?1
             ORDER BY project_id ASC;",
            employee_id,
        )
    }

    fn list_for_project(&self, project_id: ProjectId) -> RepoResult<Vec<Assignment>> {
        self.query(
            "SELECT project_id, employee_id
             FROM project_employees
             WHERE project_id = ?1
             ORDER BY employee_id ASC;",
            project_id,
        )
    }

    fn exists(&self, assignment: Assignment) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM project_employees
                WHERE project_id = ?1 AND employee_id = ?2
            );",
            params![assignment.project_id, assignment.employee_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn insert_assignment(&self, assignment: Assignment) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO project_employees (project_id, employee_id)
             VALUES (?1, ?2);",
            params![assignment.project_id, assignment.employee_id],
        )?;
        Ok(changed)
    }

    fn delete_assignment(&self, assignment: Assignment) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "DELETE FROM project_employees WHERE project_id = ?1 AND employee_id = ?2;",
            params![assignment.project_id, assignment.employee_id],
        )?;
        Ok(changed)
    }
}

fn parse_assignment_row(row: &Row<'_>) -> rusqlite::Result<Assignment> {
    Ok(Assignment {
        project_id: row.get("project_id")?,
        employee_id: row.get("employee_id")?,
    })
}
