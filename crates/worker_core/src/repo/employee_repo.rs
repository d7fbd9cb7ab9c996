//! Employee repository contract and SQLite implementation.

use crate::model::employee::{Employee, EmployeeId};
use crate::repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
use crate::repo::{EmployeeIncludes, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    completed_task_count,
    overdue_task_count
FROM employees";

/// Repository interface for the `employees` entity set.
pub trait EmployeeRepository {
    fn get_employee(
        &self,
        id: EmployeeId,
        includes: EmployeeIncludes,
    ) -> RepoResult<Option<Employee>>;
    fn list_employees(&self, includes: EmployeeIncludes) -> RepoResult<Vec<Employee>>;
    /// Inserts the record ignoring `employee.id`; returns the assigned id.
    fn insert_employee(&self, employee: &Employee) -> RepoResult<EmployeeId>;
    /// Overwrites scalar columns; returns affected rows.
    fn update_employee(&self, employee: &Employee) -> RepoResult<usize>;
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<usize>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn populate(&self, employee: &mut Employee, includes: EmployeeIncludes) -> RepoResult<()> {
        if includes.assignments {
            employee.assignments =
                SqliteAssignmentRepository::new(self.conn).list_for_employee(employee.id)?;
        }
        Ok(())
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn get_employee(
        &self,
        id: EmployeeId,
        includes: EmployeeIncludes,
    ) -> RepoResult<Option<Employee>> {
        let employee = self
            .conn
            .query_row(
                &format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_employee_row,
            )
            .optional()?;

        match employee {
            Some(mut employee) => {
                self.populate(&mut employee, includes)?;
                Ok(Some(employee))
            }
            None => Ok(None),
        }
    }

    fn list_employees(&self, includes: EmployeeIncludes) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut employees = stmt
            .query_map([], parse_employee_row)?
            .collect::<Result<Vec<_>, _>>()?;

        for employee in &mut employees {
            self.populate(employee, includes)?;
        }
        Ok(employees)
    }

    fn insert_employee(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        self.conn.execute(
            "INSERT INTO employees (
                first_name,
                last_name,
                completed_task_count,
                overdue_task_count
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                employee.first_name.as_str(),
                employee.last_name.as_str(),
                employee.completed_task_count,
                employee.overdue_task_count,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_employee(&self, employee: &Employee) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE employees
             SET
                first_name = ?1,
                last_name = ?2,
                completed_task_count = ?3,
                overdue_task_count = ?4
             WHERE id = ?5;",
            params![
                employee.first_name.as_str(),
                employee.last_name.as_str(),
                employee.completed_task_count,
                employee.overdue_task_count,
                employee.id,
            ],
        )?;
        Ok(changed)
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<usize> {
        let changed = self.conn.execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        Ok(changed)
    }
}

fn parse_employee_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        completed_task_count: row.get("completed_task_count")?,
        overdue_task_count: row.get("overdue_task_count")?,
        assignments: Vec::new(),
    })
}
