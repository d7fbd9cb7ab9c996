//! Project repository contract and SQLite implementation.

use crate::clock::from_epoch_nanos;
use crate::model::project::{Project, ProjectId};
use crate::repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskFilter, TaskRepository};
use crate::repo::{encode_datetime, ProjectIncludes, RepoResult};
use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    name,
    start_date,
    end_date,
    delay_days
FROM projects";

/// Date-window predicate for project listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectWindow {
    #[default]
    All,
    /// `end_date` strictly before the instant.
    EndingBefore(NaiveDateTime),
    /// `start_date <= instant <= end_date`.
    ActiveAt(NaiveDateTime),
}

/// Repository interface for the `projects` entity set.
pub trait ProjectRepository {
    fn get_project(&self, id: ProjectId, includes: ProjectIncludes)
        -> RepoResult<Option<Project>>;
    fn list_projects(
        &self,
        window: ProjectWindow,
        includes: ProjectIncludes,
    ) -> RepoResult<Vec<Project>>;
    /// Inserts the record ignoring `project.id`; returns the assigned id.
    fn insert_project(&self, project: &Project) -> RepoResult<ProjectId>;
    /// Overwrites scalar columns; returns affected rows.
    fn update_project(&self, project: &Project) -> RepoResult<usize>;
    fn delete_project(&self, id: ProjectId) -> RepoResult<usize>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn populate(&self, project: &mut Project, includes: ProjectIncludes) -> RepoResult<()> {
        if includes.assignments {
            project.assignments =
                SqliteAssignmentRepository::new(self.conn).list_for_project(project.id)?;
        }
        if includes.tasks {
            project.tasks = SqliteTaskRepository::new(self.conn)
                .list_tasks(&TaskFilter::for_project(project.id))?;
        }
        Ok(())
    }

    fn query_projects(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn get_project(
        &self,
        id: ProjectId,
        includes: ProjectIncludes,
    ) -> RepoResult<Option<Project>> {
        let found = self.query_projects(
            &format!("{PROJECT_SELECT_SQL} WHERE id = ?;"),
            vec![Value::Integer(id)],
        )?;

        match found.into_iter().next() {
            Some(mut project) => {
                self.populate(&mut project, includes)?;
                Ok(Some(project))
            }
            None => Ok(None),
        }
    }

    fn list_projects(
        &self,
        window: ProjectWindow,
        includes: ProjectIncludes,
    ) -> RepoResult<Vec<Project>> {
        let mut sql = format!("{PROJECT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values = Vec::new();

        match window {
            ProjectWindow::All => {}
            ProjectWindow::EndingBefore(instant) => {
                sql.push_str(" AND end_date < ?");
                bind_values.push(Value::Integer(encode_datetime(
                    instant,
                    "projects.end_date filter",
                )?));
            }
            ProjectWindow::ActiveAt(instant) => {
                let at = encode_datetime(instant, "projects date filter")?;
                sql.push_str(" AND start_date <= ? AND end_date >= ?");
                bind_values.push(Value::Integer(at));
                bind_values.push(Value::Integer(at));
            }
        }
        sql.push_str(" ORDER BY id ASC;");

        let mut projects = self.query_projects(&sql, bind_values)?;
        for project in &mut projects {
            self.populate(project, includes)?;
        }
        Ok(projects)
    }

    fn insert_project(&self, project: &Project) -> RepoResult<ProjectId> {
        let start_date = encode_datetime(project.start_date, "projects.start_date")?;
        let end_date = encode_datetime(project.end_date, "projects.end_date")?;
        self.conn.execute(
            "INSERT INTO projects (
                name,
                start_date,
                end_date,
                delay_days
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                project.name.as_str(),
                start_date,
                end_date,
                project.delay_days,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_project(&self, project: &Project) -> RepoResult<usize> {
        let start_date = encode_datetime(project.start_date, "projects.start_date")?;
        let end_date = encode_datetime(project.end_date, "projects.end_date")?;
        let changed = self.conn.execute(
            "UPDATE projects
             SET
                name = ?1,
                start_date = ?2,
                end_date = ?3,
                delay_days = ?4
             WHERE id = ?5;",
            params![
                project.name.as_str(),
                start_date,
                end_date,
                project.delay_days,
                project.id,
            ],
        )?;
        Ok(changed)
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<usize> {
        let changed = self.conn.execute("DELETE FROM projects WHERE id = ?1;", [id])?;
        Ok(changed)
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        start_date: from_epoch_nanos(row.get("start_date")?),
        end_date: from_epoch_nanos(row.get("end_date")?),
        delay_days: row.get("delay_days")?,
        assignments: Vec::new(),
        tasks: Vec::new(),
    })
}
