//! Task record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::employee::EmployeeId;
use super::project::ProjectId;
use super::{is_blank, ValidationError};

pub type TaskId = i64;

/// The only status literal with special meaning. Matching is exact.
pub const TASK_STATUS_COMPLETED: &str = "Completed";

/// A unit of work owned by one project and one employee.
///
/// `status` is an open string; only [`TASK_STATUS_COMPLETED`] drives behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub employee_id: EmployeeId,
    pub title: String,
    pub status: String,
    pub end_date: NaiveDateTime,
}

impl Task {
    pub fn new(
        project_id: ProjectId,
        employee_id: EmployeeId,
        title: impl Into<String>,
        status: impl Into<String>,
        end_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: 0,
            project_id,
            employee_id,
            title: title.into(),
            status: status.into(),
            end_date,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.title) {
            return Err(ValidationError::BlankTaskTitle);
        }
        if is_blank(&self.status) {
            return Err(ValidationError::BlankTaskStatus);
        }
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == TASK_STATUS_COMPLETED
    }

    /// Past its end date at `now` and not completed.
    pub fn is_overdue_at(&self, now: NaiveDateTime) -> bool {
        self.end_date < now && !self.is_completed()
    }
}
