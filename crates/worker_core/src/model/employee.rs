//! Employee record.

use serde::{Deserialize, Serialize};

use super::assignment::Assignment;
use super::{is_blank, ValidationError};

pub type EmployeeId = i64;

/// A person assignable to projects.
///
/// Task counters are stored values set by callers. `None` means the count was
/// never measured, which is distinct from a measured zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub completed_task_count: Option<i32>,
    pub overdue_task_count: Option<i32>,
    /// Populated only when requested through `EmployeeIncludes`.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl Employee {
    /// Creates an unsaved employee with unmeasured task counters.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            completed_task_count: None,
            overdue_task_count: None,
            assignments: Vec::new(),
        }
    }

    /// Checks the fields required before the record may be inserted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.first_name) {
            return Err(ValidationError::BlankFirstName);
        }
        if is_blank(&self.last_name) {
            return Err(ValidationError::BlankLastName);
        }
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
