//! Project/employee assignment link.

use serde::{Deserialize, Serialize};

use super::employee::EmployeeId;
use super::project::ProjectId;

/// One employee assigned to one project.
///
/// The pair is the row identity; a link carries no other attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Assignment {
    pub project_id: ProjectId,
    pub employee_id: EmployeeId,
}

impl Assignment {
    pub fn new(project_id: ProjectId, employee_id: EmployeeId) -> Self {
        Self {
            project_id,
            employee_id,
        }
    }
}
