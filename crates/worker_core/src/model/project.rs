//! Project record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::assignment::Assignment;
use super::task::Task;
use super::{is_blank, ValidationError};

pub type ProjectId = i64;

/// A unit of work with a planned date range.
///
/// `delay_days` is a stored, caller-maintained figure. It is never derived
/// from the dates; see `ProjectService::calculate_delay` for the computed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub delay_days: Option<i32>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn new(name: impl Into<String>, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            id: 0,
            name: name.into(),
            start_date,
            end_date,
            delay_days: None,
            assignments: Vec::new(),
            tasks: Vec::new(),
        }
    }

    /// Checks the creation preconditions: non-blank name and `start < end`.
    ///
    /// Updates do not re-check the date range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError::BlankProjectName);
        }
        if self.start_date >= self.end_date {
            return Err(ValidationError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Whether `now` falls inside `[start_date, end_date]`.
    pub fn is_active_at(&self, now: NaiveDateTime) -> bool {
        self.start_date <= now && now <= self.end_date
    }
}
