//! Domain records for employees, projects, tasks and their assignments.
//!
//! # Invariants
//! - Identities are store-assigned integers; `0` marks a record not yet stored.
//! - Relation collections (`assignments`, `tasks`) are populated only when a
//!   read asks for them through its include options.

pub mod assignment;
pub mod employee;
pub mod project;
pub mod task;

use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;

/// Caller-supplied record failed a precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    BlankFirstName,
    BlankLastName,
    BlankProjectName,
    InvalidDateRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    BlankTaskTitle,
    BlankTaskStatus,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankFirstName => write!(f, "employee first name is required"),
            Self::BlankLastName => write!(f, "employee last name is required"),
            Self::BlankProjectName => write!(f, "project name is required"),
            Self::InvalidDateRange { start, end } => {
                write!(f, "start date {start} must be before end date {end}")
            }
            Self::BlankTaskTitle => write!(f, "task title is required"),
            Self::BlankTaskStatus => write!(f, "task status is required"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
