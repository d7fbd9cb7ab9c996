//! Repository layer: per-entity data access over SQLite.
//!
//! # Responsibility
//! - Define one repository contract per entity set.
//! - Keep SQL details out of the unit of work and the services.
//!
//! # Invariants
//! - Repositories never validate business preconditions; services do.
//! - Read paths reject malformed persisted values (`InvalidData`) instead of
//!   masking them.
//! - Relations are loaded only when the caller's include options ask for them.

pub mod assignment_repo;
pub mod employee_repo;
pub mod project_repo;
pub mod task_repo;

use crate::clock::to_epoch_nanos;
use crate::db::DbError;
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure of a repository read or write.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    /// A value supplied for a write or filter has no stored representation.
    UnsupportedValue(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UnsupportedValue(message) => write!(f, "value cannot be stored: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::UnsupportedValue(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Relations populated on employee reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmployeeIncludes {
    pub assignments: bool,
}

impl EmployeeIncludes {
    pub const NONE: Self = Self { assignments: false };
    pub const ALL: Self = Self { assignments: true };
}

/// Relations populated on project reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectIncludes {
    pub assignments: bool,
    pub tasks: bool,
}

impl ProjectIncludes {
    pub const NONE: Self = Self {
        assignments: false,
        tasks: false,
    };
    pub const ALL: Self = Self {
        assignments: true,
        tasks: true,
    };
    pub const TASKS: Self = Self {
        assignments: false,
        tasks: true,
    };
}

/// Encodes a date for a date column or a date filter bind.
pub(crate) fn encode_datetime(value: NaiveDateTime, column: &str) -> RepoResult<i64> {
    to_epoch_nanos(value).ok_or_else(|| {
        RepoError::UnsupportedValue(format!("date {value} out of storable range for {column}"))
    })
}
