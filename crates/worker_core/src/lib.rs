//! Core data and service layer for the worker tracker.
//!
//! Employees, projects, tasks and their assignments live in SQLite. Callers
//! open a [`DbContext`], hand it to a service, and receive plain records back.

pub mod clock;
pub mod config;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use context::{ChangeOutcome, DbContext, PendingChange};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::assignment::Assignment;
pub use model::employee::{Employee, EmployeeId};
pub use model::project::{Project, ProjectId};
pub use model::task::{Task, TaskId, TASK_STATUS_COMPLETED};
pub use model::ValidationError;
pub use repo::{EmployeeIncludes, ProjectIncludes, RepoError, RepoResult};
pub use service::employee_service::EmployeeService;
pub use service::project_service::ProjectService;
pub use service::task_service::TaskService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
