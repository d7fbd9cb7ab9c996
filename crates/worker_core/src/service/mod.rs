//! Core use-case services.
//!
//! # Responsibility
//! - Validate caller input before any store access.
//! - Run one load/mutate/save cycle per call against a borrowed `DbContext`.
//! - Derive the aggregate figures (counts, scores, delay, completion).
//!
//! # Invariants
//! - Services hold no state across calls besides the context and clock they
//!   were constructed with.
//! - Every store failure surfaces as `ServiceError::Storage` carrying the
//!   original cause.
//! - A mutation commits only the change it staged. It refuses a context that
//!   already holds pending changes, and withdraws its own change when the
//!   commit fails, so a failed write is never flushed by a later call.
//! - Missing rows are a hard `NotFound` on update/delay paths, `Ok(None)` on
//!   get paths and `Ok(false)` on delete paths.

pub mod employee_service;
pub mod project_service;
pub mod task_service;

use crate::context::{ChangeOutcome, DbContext, PendingChange};
use crate::model::ValidationError;
use crate::repo::RepoError;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors returned by employee/project/task services.
#[derive(Debug)]
pub enum ServiceError {
    /// Caller-supplied data failed a precondition; nothing was read or written.
    Validation(ValidationError),
    /// A referenced entity does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// The underlying store operation failed.
    Storage {
        operation: String,
        source: RepoError,
    },
    /// The context already holds changes staged outside this service.
    UncommittedChanges { pending: usize },
    /// A commit succeeded but did not report what the service expected.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} with id {id} not found"),
            Self::Storage { operation, source } => write!(f, "{operation}: {source}"),
            Self::UncommittedChanges { pending } => write!(
                f,
                "context holds {pending} uncommitted change(s); save or discard them first"
            ),
            Self::InconsistentState(details) => write!(f, "inconsistent store state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage { source, .. } => Some(source),
            Self::NotFound { .. }
            | Self::UncommittedChanges { .. }
            | Self::InconsistentState(_) => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Builds a `map_err` adapter labelling a repository failure.
pub(crate) fn storage(operation: impl Into<String>) -> impl FnOnce(RepoError) -> ServiceError {
    let operation = operation.into();
    move |source| ServiceError::Storage { operation, source }
}

/// Stages `change` on an otherwise clean context and commits it alone.
///
/// On failure the change is withdrawn, leaving the context clean again.
pub(crate) fn commit_change(
    ctx: &mut DbContext,
    change: PendingChange,
    operation: impl Into<String>,
) -> ServiceResult<ChangeOutcome> {
    if ctx.has_changes() {
        return Err(ServiceError::UncommittedChanges {
            pending: ctx.pending_changes().len(),
        });
    }

    ctx.stage(change);
    match ctx.save_changes() {
        Ok(outcomes) => outcomes
            .into_iter()
            .next()
            .ok_or(ServiceError::InconsistentState("commit reported no outcome")),
        Err(source) => {
            ctx.discard_changes();
            Err(storage(operation)(source))
        }
    }
}

/// Id the store assigned to a committed insert.
pub(crate) fn inserted_id(outcome: ChangeOutcome) -> ServiceResult<i64> {
    outcome.inserted_id.ok_or(ServiceError::InconsistentState(
        "insert committed without an assigned id",
    ))
}

/// `part / whole * 100`, or zero when `whole` is zero.
pub(crate) fn percentage(part: u32, whole: u32) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) / Decimal::from(whole) * Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::percentage;
    use rust_decimal::Decimal;

    #[test]
    fn percentage_of_zero_whole_is_zero() {
        assert_eq!(percentage(0, 0), Decimal::ZERO);
    }

    #[test]
    fn percentage_keeps_decimal_precision() {
        assert_eq!(percentage(5, 7).round_dp(2), Decimal::new(7143, 2));
        assert_eq!(percentage(1, 4), Decimal::from(25));
    }
}
