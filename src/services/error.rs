//! Error type for the scheduling service layer.

use crate::api::ScheduleConflict;
use crate::db::repository::RepositoryError;
use crate::models::settings::SettingsError;
use crate::models::time::TimeError;
use crate::timetable::SlotError;

/// Result type for scheduling services.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the availability and generation services.
///
/// Transient repository failures stay distinguishable (via
/// [`RepositoryError::is_retryable`]) from conflicts, which must never be
/// retried blindly; retry policy belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// End precedes start, or a generation start date after its end date.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Branch schedule settings are missing or inconsistent.
    #[error("branch schedule not configured: {0}")]
    NotConfigured(#[from] SettingsError),

    /// The proposed booking collides with existing bookings.
    #[error("schedule conflict: {} overlapping booking(s)", .0.len())]
    Conflict(Vec<ScheduleConflict>),

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// The itemized conflict list, when this error is a conflict.
    pub fn conflicts(&self) -> Option<&[ScheduleConflict]> {
        match self {
            Self::Conflict(conflicts) => Some(conflicts),
            _ => None,
        }
    }
}
