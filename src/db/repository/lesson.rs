//! Lesson instance repository trait: concrete, dated occurrences.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::api::{ClassId, LessonId, LessonInstance, NewLessonInstance};
use crate::db::models::LessonFilter;

/// Repository trait for lesson instances.
///
/// Implementations must enforce the booking invariants as hard constraints at
/// write time: no two occupying lessons may share (class, date,
/// lesson_number), and no teacher or room may be booked into overlapping
/// times on one date. Read-time availability checks are advisory only; a
/// `ConflictError` from a write is the authoritative signal.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait LessonRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the persistence collaborator is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Lesson Instance Operations ====================

    /// List instances matching a filter (branch scope plus optional class,
    /// single date, or date range).
    async fn list_instances(&self, filter: &LessonFilter) -> RepositoryResult<Vec<LessonInstance>>;

    /// Find the instance occupying `(class, date, lesson_number)`, if any.
    /// Cancelled lessons do not occupy their slot.
    async fn find_instance(
        &self,
        class: ClassId,
        date: NaiveDate,
        lesson_number: u8,
    ) -> RepositoryResult<Option<LessonInstance>>;

    /// Fetch an instance by id.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the instance doesn't exist
    async fn get_instance(&self, id: LessonId) -> RepositoryResult<LessonInstance>;

    /// Store a new instance.
    ///
    /// # Returns
    /// * `Ok(LessonInstance)` - The stored instance with assigned id and
    ///   timestamps
    /// * `Err(RepositoryError::ConflictError)` - If the booking invariants are
    ///   violated
    async fn create_instance(&self, lesson: &NewLessonInstance) -> RepositoryResult<LessonInstance>;

    /// Replace an instance; booking invariants re-run against the new values
    /// and `updated_at` is refreshed.
    async fn update_instance(&self, lesson: &LessonInstance) -> RepositoryResult<LessonInstance>;

    /// Delete an instance. Deletion is always an explicit caller action.
    async fn delete_instance(&self, id: LessonId) -> RepositoryResult<()>;
}
