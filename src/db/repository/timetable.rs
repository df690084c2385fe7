//! Timetable template and slot repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{
    BranchId, ClassId, ClassSubjectId, RoomId, TimetableId, TimetableSlot, TimetableSlotId,
    TimetableTemplate,
};
use crate::models::time::TimeOfDay;
use crate::models::weekday::DayOfWeek;

/// Payload for creating or replacing a template slot; the repository assigns
/// the id on creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTimetableSlot {
    pub timetable: TimetableId,
    pub class_obj: ClassId,
    pub class_subject: ClassSubjectId,
    pub day_of_week: DayOfWeek,
    pub lesson_number: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub room: Option<RoomId>,
}

/// Repository trait for recurring weekly templates and their slots.
///
/// Implementations must enforce the template uniqueness invariants as hard
/// constraints: within one template no two slots may share
/// (class, day, lesson_number), (teacher, day, lesson_number), or
/// (room, day, lesson_number). Violations are reported as
/// `RepositoryError::ConflictError`.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait TimetableRepository: Send + Sync {
    /// Create a new template for a branch.
    async fn create_template(
        &self,
        branch: BranchId,
        name: &str,
    ) -> RepositoryResult<TimetableTemplate>;

    /// Fetch a template by id.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the template doesn't exist
    async fn get_template(&self, id: TimetableId) -> RepositoryResult<TimetableTemplate>;

    /// List all templates of a branch.
    async fn list_templates(&self, branch: BranchId) -> RepositoryResult<Vec<TimetableTemplate>>;

    /// List the slots of a template, optionally restricted to one weekday.
    async fn list_slots(
        &self,
        timetable: TimetableId,
        day: Option<DayOfWeek>,
    ) -> RepositoryResult<Vec<TimetableSlot>>;

    /// Create a slot inside its template.
    ///
    /// # Returns
    /// * `Ok(TimetableSlot)` - The stored slot with its assigned id
    /// * `Err(RepositoryError::ConflictError)` - If the slot double-books a
    ///   class, teacher, or room
    async fn create_slot(&self, slot: &NewTimetableSlot) -> RepositoryResult<TimetableSlot>;

    /// Replace a slot's bindings; the uniqueness checks re-run against the new
    /// (class, day, lesson_number) position. Drag-and-drop reassignment in the
    /// editor is exactly this operation.
    async fn update_slot(
        &self,
        id: TimetableSlotId,
        slot: &NewTimetableSlot,
    ) -> RepositoryResult<TimetableSlot>;

    /// Delete a slot.
    async fn delete_slot(&self, id: TimetableSlotId) -> RepositoryResult<()>;
}
