//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Times serialize as `"HH:mm:ss"` (accepting `"HH:mm"` on input) and
//! weekdays as lowercase English names; both conversions are owned by the
//! model types, so no raw strings or integers leak past this boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{
    BranchId, ClassId, ClassSubjectId, LessonInstance, LessonStatus, NewLessonInstance, RoomId,
    TimetableId, TimetableTemplate,
};
use crate::db::repository::NewTimetableSlot;
use crate::models::time::TimeOfDay;
use crate::models::weekday::DayOfWeek;

// Re-export response types that are already serializable
pub use crate::api::{GenerationSummary, ScheduleAvailabilityResult};
pub use crate::timetable::DaySlot;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Repository connection status
    pub database: String,
}

/// Request body for creating a timetable template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    pub branch_id: BranchId,
    pub name: String,
}

/// Template list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateListResponse {
    pub timetables: Vec<TimetableTemplate>,
    pub total: usize,
}

/// Slot creation/update payload.
///
/// Field naming is bit-exact with the backend contract: `day_of_week` is a
/// lowercase weekday name, times are `"HH:mm:ss"` strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotPayload {
    pub timetable: TimetableId,
    pub class_obj: ClassId,
    pub class_subject: ClassSubjectId,
    pub day_of_week: DayOfWeek,
    pub lesson_number: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomId>,
}

impl From<SlotPayload> for NewTimetableSlot {
    fn from(payload: SlotPayload) -> Self {
        Self {
            timetable: payload.timetable,
            class_obj: payload.class_obj,
            class_subject: payload.class_subject,
            day_of_week: payload.day_of_week,
            lesson_number: payload.lesson_number,
            start_time: payload.start_time,
            end_time: payload.end_time,
            room: payload.room,
        }
    }
}

/// Query parameters for slot listing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SlotsQuery {
    #[serde(default)]
    pub day_of_week: Option<DayOfWeek>,
}

/// Query parameters for lesson listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonsQuery {
    pub branch_id: BranchId,
    #[serde(default)]
    pub class_id: Option<ClassId>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

/// Lesson list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonListResponse {
    pub lessons: Vec<LessonInstance>,
    pub total: usize,
}

/// Request body for the availability-checked "add lesson" flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLessonRequest {
    pub branch_id: BranchId,
    pub class_obj: ClassId,
    pub class_subject: ClassSubjectId,
    pub date: NaiveDate,
    pub lesson_number: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl CreateLessonRequest {
    pub fn into_new_lesson(self) -> (BranchId, NewLessonInstance) {
        (
            self.branch_id,
            NewLessonInstance {
                class_obj: self.class_obj,
                class_subject: self.class_subject,
                date: self.date,
                lesson_number: self.lesson_number,
                start_time: self.start_time,
                end_time: self.end_time,
                room: self.room,
                topic: self.topic,
                is_auto_generated: false,
            },
        )
    }
}

/// Patch body for lesson updates; omitted fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateLessonRequest {
    #[serde(default)]
    pub status: Option<LessonStatus>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub homework: Option<String>,
    #[serde(default)]
    pub teacher_notes: Option<String>,
    #[serde(default)]
    pub room: Option<RoomId>,
}

/// Query parameters for the availability endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub branch_id: BranchId,
    pub class_id: ClassId,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

/// Request body for bulk lesson generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateLessonsRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Keep existing instances instead of overwriting them (default: true).
    #[serde(default = "default_true")]
    pub skip_existing: bool,
}

fn default_true() -> bool {
    true
}
