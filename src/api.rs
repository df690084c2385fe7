//! Public API surface for the timetable backend.
//!
//! This file consolidates the identifier newtypes and domain entities shared
//! by the scheduling core, the repository layer, and the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::define_id_type;

pub use crate::models::time::{LessonTiming, TimeOfDay};
pub use crate::models::weekday::DayOfWeek;

define_id_type!(i64, BranchId);
define_id_type!(i64, ClassId);
define_id_type!(i64, ClassSubjectId);
define_id_type!(i64, TeacherId);
define_id_type!(i64, RoomId);
define_id_type!(i64, TimetableId);
define_id_type!(i64, TimetableSlotId);
define_id_type!(i64, LessonId);

pub use crate::models::settings::BranchScheduleSettings;

/// The binding of a subject to a specific class, including the assigned
/// teacher. Catalog data, read-only for the scheduling core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSubject {
    pub id: ClassSubjectId,
    pub branch: BranchId,
    pub class_obj: ClassId,
    pub subject_name: String,
    pub teacher: TeacherId,
    pub teacher_name: String,
}

/// A bookable room within a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub branch: BranchId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

/// A named recurring weekly pattern, scoped to a branch.
///
/// The template exclusively owns its slots; slots cannot outlive or be
/// reassigned across templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableTemplate {
    pub id: TimetableId,
    pub branch: BranchId,
    pub name: String,
}

/// One cell of a weekly template: a class/subject/teacher booking at a fixed
/// day-of-week and lesson number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableSlot {
    pub id: TimetableSlotId,
    pub timetable: TimetableId,
    pub class_obj: ClassId,
    pub class_subject: ClassSubjectId,
    pub day_of_week: DayOfWeek,
    pub lesson_number: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomId>,
}

/// Lifecycle state of a concrete lesson.
///
/// Cancelled lessons no longer occupy their slot for conflict purposes, so a
/// cancelled period can be rebooked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    Planned,
    Completed,
    Cancelled,
}

/// A concrete, dated occurrence of a class meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonInstance {
    pub id: LessonId,
    pub class_obj: ClassId,
    pub class_subject: ClassSubjectId,
    pub date: NaiveDate,
    pub lesson_number: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomId>,
    pub status: LessonStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homework: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_notes: Option<String>,
    pub is_auto_generated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LessonInstance {
    /// Whether this lesson occupies its class/teacher/room for conflict
    /// checking purposes.
    pub fn occupies_slot(&self) -> bool {
        self.status != LessonStatus::Cancelled
    }
}

/// Payload for creating a lesson instance; the repository assigns id and
/// timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLessonInstance {
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
    #[serde(default)]
    pub is_auto_generated: bool,
}

/// Which resource a detected conflict is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictResource {
    Class,
    Teacher,
    Room,
}

/// A structured description of one detected overlap with an existing booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConflict {
    pub resource: ConflictResource,
    pub message: String,
    /// The existing lesson that occupies the slot, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<LessonId>,
}

impl ScheduleConflict {
    pub fn new(resource: ConflictResource, message: impl Into<String>) -> Self {
        Self {
            resource,
            message: message.into(),
            lesson_id: None,
        }
    }

    pub fn with_lesson(mut self, lesson_id: LessonId) -> Self {
        self.lesson_id = Some(lesson_id);
        self
    }
}

/// A subject (with its teacher) free at the requested time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectOption {
    pub id: ClassSubjectId,
    pub subject_name: String,
    pub teacher_name: String,
}

/// A room free at the requested time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomOption {
    pub id: RoomId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

/// Read-time availability answer for one class/date/time. Ephemeral, never
/// persisted; write rejection remains the authoritative conflict signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAvailabilityResult {
    pub available_subjects: Vec<SubjectOption>,
    pub available_rooms: Vec<RoomOption>,
    pub conflicts: Vec<ScheduleConflict>,
}

/// Outcome of bulk lesson generation over a date range.
///
/// `errors` records per-instance failures; generation continues past them and
/// the counters always reflect the work actually done.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}
