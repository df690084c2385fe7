//! High-level persistence service functions.
//!
//! Thin orchestration over the repository traits: each function works with any
//! repository implementation and attaches the operation name to errors for
//! diagnostics. Scheduling business logic (availability, bulk generation)
//! lives in [`crate::services`], not here.

use chrono::NaiveDate;

use crate::api::{
    BranchId, BranchScheduleSettings, ClassId, ClassSubject, LessonId, LessonInstance, Room,
    TimetableId, TimetableSlot, TimetableSlotId, TimetableTemplate,
};
use crate::db::models::LessonFilter;
use crate::db::repository::{FullRepository, NewTimetableSlot, RepositoryResult};
use crate::models::weekday::DayOfWeek;

pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Branch settings ====================

pub async fn get_settings(
    repo: &dyn FullRepository,
    branch: BranchId,
) -> RepositoryResult<BranchScheduleSettings> {
    repo.get_settings(branch)
        .await
        .map_err(|e| e.with_operation("get_settings"))
}

pub async fn update_settings(
    repo: &dyn FullRepository,
    branch: BranchId,
    settings: &BranchScheduleSettings,
) -> RepositoryResult<()> {
    repo.update_settings(branch, settings)
        .await
        .map_err(|e| e.with_operation("update_settings"))
}

// ==================== Catalog ====================

pub async fn list_class_subjects(
    repo: &dyn FullRepository,
    branch: BranchId,
    class: Option<ClassId>,
) -> RepositoryResult<Vec<ClassSubject>> {
    repo.list_class_subjects(branch, class)
        .await
        .map_err(|e| e.with_operation("list_class_subjects"))
}

pub async fn list_rooms(repo: &dyn FullRepository, branch: BranchId) -> RepositoryResult<Vec<Room>> {
    repo.list_rooms(branch)
        .await
        .map_err(|e| e.with_operation("list_rooms"))
}

// ==================== Timetable templates and slots ====================

pub async fn create_template(
    repo: &dyn FullRepository,
    branch: BranchId,
    name: &str,
) -> RepositoryResult<TimetableTemplate> {
    repo.create_template(branch, name)
        .await
        .map_err(|e| e.with_operation("create_template"))
}

pub async fn list_templates(
    repo: &dyn FullRepository,
    branch: BranchId,
) -> RepositoryResult<Vec<TimetableTemplate>> {
    repo.list_templates(branch)
        .await
        .map_err(|e| e.with_operation("list_templates"))
}

pub async fn list_slots(
    repo: &dyn FullRepository,
    timetable: TimetableId,
    day: Option<DayOfWeek>,
) -> RepositoryResult<Vec<TimetableSlot>> {
    repo.list_slots(timetable, day)
        .await
        .map_err(|e| e.with_operation("list_slots"))
}

pub async fn create_slot(
    repo: &dyn FullRepository,
    slot: &NewTimetableSlot,
) -> RepositoryResult<TimetableSlot> {
    repo.create_slot(slot)
        .await
        .map_err(|e| e.with_operation("create_slot"))
}

pub async fn update_slot(
    repo: &dyn FullRepository,
    id: TimetableSlotId,
    slot: &NewTimetableSlot,
) -> RepositoryResult<TimetableSlot> {
    repo.update_slot(id, slot)
        .await
        .map_err(|e| e.with_operation("update_slot"))
}

pub async fn delete_slot(repo: &dyn FullRepository, id: TimetableSlotId) -> RepositoryResult<()> {
    repo.delete_slot(id)
        .await
        .map_err(|e| e.with_operation("delete_slot"))
}

// ==================== Lesson instances ====================

pub async fn list_lessons(
    repo: &dyn FullRepository,
    filter: &LessonFilter,
) -> RepositoryResult<Vec<LessonInstance>> {
    repo.list_instances(filter)
        .await
        .map_err(|e| e.with_operation("list_instances"))
}

pub async fn find_lesson(
    repo: &dyn FullRepository,
    class: ClassId,
    date: NaiveDate,
    lesson_number: u8,
) -> RepositoryResult<Option<LessonInstance>> {
    repo.find_instance(class, date, lesson_number)
        .await
        .map_err(|e| e.with_operation("find_instance"))
}

pub async fn get_lesson(
    repo: &dyn FullRepository,
    id: LessonId,
) -> RepositoryResult<LessonInstance> {
    repo.get_instance(id)
        .await
        .map_err(|e| e.with_operation("get_instance"))
}

pub async fn update_lesson(
    repo: &dyn FullRepository,
    lesson: &LessonInstance,
) -> RepositoryResult<LessonInstance> {
    repo.update_instance(lesson)
        .await
        .map_err(|e| e.with_operation("update_instance"))
}

pub async fn delete_lesson(repo: &dyn FullRepository, id: LessonId) -> RepositoryResult<()> {
    repo.delete_instance(id)
        .await
        .map_err(|e| e.with_operation("delete_instance"))
}
