//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits,
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMap structures, providing fast, deterministic, isolated
//! execution — and it enforces the same booking invariants a production
//! backend must guarantee, so conflict paths are exercised realistically.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::api::{
    BranchId, BranchScheduleSettings, ClassId, ClassSubject, ClassSubjectId, LessonId,
    LessonInstance, LessonStatus, NewLessonInstance, Room, RoomId, TeacherId, TimetableId,
    TimetableSlot, TimetableSlotId, TimetableTemplate,
};
use crate::db::models::LessonFilter;
use crate::db::repository::{
    CatalogRepository, ErrorContext, LessonRepository, NewTimetableSlot, RepositoryError,
    RepositoryResult, SettingsRepository, TimetableRepository,
};
use crate::models::time::TimeOfDay;
use crate::models::weekday::DayOfWeek;

/// In-memory local repository.
///
/// # Example
/// ```ignore
/// let repo = LocalRepository::new();
/// repo.put_settings(BranchId::new(1), &BranchScheduleSettings::default());
/// let settings = repo.get_settings(BranchId::new(1)).await.unwrap();
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    settings: HashMap<BranchId, BranchScheduleSettings>,
    class_subjects: HashMap<ClassSubjectId, ClassSubject>,
    rooms: HashMap<RoomId, Room>,
    templates: HashMap<TimetableId, TimetableTemplate>,
    slots: HashMap<TimetableSlotId, TimetableSlot>,
    lessons: HashMap<LessonId, LessonInstance>,

    // ID counters
    next_template_id: i64,
    next_slot_id: i64,
    next_lesson_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            settings: HashMap::new(),
            class_subjects: HashMap::new(),
            rooms: HashMap::new(),
            templates: HashMap::new(),
            slots: HashMap::new(),
            lessons: HashMap::new(),
            next_template_id: 1,
            next_slot_id: 1,
            next_lesson_id: 1,
            is_healthy: true,
        }
    }
}

fn overlaps(a_start: TimeOfDay, a_end: TimeOfDay, b_start: TimeOfDay, b_end: TimeOfDay) -> bool {
    a_start < b_end && b_start < a_end
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    // ==================== Seeding helpers ====================

    /// Store branch settings directly (setup helper).
    pub fn put_settings(&self, branch: BranchId, settings: &BranchScheduleSettings) {
        let mut data = self.data.write().unwrap();
        data.settings.insert(branch, settings.clone());
    }

    /// Insert a class-subject binding with its caller-chosen id (setup helper).
    pub fn insert_class_subject(&self, class_subject: ClassSubject) {
        let mut data = self.data.write().unwrap();
        data.class_subjects.insert(class_subject.id, class_subject);
    }

    /// Insert a room with its caller-chosen id (setup helper).
    pub fn insert_room(&self, room: Room) {
        let mut data = self.data.write().unwrap();
        data.rooms.insert(room.id, room);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        let mut data = self.data.write().unwrap();
        data.is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    /// Number of stored lesson instances.
    pub fn lesson_count(&self) -> usize {
        self.data.read().unwrap().lessons.len()
    }

    // ==================== Internal helpers ====================

    fn check_health(&self) -> RepositoryResult<()> {
        let data = self.data.read().unwrap();
        if !data.is_healthy {
            return Err(RepositoryError::connection("Repository is not healthy"));
        }
        Ok(())
    }
}

impl LocalData {
    fn teacher_of(&self, class_subject: ClassSubjectId) -> RepositoryResult<TeacherId> {
        self.class_subjects
            .get(&class_subject)
            .map(|cs| cs.teacher)
            .ok_or_else(|| {
                RepositoryError::validation(format!(
                    "Unknown class subject {}",
                    class_subject
                ))
            })
    }

    fn branch_of_lesson(&self, lesson: &LessonInstance) -> Option<BranchId> {
        self.class_subjects
            .get(&lesson.class_subject)
            .map(|cs| cs.branch)
    }

    /// Enforce template slot uniqueness: within one template, one booking per
    /// (class|teacher|room, day, lesson_number). `exclude` skips the slot
    /// being replaced during updates.
    fn check_slot_invariants(
        &self,
        slot: &NewTimetableSlot,
        exclude: Option<TimetableSlotId>,
    ) -> RepositoryResult<()> {
        let teacher = self.teacher_of(slot.class_subject)?;
        for existing in self.slots.values() {
            if Some(existing.id) == exclude
                || existing.timetable != slot.timetable
                || existing.day_of_week != slot.day_of_week
                || existing.lesson_number != slot.lesson_number
            {
                continue;
            }
            let context = ErrorContext::new("create_slot")
                .with_entity("timetable_slot")
                .with_entity_id(existing.id);
            if existing.class_obj == slot.class_obj {
                return Err(RepositoryError::conflict_with_context(
                    format!(
                        "Class {} already has lesson {} on {}",
                        slot.class_obj, slot.lesson_number, slot.day_of_week
                    ),
                    context,
                ));
            }
            let existing_teacher = self.teacher_of(existing.class_subject)?;
            if existing_teacher == teacher {
                return Err(RepositoryError::conflict_with_context(
                    format!(
                        "Teacher {} already teaches lesson {} on {}",
                        teacher, slot.lesson_number, slot.day_of_week
                    ),
                    context,
                ));
            }
            if let (Some(room), Some(existing_room)) = (slot.room, existing.room) {
                if room == existing_room {
                    return Err(RepositoryError::conflict_with_context(
                        format!(
                            "Room {} already booked for lesson {} on {}",
                            room, slot.lesson_number, slot.day_of_week
                        ),
                        context,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Enforce lesson booking uniqueness on one date: exact
    /// (class, lesson_number) match plus teacher/room time overlap.
    /// Cancelled lessons do not occupy their slot.
    #[allow(clippy::too_many_arguments)]
    fn check_lesson_invariants(
        &self,
        class_obj: ClassId,
        class_subject: ClassSubjectId,
        date: NaiveDate,
        lesson_number: u8,
        start: TimeOfDay,
        end: TimeOfDay,
        room: Option<RoomId>,
        exclude: Option<LessonId>,
    ) -> RepositoryResult<()> {
        let teacher = self.teacher_of(class_subject)?;
        for existing in self.lessons.values() {
            if Some(existing.id) == exclude || existing.date != date || !existing.occupies_slot() {
                continue;
            }
            let context = ErrorContext::new("create_instance")
                .with_entity("lesson")
                .with_entity_id(existing.id);
            if existing.class_obj == class_obj && existing.lesson_number == lesson_number {
                return Err(RepositoryError::conflict_with_context(
                    format!(
                        "Class {} already has lesson {} on {}",
                        class_obj, lesson_number, date
                    ),
                    context,
                ));
            }
            let times_overlap = overlaps(start, end, existing.start_time, existing.end_time);
            if times_overlap {
                let existing_teacher = self.teacher_of(existing.class_subject)?;
                if existing_teacher == teacher {
                    return Err(RepositoryError::conflict_with_context(
                        format!("Teacher {} already booked {}-{} on {}", teacher, start, end, date),
                        context,
                    ));
                }
                if let (Some(room), Some(existing_room)) = (room, existing.room) {
                    if room == existing_room {
                        return Err(RepositoryError::conflict_with_context(
                            format!("Room {} already booked {}-{} on {}", room, start, end, date),
                            context,
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for LocalRepository {
    async fn get_settings(&self, branch: BranchId) -> RepositoryResult<BranchScheduleSettings> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        data.settings.get(&branch).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("No schedule settings for branch {}", branch),
                ErrorContext::new("get_settings").with_entity("branch_settings"),
            )
        })
    }

    async fn update_settings(
        &self,
        branch: BranchId,
        settings: &BranchScheduleSettings,
    ) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        data.settings.insert(branch, settings.clone());
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for LocalRepository {
    async fn list_class_subjects(
        &self,
        branch: BranchId,
        class: Option<ClassId>,
    ) -> RepositoryResult<Vec<ClassSubject>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut subjects: Vec<ClassSubject> = data
            .class_subjects
            .values()
            .filter(|cs| cs.branch == branch)
            .filter(|cs| class.map(|c| cs.class_obj == c).unwrap_or(true))
            .cloned()
            .collect();
        subjects.sort_by_key(|cs| cs.id);
        Ok(subjects)
    }

    async fn get_class_subject(&self, id: ClassSubjectId) -> RepositoryResult<ClassSubject> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        data.class_subjects.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found(format!("Class subject {} not found", id))
        })
    }

    async fn list_rooms(&self, branch: BranchId) -> RepositoryResult<Vec<Room>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut rooms: Vec<Room> = data
            .rooms
            .values()
            .filter(|room| room.branch == branch)
            .cloned()
            .collect();
        rooms.sort_by_key(|room| room.id);
        Ok(rooms)
    }
}

#[async_trait]
impl TimetableRepository for LocalRepository {
    async fn create_template(
        &self,
        branch: BranchId,
        name: &str,
    ) -> RepositoryResult<TimetableTemplate> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        let id = TimetableId::new(data.next_template_id);
        data.next_template_id += 1;
        let template = TimetableTemplate {
            id,
            branch,
            name: name.to_string(),
        };
        data.templates.insert(id, template.clone());
        Ok(template)
    }

    async fn get_template(&self, id: TimetableId) -> RepositoryResult<TimetableTemplate> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        data.templates
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Timetable {} not found", id)))
    }

    async fn list_templates(&self, branch: BranchId) -> RepositoryResult<Vec<TimetableTemplate>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut templates: Vec<TimetableTemplate> = data
            .templates
            .values()
            .filter(|template| template.branch == branch)
            .cloned()
            .collect();
        templates.sort_by_key(|template| template.id);
        Ok(templates)
    }

    async fn list_slots(
        &self,
        timetable: TimetableId,
        day: Option<DayOfWeek>,
    ) -> RepositoryResult<Vec<TimetableSlot>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut slots: Vec<TimetableSlot> = data
            .slots
            .values()
            .filter(|slot| slot.timetable == timetable)
            .filter(|slot| day.map(|d| slot.day_of_week == d).unwrap_or(true))
            .cloned()
            .collect();
        slots.sort_by_key(|slot| (slot.day_of_week, slot.lesson_number, slot.id));
        Ok(slots)
    }

    async fn create_slot(&self, slot: &NewTimetableSlot) -> RepositoryResult<TimetableSlot> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        if !data.templates.contains_key(&slot.timetable) {
            return Err(RepositoryError::not_found(format!(
                "Timetable {} not found",
                slot.timetable
            )));
        }
        data.check_slot_invariants(slot, None)?;
        let id = TimetableSlotId::new(data.next_slot_id);
        data.next_slot_id += 1;
        let stored = TimetableSlot {
            id,
            timetable: slot.timetable,
            class_obj: slot.class_obj,
            class_subject: slot.class_subject,
            day_of_week: slot.day_of_week,
            lesson_number: slot.lesson_number,
            start_time: slot.start_time,
            end_time: slot.end_time,
            room: slot.room,
        };
        data.slots.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_slot(
        &self,
        id: TimetableSlotId,
        slot: &NewTimetableSlot,
    ) -> RepositoryResult<TimetableSlot> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        if !data.slots.contains_key(&id) {
            return Err(RepositoryError::not_found(format!("Slot {} not found", id)));
        }
        data.check_slot_invariants(slot, Some(id))?;
        let stored = TimetableSlot {
            id,
            timetable: slot.timetable,
            class_obj: slot.class_obj,
            class_subject: slot.class_subject,
            day_of_week: slot.day_of_week,
            lesson_number: slot.lesson_number,
            start_time: slot.start_time,
            end_time: slot.end_time,
            room: slot.room,
        };
        data.slots.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_slot(&self, id: TimetableSlotId) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        data.slots
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found(format!("Slot {} not found", id)))
    }
}

#[async_trait]
impl LessonRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read().unwrap();
        Ok(data.is_healthy)
    }

    async fn list_instances(&self, filter: &LessonFilter) -> RepositoryResult<Vec<LessonInstance>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut lessons: Vec<LessonInstance> = data
            .lessons
            .values()
            .filter(|lesson| data.branch_of_lesson(lesson) == Some(filter.branch))
            .filter(|lesson| filter.class.map(|c| lesson.class_obj == c).unwrap_or(true))
            .filter(|lesson| filter.matches_date(lesson.date))
            .cloned()
            .collect();
        lessons.sort_by_key(|lesson| (lesson.date, lesson.start_time, lesson.id));
        Ok(lessons)
    }

    async fn find_instance(
        &self,
        class: ClassId,
        date: NaiveDate,
        lesson_number: u8,
    ) -> RepositoryResult<Option<LessonInstance>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .lessons
            .values()
            .find(|lesson| {
                lesson.class_obj == class
                    && lesson.date == date
                    && lesson.lesson_number == lesson_number
                    && lesson.occupies_slot()
            })
            .cloned())
    }

    async fn get_instance(&self, id: LessonId) -> RepositoryResult<LessonInstance> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        data.lessons
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Lesson {} not found", id)))
    }

    async fn create_instance(&self, lesson: &NewLessonInstance) -> RepositoryResult<LessonInstance> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        data.check_lesson_invariants(
            lesson.class_obj,
            lesson.class_subject,
            lesson.date,
            lesson.lesson_number,
            lesson.start_time,
            lesson.end_time,
            lesson.room,
            None,
        )?;
        let id = LessonId::new(data.next_lesson_id);
        data.next_lesson_id += 1;
        let now = Utc::now();
        let stored = LessonInstance {
            id,
            class_obj: lesson.class_obj,
            class_subject: lesson.class_subject,
            date: lesson.date,
            lesson_number: lesson.lesson_number,
            start_time: lesson.start_time,
            end_time: lesson.end_time,
            room: lesson.room,
            status: LessonStatus::Planned,
            topic: lesson.topic.clone(),
            homework: None,
            teacher_notes: None,
            is_auto_generated: lesson.is_auto_generated,
            created_at: now,
            updated_at: now,
        };
        data.lessons.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_instance(&self, lesson: &LessonInstance) -> RepositoryResult<LessonInstance> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        if !data.lessons.contains_key(&lesson.id) {
            return Err(RepositoryError::not_found(format!(
                "Lesson {} not found",
                lesson.id
            )));
        }
        if lesson.occupies_slot() {
            data.check_lesson_invariants(
                lesson.class_obj,
                lesson.class_subject,
                lesson.date,
                lesson.lesson_number,
                lesson.start_time,
                lesson.end_time,
                lesson.room,
                Some(lesson.id),
            )?;
        }
        let mut stored = lesson.clone();
        stored.updated_at = Utc::now();
        data.lessons.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete_instance(&self, id: LessonId) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        data.lessons
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found(format!("Lesson {} not found", id)))
    }
}
