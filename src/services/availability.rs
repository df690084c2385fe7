//! Read-time availability and conflict checking.
//!
//! These checks are advisory: two concurrent callers can both see a slot as
//! free. The repository re-validates the booking invariants at write time and
//! its `ConflictError` is the authoritative signal (see the repository docs).

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::api::{
    BranchId, ClassId, ClassSubjectId, ConflictResource, LessonInstance, NewLessonInstance,
    RoomId, RoomOption, ScheduleAvailabilityResult, ScheduleConflict, SubjectOption, TeacherId,
};
use crate::db::models::LessonFilter;
use crate::db::repository::FullRepository;
use crate::models::time::{duration_minutes, TimeOfDay};

use super::error::{ServiceError, ServiceResult};

/// Two half-open intervals `[s1, e1)` and `[s2, e2)` overlap iff
/// `s1 < e2 && s2 < e1`; touching boundaries do not collide.
pub fn intervals_overlap(s1: TimeOfDay, e1: TimeOfDay, s2: TimeOfDay, e2: TimeOfDay) -> bool {
    s1 < e2 && s2 < e1
}

/// Which subjects (with their teacher) and rooms are free for `class` at the
/// requested time, plus the class's own overlapping bookings as conflicts.
///
/// Subjects are restricted to those assigned to `class`; teachers and rooms
/// are checked against every occupying lesson of the branch on `date`.
pub async fn check_availability(
    repo: &dyn FullRepository,
    branch: BranchId,
    class: ClassId,
    date: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
) -> ServiceResult<ScheduleAvailabilityResult> {
    if duration_minutes(start, end) <= 0 {
        return Err(ServiceError::InvalidRange(format!(
            "start {} must precede end {}",
            start, end
        )));
    }

    let lessons = repo.list_instances(&LessonFilter::on_date(branch, date)).await?;
    let catalog = repo.list_class_subjects(branch, None).await?;
    let rooms = repo.list_rooms(branch).await?;

    let teacher_of: HashMap<ClassSubjectId, TeacherId> =
        catalog.iter().map(|cs| (cs.id, cs.teacher)).collect();

    let occupying: Vec<&LessonInstance> = lessons
        .iter()
        .filter(|lesson| lesson.occupies_slot())
        .filter(|lesson| intervals_overlap(start, end, lesson.start_time, lesson.end_time))
        .collect();

    let busy_teachers: HashSet<TeacherId> = occupying
        .iter()
        .filter_map(|lesson| teacher_of.get(&lesson.class_subject).copied())
        .collect();
    let busy_rooms: HashSet<RoomId> =
        occupying.iter().filter_map(|lesson| lesson.room).collect();

    let available_subjects = catalog
        .iter()
        .filter(|cs| cs.class_obj == class)
        .filter(|cs| !busy_teachers.contains(&cs.teacher))
        .map(|cs| SubjectOption {
            id: cs.id,
            subject_name: cs.subject_name.clone(),
            teacher_name: cs.teacher_name.clone(),
        })
        .collect();

    let available_rooms = rooms
        .iter()
        .filter(|room| !busy_rooms.contains(&room.id))
        .map(|room| RoomOption {
            id: room.id,
            name: room.name.clone(),
            capacity: room.capacity,
        })
        .collect();

    let conflicts = occupying
        .iter()
        .filter(|lesson| lesson.class_obj == class)
        .map(|lesson| {
            ScheduleConflict::new(
                ConflictResource::Class,
                format!(
                    "Class {} is already booked {}-{} on {}",
                    class, lesson.start_time, lesson.end_time, date
                ),
            )
            .with_lesson(lesson.id)
        })
        .collect();

    Ok(ScheduleAvailabilityResult {
        available_subjects,
        available_rooms,
        conflicts,
    })
}

/// Itemize every overlap a proposed booking would cause: the class itself,
/// its subject's teacher, and the requested room. Empty means the slot looked
/// free at read time.
pub async fn validate_assignment(
    repo: &dyn FullRepository,
    branch: BranchId,
    proposed: &NewLessonInstance,
) -> ServiceResult<Vec<ScheduleConflict>> {
    if duration_minutes(proposed.start_time, proposed.end_time) <= 0 {
        return Err(ServiceError::InvalidRange(format!(
            "start {} must precede end {}",
            proposed.start_time, proposed.end_time
        )));
    }

    let lessons = repo
        .list_instances(&LessonFilter::on_date(branch, proposed.date))
        .await?;
    let catalog = repo.list_class_subjects(branch, None).await?;
    let teacher_of: HashMap<ClassSubjectId, TeacherId> =
        catalog.iter().map(|cs| (cs.id, cs.teacher)).collect();
    let proposed_teacher = teacher_of.get(&proposed.class_subject).copied();

    let mut conflicts = Vec::new();
    for lesson in lessons.iter().filter(|lesson| lesson.occupies_slot()) {
        let same_number =
            lesson.class_obj == proposed.class_obj && lesson.lesson_number == proposed.lesson_number;
        let times_overlap = intervals_overlap(
            proposed.start_time,
            proposed.end_time,
            lesson.start_time,
            lesson.end_time,
        );
        if !(same_number || times_overlap) {
            continue;
        }

        if lesson.class_obj == proposed.class_obj {
            conflicts.push(
                ScheduleConflict::new(
                    ConflictResource::Class,
                    format!(
                        "Class {} already has a lesson {}-{} on {}",
                        proposed.class_obj, lesson.start_time, lesson.end_time, lesson.date
                    ),
                )
                .with_lesson(lesson.id),
            );
            continue;
        }
        if !times_overlap {
            continue;
        }
        if let (Some(teacher), Some(existing_teacher)) =
            (proposed_teacher, teacher_of.get(&lesson.class_subject).copied())
        {
            if teacher == existing_teacher {
                conflicts.push(
                    ScheduleConflict::new(
                        ConflictResource::Teacher,
                        format!(
                            "Teacher {} is already booked {}-{} on {}",
                            teacher, lesson.start_time, lesson.end_time, lesson.date
                        ),
                    )
                    .with_lesson(lesson.id),
                );
                continue;
            }
        }
        if let (Some(room), Some(existing_room)) = (proposed.room, lesson.room) {
            if room == existing_room {
                conflicts.push(
                    ScheduleConflict::new(
                        ConflictResource::Room,
                        format!(
                            "Room {} is already booked {}-{} on {}",
                            room, lesson.start_time, lesson.end_time, lesson.date
                        ),
                    )
                    .with_lesson(lesson.id),
                );
            }
        }
    }

    Ok(conflicts)
}

/// Availability-checked single-lesson creation: the "add lesson" flow.
///
/// Runs [`validate_assignment`] first so the caller gets the itemized list;
/// the repository still re-checks at write time, closing the read-then-write
/// race as far as the backend allows.
pub async fn create_lesson_checked(
    repo: &dyn FullRepository,
    branch: BranchId,
    lesson: &NewLessonInstance,
) -> ServiceResult<LessonInstance> {
    let conflicts = validate_assignment(repo, branch, lesson).await?;
    if !conflicts.is_empty() {
        log::debug!(
            "rejecting lesson for class {} on {}: {} conflict(s)",
            lesson.class_obj,
            lesson.date,
            conflicts.len()
        );
        return Err(ServiceError::Conflict(conflicts));
    }
    Ok(repo.create_instance(lesson).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn test_overlap_rule_against_naive_check() {
        // Exhaustive minute-granularity comparison over a small grid.
        let bounds = [0, 30, 45, 60, 90, 120];
        for &s1 in &bounds {
            for &e1 in &bounds {
                for &s2 in &bounds {
                    for &e2 in &bounds {
                        if s1 >= e1 || s2 >= e2 {
                            continue;
                        }
                        let a = (
                            TimeOfDay::from_minutes(s1).unwrap(),
                            TimeOfDay::from_minutes(e1).unwrap(),
                        );
                        let b = (
                            TimeOfDay::from_minutes(s2).unwrap(),
                            TimeOfDay::from_minutes(e2).unwrap(),
                        );
                        let naive = (s1..e1).any(|m| (s2..e2).contains(&m));
                        assert_eq!(
                            intervals_overlap(a.0, a.1, b.0, b.1),
                            naive,
                            "[{},{}) vs [{},{})",
                            s1,
                            e1,
                            s2,
                            e2
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_adjacent_intervals_do_not_overlap() {
        assert!(!intervals_overlap(t("08:00"), t("08:45"), t("08:45"), t("09:30")));
        assert!(intervals_overlap(t("08:00"), t("08:46"), t("08:45"), t("09:30")));
    }
}
