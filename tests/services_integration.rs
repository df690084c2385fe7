//! End-to-end tests for the scheduling services against the local repository.

use chrono::NaiveDate;

use stms_rust::api::{
    BranchId, ClassId, ClassSubject, ClassSubjectId, LessonStatus, NewLessonInstance, Room,
    RoomId, TeacherId, TimetableId,
};
use stms_rust::db::repository::{NewTimetableSlot, TimetableRepository};
use stms_rust::db::{LessonFilter, LocalRepository};
use stms_rust::models::weekday::DayOfWeek;
use stms_rust::models::TimeOfDay;
use stms_rust::services::{
    check_availability, create_lesson_checked, generate_lessons, validate_assignment, ServiceError,
};

const BRANCH: BranchId = BranchId(1);
const CLASS_A: ClassId = ClassId(10);
const CLASS_B: ClassId = ClassId(11);
const MATH_A: ClassSubjectId = ClassSubjectId(100);
const ENGLISH_A: ClassSubjectId = ClassSubjectId(101);
const MATH_B: ClassSubjectId = ClassSubjectId(102);
const MATH_TEACHER: TeacherId = TeacherId(500);
const ENGLISH_TEACHER: TeacherId = TeacherId(501);
const ROOM_1: RoomId = RoomId(700);
const ROOM_2: RoomId = RoomId(701);

fn t(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Branch with two classes sharing a Mathematics teacher, and two rooms.
fn seeded_repo() -> LocalRepository {
    let repo = LocalRepository::new();
    repo.put_settings(BRANCH, &Default::default());
    repo.insert_class_subject(ClassSubject {
        id: MATH_A,
        branch: BRANCH,
        class_obj: CLASS_A,
        subject_name: "Mathematics".to_string(),
        teacher: MATH_TEACHER,
        teacher_name: "A. Karimova".to_string(),
    });
    repo.insert_class_subject(ClassSubject {
        id: ENGLISH_A,
        branch: BRANCH,
        class_obj: CLASS_A,
        subject_name: "English".to_string(),
        teacher: ENGLISH_TEACHER,
        teacher_name: "B. Tosheva".to_string(),
    });
    repo.insert_class_subject(ClassSubject {
        id: MATH_B,
        branch: BRANCH,
        class_obj: CLASS_B,
        subject_name: "Mathematics".to_string(),
        teacher: MATH_TEACHER,
        teacher_name: "A. Karimova".to_string(),
    });
    repo.insert_room(Room {
        id: ROOM_1,
        branch: BRANCH,
        name: "101".to_string(),
        capacity: Some(24),
    });
    repo.insert_room(Room {
        id: ROOM_2,
        branch: BRANCH,
        name: "102".to_string(),
        capacity: Some(30),
    });
    repo
}

fn monday_slot(timetable: TimetableId) -> NewTimetableSlot {
    NewTimetableSlot {
        timetable,
        class_obj: CLASS_A,
        class_subject: MATH_A,
        day_of_week: DayOfWeek::Monday,
        lesson_number: 1,
        start_time: t("08:00"),
        end_time: t("08:45"),
        room: Some(ROOM_1),
    }
}

fn new_lesson(class_subject: ClassSubjectId, class: ClassId) -> NewLessonInstance {
    NewLessonInstance {
        class_obj: class,
        class_subject,
        date: d(2024, 9, 2),
        lesson_number: 1,
        start_time: t("08:00"),
        end_time: t("08:45"),
        room: Some(ROOM_1),
        topic: None,
        is_auto_generated: false,
    }
}

// =============================================================================
// Bulk generation
// =============================================================================

#[tokio::test]
async fn test_generate_over_one_week_creates_one_monday_lesson() {
    let repo = seeded_repo();
    let template = repo.create_template(BRANCH, "2024 autumn").await.unwrap();
    repo.create_slot(&monday_slot(template.id)).await.unwrap();

    // 2024-09-02..2024-09-08 contains exactly one Monday.
    let summary = generate_lessons(&repo, template.id, d(2024, 9, 2), d(2024, 9, 8), true)
        .await
        .unwrap();
    assert_eq!(summary.created, 1);
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.skipped, 0);
    assert!(summary.errors.is_empty());

    let lessons = stms_rust::db::list_lessons(&repo, &LessonFilter::branch(BRANCH))
        .await
        .unwrap();
    assert_eq!(lessons.len(), 1);
    let lesson = &lessons[0];
    assert_eq!(lesson.date, d(2024, 9, 2));
    assert_eq!(lesson.lesson_number, 1);
    assert_eq!(lesson.class_subject, MATH_A);
    assert!(lesson.is_auto_generated);
    assert_eq!(lesson.status, LessonStatus::Planned);
}

#[tokio::test]
async fn test_regenerate_with_skip_existing_skips() {
    let repo = seeded_repo();
    let template = repo.create_template(BRANCH, "2024 autumn").await.unwrap();
    repo.create_slot(&monday_slot(template.id)).await.unwrap();

    let first = generate_lessons(&repo, template.id, d(2024, 9, 2), d(2024, 9, 8), true)
        .await
        .unwrap();
    assert_eq!(first.created, 1);

    let second = generate_lessons(&repo, template.id, d(2024, 9, 2), d(2024, 9, 8), true)
        .await
        .unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(repo.lesson_count(), 1);
}

#[tokio::test]
async fn test_regenerate_without_skip_overwrites() {
    let repo = seeded_repo();
    let template = repo.create_template(BRANCH, "2024 autumn").await.unwrap();
    let slot = repo.create_slot(&monday_slot(template.id)).await.unwrap();

    generate_lessons(&repo, template.id, d(2024, 9, 2), d(2024, 9, 2), true)
        .await
        .unwrap();

    // Move the slot to the other room, then regenerate with overwrite.
    let moved = NewTimetableSlot {
        room: Some(ROOM_2),
        ..monday_slot(template.id)
    };
    repo.update_slot(slot.id, &moved).await.unwrap();

    let summary = generate_lessons(&repo, template.id, d(2024, 9, 2), d(2024, 9, 2), false)
        .await
        .unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.created, 0);

    let lessons = stms_rust::db::list_lessons(&repo, &LessonFilter::branch(BRANCH))
        .await
        .unwrap();
    assert_eq!(lessons[0].room, Some(ROOM_2));
}

#[tokio::test]
async fn test_generate_rejects_inverted_range_without_writes() {
    let repo = seeded_repo();
    let template = repo.create_template(BRANCH, "2024 autumn").await.unwrap();
    repo.create_slot(&monday_slot(template.id)).await.unwrap();

    let result = generate_lessons(&repo, template.id, d(2024, 9, 8), d(2024, 9, 2), true).await;
    assert!(matches!(result, Err(ServiceError::InvalidRange(_))));
    assert_eq!(repo.lesson_count(), 0);
}

#[tokio::test]
async fn test_generate_unknown_template_is_not_found() {
    let repo = seeded_repo();
    let result = generate_lessons(&repo, TimetableId::new(99), d(2024, 9, 2), d(2024, 9, 8), true)
        .await;
    match result {
        Err(ServiceError::Repository(e)) => assert!(e.to_string().contains("not found")),
        other => panic!("expected repository NotFound, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_generate_continues_past_individual_failures() {
    let repo = seeded_repo();
    let template = repo.create_template(BRANCH, "2024 autumn").await.unwrap();
    repo.create_slot(&monday_slot(template.id)).await.unwrap();

    // Class B's Monday lesson 1 collides with class A's on the shared teacher,
    // so its create fails while class A's succeeds.
    repo.create_slot(&NewTimetableSlot {
        class_obj: CLASS_B,
        class_subject: MATH_B,
        lesson_number: 2,
        start_time: t("08:55"),
        end_time: t("09:40"),
        room: Some(ROOM_2),
        ..monday_slot(template.id)
    })
    .await
    .unwrap();
    // Occupy class B's slot 2 time with the same teacher on Monday manually.
    create_lesson_checked(
        &repo,
        BRANCH,
        &NewLessonInstance {
            class_obj: CLASS_A,
            class_subject: MATH_A,
            date: d(2024, 9, 2),
            lesson_number: 2,
            start_time: t("08:55"),
            end_time: t("09:40"),
            room: None,
            topic: None,
            is_auto_generated: false,
        },
    )
    .await
    .unwrap();

    let summary = generate_lessons(&repo, template.id, d(2024, 9, 2), d(2024, 9, 2), true)
        .await
        .unwrap();
    // Class A slot 1 created; class A lesson 2 already occupies the teacher, so
    // class B's generation fails and is reported, not fatal.
    assert_eq!(summary.created, 1);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("lesson 2"));
}

// =============================================================================
// Availability
// =============================================================================

#[tokio::test]
async fn test_busy_teacher_excludes_subject_for_other_class() {
    let repo = seeded_repo();
    // The shared Mathematics teacher is booked for class B at 08:00-08:45.
    create_lesson_checked(&repo, BRANCH, &new_lesson(MATH_B, CLASS_B))
        .await
        .unwrap();

    let result = check_availability(&repo, BRANCH, CLASS_A, d(2024, 9, 2), t("08:00"), t("08:45"))
        .await
        .unwrap();

    let names: Vec<&str> = result
        .available_subjects
        .iter()
        .map(|s| s.subject_name.as_str())
        .collect();
    assert!(!names.contains(&"Mathematics"), "busy teacher listed as free");
    assert!(names.contains(&"English"));

    // Room 1 is taken, room 2 is free.
    let rooms: Vec<_> = result.available_rooms.iter().map(|r| r.id).collect();
    assert_eq!(rooms, vec![ROOM_2]);

    // Class A itself has no booking, so no conflicts in listing mode.
    assert!(result.conflicts.is_empty());
}

#[tokio::test]
async fn test_adjacent_booking_does_not_block() {
    let repo = seeded_repo();
    create_lesson_checked(&repo, BRANCH, &new_lesson(MATH_B, CLASS_B))
        .await
        .unwrap();

    // 08:45-09:30 touches but does not overlap 08:00-08:45.
    let result = check_availability(&repo, BRANCH, CLASS_A, d(2024, 9, 2), t("08:45"), t("09:30"))
        .await
        .unwrap();
    let names: Vec<&str> = result
        .available_subjects
        .iter()
        .map(|s| s.subject_name.as_str())
        .collect();
    assert!(names.contains(&"Mathematics"));
}

#[tokio::test]
async fn test_direct_conflict_check_names_existing_booking() {
    let repo = seeded_repo();
    let existing = create_lesson_checked(&repo, BRANCH, &new_lesson(MATH_B, CLASS_B))
        .await
        .unwrap();

    // Proposing Mathematics for class A at the same time: teacher conflict.
    let conflicts = validate_assignment(&repo, BRANCH, &new_lesson(MATH_A, CLASS_A))
        .await
        .unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].lesson_id, Some(existing.id));
    assert!(conflicts[0].message.contains("Teacher"));
}

#[tokio::test]
async fn test_cancelled_lesson_frees_its_slot() {
    let repo = seeded_repo();
    let mut lesson = create_lesson_checked(&repo, BRANCH, &new_lesson(MATH_B, CLASS_B))
        .await
        .unwrap();
    lesson.status = LessonStatus::Cancelled;
    stms_rust::db::update_lesson(&repo, &lesson).await.unwrap();

    let result = check_availability(&repo, BRANCH, CLASS_A, d(2024, 9, 2), t("08:00"), t("08:45"))
        .await
        .unwrap();
    let names: Vec<&str> = result
        .available_subjects
        .iter()
        .map(|s| s.subject_name.as_str())
        .collect();
    assert!(names.contains(&"Mathematics"));
}

#[tokio::test]
async fn test_create_lesson_checked_returns_itemized_conflicts() {
    let repo = seeded_repo();
    create_lesson_checked(&repo, BRANCH, &new_lesson(MATH_A, CLASS_A))
        .await
        .unwrap();

    // Same class, same slot: conflict must itemize, not be generic.
    let err = create_lesson_checked(&repo, BRANCH, &new_lesson(ENGLISH_A, CLASS_A))
        .await
        .unwrap_err();
    let conflicts = err.conflicts().expect("conflict error carries the list");
    assert_eq!(conflicts.len(), 1);
    assert!(conflicts[0].message.contains("Class"));
    assert_eq!(repo.lesson_count(), 1);
}

#[tokio::test]
async fn test_availability_rejects_inverted_range() {
    let repo = seeded_repo();
    let result =
        check_availability(&repo, BRANCH, CLASS_A, d(2024, 9, 2), t("09:00"), t("08:00")).await;
    assert!(matches!(result, Err(ServiceError::InvalidRange(_))));
}
