//! Rendering-oriented grouping over lesson collections.
//!
//! Pure, deterministic, no mutation of the input: BTreeMaps keep day and
//! slot-key iteration order stable for grid construction.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;

use crate::api::LessonInstance;
use crate::models::time::TimeOfDay;
use crate::models::weekday::DayOfWeek;

/// Cell key for a time slot: `"HH:mm-HH:mm"`.
pub fn time_slot_key(start: TimeOfDay, end: TimeOfDay) -> String {
    format!("{}-{}", start, end)
}

/// Group lessons by weekday, then by time-slot key.
pub fn group_by_day_and_slot(
    lessons: &[LessonInstance],
) -> BTreeMap<DayOfWeek, BTreeMap<String, Vec<LessonInstance>>> {
    let mut grouped: BTreeMap<DayOfWeek, BTreeMap<String, Vec<LessonInstance>>> = BTreeMap::new();
    for lesson in lessons {
        let day = DayOfWeek::from(lesson.date.weekday());
        grouped
            .entry(day)
            .or_default()
            .entry(time_slot_key(lesson.start_time, lesson.end_time))
            .or_default()
            .push(lesson.clone());
    }
    grouped
}

/// The distinct `(start, end)` pairs actually present, sorted by start time.
pub fn extract_distinct_time_slots(lessons: &[LessonInstance]) -> Vec<(TimeOfDay, TimeOfDay)> {
    let distinct: BTreeSet<(TimeOfDay, TimeOfDay)> = lessons
        .iter()
        .map(|lesson| (lesson.start_time, lesson.end_time))
        .collect();
    distinct.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClassId, ClassSubjectId, LessonId, LessonStatus};
    use chrono::{NaiveDate, Utc};

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn lesson(id: i64, date: (i32, u32, u32), start: &str, end: &str) -> LessonInstance {
        let now = Utc::now();
        LessonInstance {
            id: LessonId::new(id),
            class_obj: ClassId::new(1),
            class_subject: ClassSubjectId::new(1),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            lesson_number: 1,
            start_time: t(start),
            end_time: t(end),
            room: None,
            status: LessonStatus::Planned,
            topic: None,
            homework: None,
            teacher_notes: None,
            is_auto_generated: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_group_by_day_and_slot() {
        // 2024-09-02 is a Monday, 2024-09-03 a Tuesday.
        let lessons = vec![
            lesson(1, (2024, 9, 2), "08:00", "08:45"),
            lesson(2, (2024, 9, 2), "08:00", "08:45"),
            lesson(3, (2024, 9, 2), "08:55", "09:40"),
            lesson(4, (2024, 9, 3), "08:00", "08:45"),
        ];
        let grouped = group_by_day_and_slot(&lessons);

        assert_eq!(grouped.len(), 2);
        let monday = &grouped[&DayOfWeek::Monday];
        assert_eq!(monday["08:00-08:45"].len(), 2);
        assert_eq!(monday["08:55-09:40"].len(), 1);
        assert_eq!(grouped[&DayOfWeek::Tuesday]["08:00-08:45"][0].id, LessonId::new(4));
        // Input untouched.
        assert_eq!(lessons.len(), 4);
    }

    #[test]
    fn test_extract_distinct_time_slots_sorted_and_deduplicated() {
        let lessons = vec![
            lesson(1, (2024, 9, 2), "08:55", "09:40"),
            lesson(2, (2024, 9, 3), "08:00", "08:45"),
            lesson(3, (2024, 9, 4), "08:00", "08:45"),
        ];
        let slots = extract_distinct_time_slots(&lessons);
        assert_eq!(
            slots,
            vec![(t("08:00"), t("08:45")), (t("08:55"), t("09:40"))]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_day_and_slot(&[]).is_empty());
        assert!(extract_distinct_time_slots(&[]).is_empty());
    }
}
