//! Bulk generation of concrete lesson instances from a recurring template.
//!
//! Walks every calendar date in the requested range, matches template slots by
//! weekday, and creates (or skips/overwrites, per the flag) one instance per
//! match. Partial failure policy is continue-and-report: one failed write
//! never aborts the remaining dates, and the summary always carries the
//! counts of work actually done.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::api::{GenerationSummary, NewLessonInstance, TimetableId, TimetableSlot};
use crate::db::repository::FullRepository;
use crate::models::weekday::DayOfWeek;

use super::error::{ServiceError, ServiceResult};

/// Materialize `[start_date, end_date]` (inclusive) from a template.
///
/// For each date and each slot whose `day_of_week` matches:
/// - an existing occupying instance with `skip_existing` counts as skipped;
/// - an existing instance without the flag gets its subject/room/time
///   overwritten from the slot;
/// - otherwise a new auto-generated instance is created.
///
/// Fails with `InvalidRange` before touching the repository when
/// `start_date > end_date`; an unknown template surfaces as `NotFound` the
/// same way, before any write.
pub async fn generate_lessons(
    repo: &dyn FullRepository,
    timetable: TimetableId,
    start_date: NaiveDate,
    end_date: NaiveDate,
    skip_existing: bool,
) -> ServiceResult<GenerationSummary> {
    if start_date > end_date {
        return Err(ServiceError::InvalidRange(format!(
            "start date {} is after end date {}",
            start_date, end_date
        )));
    }

    let template = repo.get_template(timetable).await?;
    let slots = repo.list_slots(timetable, None).await?;

    let mut by_day: HashMap<DayOfWeek, Vec<&TimetableSlot>> = HashMap::new();
    for slot in &slots {
        by_day.entry(slot.day_of_week).or_default().push(slot);
    }

    let mut summary = GenerationSummary::default();
    let mut date = start_date;
    loop {
        let day = DayOfWeek::from(date.weekday());
        let day_slots = by_day.get(&day).map(|v| v.as_slice()).unwrap_or(&[]);
        for slot in day_slots {
            if let Err(error) = apply_slot(repo, slot, date, skip_existing, &mut summary).await {
                log::warn!(
                    "generation failed for class {} lesson {} on {}: {}",
                    slot.class_obj,
                    slot.lesson_number,
                    date,
                    error
                );
                summary
                    .errors
                    .push(format!("{} lesson {}: {}", date, slot.lesson_number, error));
            }
        }

        if date == end_date {
            break;
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    log::info!(
        "generated lessons from template {} ({}): {} created, {} updated, {} skipped, {} failed",
        template.id,
        template.name,
        summary.created,
        summary.updated,
        summary.skipped,
        summary.errors.len()
    );
    Ok(summary)
}

async fn apply_slot(
    repo: &dyn FullRepository,
    slot: &TimetableSlot,
    date: NaiveDate,
    skip_existing: bool,
    summary: &mut GenerationSummary,
) -> ServiceResult<()> {
    let existing = repo
        .find_instance(slot.class_obj, date, slot.lesson_number)
        .await?;

    match existing {
        Some(_) if skip_existing => {
            summary.skipped += 1;
        }
        Some(mut lesson) => {
            lesson.class_subject = slot.class_subject;
            lesson.room = slot.room;
            lesson.start_time = slot.start_time;
            lesson.end_time = slot.end_time;
            lesson.is_auto_generated = true;
            repo.update_instance(&lesson).await?;
            summary.updated += 1;
        }
        None => {
            let lesson = NewLessonInstance {
                class_obj: slot.class_obj,
                class_subject: slot.class_subject,
                date,
                lesson_number: slot.lesson_number,
                start_time: slot.start_time,
                end_time: slot.end_time,
                room: slot.room,
                topic: None,
                is_auto_generated: true,
            };
            repo.create_instance(&lesson).await?;
            summary.created += 1;
        }
    }
    Ok(())
}
