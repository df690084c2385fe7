//! Daily slot generation and the canonical lesson-number ↔ time mapping.

use serde::{Deserialize, Serialize};

use crate::models::settings::{BranchScheduleSettings, SettingsError};
use crate::models::time::TimeOfDay;

/// Lookup errors against a slot table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    /// No lesson in the table starts at exactly this time.
    #[error("no lesson slot starts at {0}")]
    UnknownSlot(TimeOfDay),
    /// No lesson in the table carries this number.
    #[error("no lesson slot numbered {0}")]
    NotFound(u8),
}

/// One entry of a generated school day: either a numbered lesson or the
/// lunch break.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySlot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub label: String,
    pub is_lunch_break: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_number: Option<u8>,
}

/// Generate the ordered slot sequence for one school day from branch settings.
///
/// Walks a cursor from `school_start_time`, emitting `lesson_duration_minutes`
/// lessons separated by `break_duration_minutes`. When the next candidate
/// lesson would overlap the configured lunch window, the lunch entry is
/// emitted instead (once) and the cursor jumps to the end of lunch. A lesson
/// that would run past the effective day end is never emitted, so the last
/// slot always ends on or before it.
///
/// A zero lesson duration yields an empty day rather than a runaway loop.
pub fn generate_day_slots(
    settings: &BranchScheduleSettings,
) -> Result<Vec<DaySlot>, SettingsError> {
    settings.validate()?;

    let mut slots = Vec::new();
    let lesson_len = settings.lesson_duration_minutes as i32;
    if lesson_len <= 0 {
        return Ok(slots);
    }
    let break_len = settings.break_duration_minutes as i32;
    let day_end = settings.day_end().minutes();
    let lunch = settings.lunch_window()?;

    let mut cursor = settings.school_start_time.minutes();
    let mut lunch_emitted = false;
    let mut number: u8 = 1;

    while cursor < day_end {
        let slot_end = cursor + lesson_len;
        if slot_end > day_end {
            break;
        }

        if let Some((lunch_start, lunch_end)) = lunch {
            let overlaps_lunch = cursor < lunch_end.minutes() && lunch_start.minutes() < slot_end;
            if !lunch_emitted && overlaps_lunch {
                slots.push(DaySlot {
                    start: lunch_start,
                    end: lunch_end,
                    label: "Tushlik".to_string(),
                    is_lunch_break: true,
                    lesson_number: None,
                });
                lunch_emitted = true;
                cursor = lunch_end.minutes();
                continue;
            }
        }

        let (Ok(start), Ok(end)) = (TimeOfDay::from_minutes(cursor), TimeOfDay::from_minutes(slot_end))
        else {
            break;
        };
        slots.push(DaySlot {
            start,
            end,
            label: format!("{}-dars", number),
            is_lunch_break: false,
            lesson_number: Some(number),
        });
        number = number.saturating_add(1);
        cursor = slot_end + break_len;
    }

    Ok(slots)
}

/// A row of the canonical slot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonSlotDefinition {
    pub lesson_number: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub label: String,
}

/// Ordered table of lesson slots with exact-match lookups.
///
/// The lesson number is a backend-required ordinal: it is always derived from
/// a time through this table, never invented by a caller, so a displayed time
/// and the stored ordinal cannot drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotTable {
    slots: Vec<LessonSlotDefinition>,
}

impl SlotTable {
    /// The canonical table, derived from the reference branch configuration.
    pub fn standard() -> Self {
        Self::from_settings(&BranchScheduleSettings::default())
            .expect("reference configuration is valid")
    }

    /// Derive a table from branch settings; lunch entries are not numbered
    /// slots and are excluded. Agrees with [`generate_day_slots`] for the
    /// same configuration by construction.
    pub fn from_settings(settings: &BranchScheduleSettings) -> Result<Self, SettingsError> {
        let slots = generate_day_slots(settings)?
            .into_iter()
            .filter_map(|slot| {
                slot.lesson_number.map(|number| LessonSlotDefinition {
                    lesson_number: number,
                    start_time: slot.start,
                    end_time: slot.end,
                    label: slot.label,
                })
            })
            .collect();
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[LessonSlotDefinition] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Exact lookup of the lesson number for a start time.
    pub fn lesson_number_from_start_time(&self, start: TimeOfDay) -> Result<u8, SlotError> {
        self.slot_by_start_time(start).map(|slot| slot.lesson_number)
    }

    pub fn slot_by_lesson_number(&self, number: u8) -> Result<&LessonSlotDefinition, SlotError> {
        self.slots
            .iter()
            .find(|slot| slot.lesson_number == number)
            .ok_or(SlotError::NotFound(number))
    }

    /// Exact lookup by start time; there is no nearest-match fallback here.
    pub fn slot_by_start_time(&self, start: TimeOfDay) -> Result<&LessonSlotDefinition, SlotError> {
        self.slots
            .iter()
            .find(|slot| slot.start_time == start)
            .ok_or(SlotError::UnknownSlot(start))
    }

    /// True iff `(start, end)` matches one table row exactly. Clipped or
    /// partial ranges are invalid.
    pub fn is_valid_range(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        self.slot_by_start_time(start)
            .map(|slot| slot.end_time == end)
            .unwrap_or(false)
    }

    pub fn next_slot(&self, number: u8) -> Result<&LessonSlotDefinition, SlotError> {
        self.slot_by_lesson_number(number.saturating_add(1))
    }

    pub fn previous_slot(&self, number: u8) -> Result<&LessonSlotDefinition, SlotError> {
        match number.checked_sub(1) {
            Some(previous) if previous >= 1 => self.slot_by_lesson_number(previous),
            _ => Err(SlotError::NotFound(0)),
        }
    }

    /// Loose lookup: the slot whose start time is closest to `start`, ties
    /// resolved toward the earlier slot. For rendering lessons into generated
    /// grids only; payload construction must use the exact lookups.
    pub fn nearest_slot(&self, start: TimeOfDay) -> Option<&LessonSlotDefinition> {
        self.slots
            .iter()
            .min_by_key(|slot| ((slot.start_time.minutes() - start.minutes()).abs(), slot.start_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn reference_settings() -> BranchScheduleSettings {
        BranchScheduleSettings::default()
    }

    #[test]
    fn test_reference_day_structure() {
        let slots = generate_day_slots(&reference_settings()).unwrap();

        let expected: Vec<(&str, &str, Option<u8>)> = vec![
            ("08:00", "08:45", Some(1)),
            ("08:55", "09:40", Some(2)),
            ("09:50", "10:35", Some(3)),
            ("10:45", "11:30", Some(4)),
            ("11:40", "12:25", Some(5)),
            ("12:35", "13:30", None),
            ("13:30", "14:15", Some(6)),
            ("14:25", "15:10", Some(7)),
            ("15:20", "16:05", Some(8)),
        ];
        assert_eq!(slots.len(), expected.len());
        for (slot, (start, end, number)) in slots.iter().zip(expected) {
            assert_eq!(slot.start, t(start));
            assert_eq!(slot.end, t(end));
            assert_eq!(slot.lesson_number, number);
            assert_eq!(slot.is_lunch_break, number.is_none());
        }
        assert_eq!(slots[5].label, "Tushlik");
        assert_eq!(slots[6].label, "6-dars");
    }

    #[test]
    fn test_no_slot_runs_past_day_end() {
        let mut settings = reference_settings();
        settings.daily_lesson_end_time = Some(t("15:00"));
        let slots = generate_day_slots(&settings).unwrap();
        assert!(!slots.is_empty());
        for slot in &slots {
            assert!(slot.end <= t("15:00"), "slot {:?} exceeds day end", slot);
        }
        // 14:25 + 45 = 15:10 > 15:00, so the day ends after lesson 6.
        assert_eq!(slots.last().unwrap().end, t("14:15"));
    }

    #[test]
    fn test_slots_are_ordered_and_disjoint() {
        let slots = generate_day_slots(&reference_settings()).unwrap();
        for pair in slots.windows(2) {
            assert!(pair[0].start < pair[1].start);
            assert!(pair[0].end <= pair[1].start, "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_lunch_emitted_exactly_once() {
        let slots = generate_day_slots(&reference_settings()).unwrap();
        assert_eq!(slots.iter().filter(|s| s.is_lunch_break).count(), 1);
    }

    #[test]
    fn test_no_lunch_configured() {
        let settings = BranchScheduleSettings {
            lunch_break_start: None,
            lunch_break_end: None,
            ..reference_settings()
        };
        let slots = generate_day_slots(&settings).unwrap();
        assert_eq!(slots.iter().filter(|s| s.is_lunch_break).count(), 0);
        // Without lunch the 45/10 rhythm continues through the afternoon.
        assert_eq!(slots[5].start, t("12:35"));
    }

    #[test]
    fn test_lunch_outside_day_never_emitted() {
        let settings = BranchScheduleSettings {
            lunch_break_start: Some(t("06:00")),
            lunch_break_end: Some(t("07:00")),
            ..reference_settings()
        };
        let slots = generate_day_slots(&settings).unwrap();
        assert!(slots.iter().all(|s| !s.is_lunch_break));

        let settings = BranchScheduleSettings {
            lunch_break_start: Some(t("17:00")),
            lunch_break_end: Some(t("18:00")),
            ..reference_settings()
        };
        let slots = generate_day_slots(&settings).unwrap();
        assert!(slots.iter().all(|s| !s.is_lunch_break));
    }

    #[test]
    fn test_zero_lesson_duration_yields_empty_day() {
        let settings = BranchScheduleSettings {
            lesson_duration_minutes: 0,
            ..reference_settings()
        };
        assert!(generate_day_slots(&settings).unwrap().is_empty());
    }

    #[test]
    fn test_unpaired_lunch_is_a_configuration_error() {
        let settings = BranchScheduleSettings {
            lunch_break_end: None,
            ..reference_settings()
        };
        assert!(generate_day_slots(&settings).is_err());
    }

    #[test]
    fn test_lesson_number_roundtrip() {
        let table = SlotTable::standard();
        for slot in table.slots() {
            assert_eq!(
                table.lesson_number_from_start_time(slot.start_time).unwrap(),
                slot.lesson_number
            );
        }
    }

    #[test]
    fn test_exact_lookup_rejects_unknown_times() {
        let table = SlotTable::standard();
        assert_eq!(
            table.lesson_number_from_start_time(t("08:01")),
            Err(SlotError::UnknownSlot(t("08:01")))
        );
        assert!(matches!(table.slot_by_lesson_number(99), Err(SlotError::NotFound(99))));
    }

    #[test]
    fn test_is_valid_range_requires_exact_bounds() {
        let table = SlotTable::standard();
        assert!(table.is_valid_range(t("08:00"), t("08:45")));
        assert!(!table.is_valid_range(t("08:00"), t("08:40")));
        assert!(!table.is_valid_range(t("08:05"), t("08:45")));
    }

    #[test]
    fn test_next_and_previous_slots() {
        let table = SlotTable::standard();
        assert_eq!(table.next_slot(1).unwrap().lesson_number, 2);
        assert_eq!(table.previous_slot(2).unwrap().lesson_number, 1);
        assert!(table.previous_slot(1).is_err());
        let last = table.slots().last().unwrap().lesson_number;
        assert!(table.next_slot(last).is_err());
    }

    #[test]
    fn test_nearest_slot_is_loose() {
        let table = SlotTable::standard();
        assert_eq!(table.nearest_slot(t("08:03")).unwrap().lesson_number, 1);
        assert_eq!(table.nearest_slot(t("08:52")).unwrap().lesson_number, 2);
        // 12:35 is equidistant from the 11:40 and 13:30 starts; earlier wins.
        assert_eq!(table.nearest_slot(t("12:35")).unwrap().lesson_number, 5);
        assert!(SlotTable { slots: vec![] }.nearest_slot(t("08:00")).is_none());
    }

    #[test]
    fn test_dynamic_table_agrees_with_generator() {
        let mut settings = reference_settings();
        settings.daily_lesson_end_time = Some(t("12:00"));
        let table = SlotTable::from_settings(&settings).unwrap();
        let generated: Vec<_> = generate_day_slots(&settings)
            .unwrap()
            .into_iter()
            .filter(|s| !s.is_lunch_break)
            .collect();
        assert_eq!(table.slots().len(), generated.len());
        for (row, slot) in table.slots().iter().zip(generated) {
            assert!(table.is_valid_range(slot.start, slot.end));
            assert_eq!(row.start_time, slot.start);
        }
    }
}
