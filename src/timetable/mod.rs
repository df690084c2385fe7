//! Pure scheduling core: daily slot generation, the canonical
//! lesson-number ↔ time-slot mapping, and grouping utilities.
//!
//! Everything here is a pure function over data supplied by the caller; the
//! repository-backed operations (availability, bulk generation) live in
//! [`crate::services`].

pub mod grouping;
pub mod slots;

pub use grouping::{extract_distinct_time_slots, group_by_day_and_slot, time_slot_key};
pub use slots::{
    generate_day_slots, DaySlot, LessonSlotDefinition, SlotError, SlotTable,
};
