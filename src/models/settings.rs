//! Branch-level schooling-hours configuration.
//!
//! Owned and persisted by the branch-configuration collaborator; the
//! scheduling core treats it as read-only input.

use serde::{Deserialize, Serialize};

use super::time::TimeOfDay;

/// Errors raised when branch settings are incomplete or inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("lunch break start and end must be configured together")]
    LunchBoundaryUnpaired,
    #[error("lunch break must start before it ends")]
    LunchBoundaryOrder,
    #[error("school day must start before it ends")]
    DayBoundaryOrder,
}

/// Per-branch school-day parameters driving slot generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchScheduleSettings {
    pub school_start_time: TimeOfDay,
    pub school_end_time: TimeOfDay,
    /// Optional cutoff for lesson generation when it differs from the
    /// administrative end of day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_lesson_end_time: Option<TimeOfDay>,
    pub lesson_duration_minutes: u16,
    pub break_duration_minutes: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch_break_start: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch_break_end: Option<TimeOfDay>,
}

impl Default for BranchScheduleSettings {
    /// The reference configuration: 45-minute lessons with 10-minute breaks
    /// from 08:00, lunch 12:35–13:30, last slot ending by 16:05. The canonical
    /// slot table is derived from these values.
    fn default() -> Self {
        let t = |h, m| TimeOfDay::new(h, m).expect("static time literal");
        Self {
            school_start_time: t(8, 0),
            school_end_time: t(16, 5),
            daily_lesson_end_time: None,
            lesson_duration_minutes: 45,
            break_duration_minutes: 10,
            lunch_break_start: Some(t(12, 35)),
            lunch_break_end: Some(t(13, 30)),
        }
    }
}

impl BranchScheduleSettings {
    /// The effective end of the lesson day.
    pub fn day_end(&self) -> TimeOfDay {
        self.daily_lesson_end_time.unwrap_or(self.school_end_time)
    }

    /// The configured lunch window, or `None` when the branch has none.
    ///
    /// A boundary present without its pair is a configuration error.
    pub fn lunch_window(&self) -> Result<Option<(TimeOfDay, TimeOfDay)>, SettingsError> {
        match (self.lunch_break_start, self.lunch_break_end) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => {
                if start < end {
                    Ok(Some((start, end)))
                } else {
                    Err(SettingsError::LunchBoundaryOrder)
                }
            }
            _ => Err(SettingsError::LunchBoundaryUnpaired),
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.school_start_time >= self.day_end() {
            return Err(SettingsError::DayBoundaryOrder);
        }
        self.lunch_window()?;
        Ok(())
    }
}
