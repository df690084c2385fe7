//! Shared data models re-exported for database layer consumers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::api::{
    BranchScheduleSettings, ClassSubject, LessonInstance, NewLessonInstance, Room, TimetableSlot,
    TimetableTemplate,
};

use crate::api::{BranchId, ClassId};

/// Filter for lesson instance queries.
///
/// `date` and the `date_from`/`date_to` range are alternatives; when both are
/// supplied every bound applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonFilter {
    pub branch: BranchId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

impl LessonFilter {
    /// Filter covering every lesson of a branch.
    pub fn branch(branch: BranchId) -> Self {
        Self {
            branch,
            class: None,
            date: None,
            date_from: None,
            date_to: None,
        }
    }

    /// Filter covering one day of a branch.
    pub fn on_date(branch: BranchId, date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::branch(branch)
        }
    }

    pub fn with_class(mut self, class: ClassId) -> Self {
        self.class = Some(class);
        self
    }

    /// Whether a lesson's date satisfies the date bounds.
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        if let Some(exact) = self.date {
            if date != exact {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if date > to {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_exact_date_filter() {
        let filter = LessonFilter::on_date(BranchId::new(1), d(2024, 9, 2));
        assert!(filter.matches_date(d(2024, 9, 2)));
        assert!(!filter.matches_date(d(2024, 9, 3)));
    }

    #[test]
    fn test_range_filter_inclusive() {
        let filter = LessonFilter {
            date_from: Some(d(2024, 9, 2)),
            date_to: Some(d(2024, 9, 6)),
            ..LessonFilter::branch(BranchId::new(1))
        };
        assert!(filter.matches_date(d(2024, 9, 2)));
        assert!(filter.matches_date(d(2024, 9, 6)));
        assert!(!filter.matches_date(d(2024, 9, 1)));
        assert!(!filter.matches_date(d(2024, 9, 7)));
    }

    #[test]
    fn test_unbounded_filter_matches_everything() {
        let filter = LessonFilter::branch(BranchId::new(1));
        assert!(filter.matches_date(d(2020, 1, 1)));
    }
}
