//! Canonical day-of-week representation and its boundary conversions.
//!
//! The wire format is a lowercase English weekday name ("monday".."sunday");
//! internally the system uses this enum exclusively. Numeric encodings
//! (Monday=1..Sunday=7) exist only for interop and are converted here — raw
//! weekday integers never cross module boundaries.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DayOfWeekError {
    #[error("unknown weekday name {0:?}")]
    UnknownName(String),
    #[error("weekday number {0} is outside 1..=7")]
    OutOfRange(u8),
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Lowercase English name used on the wire.
    pub fn as_wire(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    pub fn from_wire(name: &str) -> Result<Self, DayOfWeekError> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_wire() == name)
            .ok_or_else(|| DayOfWeekError::UnknownName(name.to_string()))
    }

    /// ISO-style numbering, Monday=1 .. Sunday=7.
    pub fn number_from_monday(&self) -> u8 {
        Self::ALL.iter().position(|d| d == self).map(|i| i as u8 + 1).unwrap_or(1)
    }

    pub fn from_number_from_monday(n: u8) -> Result<Self, DayOfWeekError> {
        match n {
            1..=7 => Ok(Self::ALL[(n - 1) as usize]),
            _ => Err(DayOfWeekError::OutOfRange(n)),
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
            DayOfWeek::Sunday => Weekday::Sun,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for DayOfWeek {
    type Err = DayOfWeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono::Datelike;

    #[test]
    fn test_wire_roundtrip() {
        for day in DayOfWeek::ALL {
            assert_eq!(DayOfWeek::from_wire(day.as_wire()).unwrap(), day);
        }
        assert!(DayOfWeek::from_wire("Monday").is_err());
        assert!(DayOfWeek::from_wire("mon").is_err());
    }

    #[test]
    fn test_numbering_from_monday() {
        assert_eq!(DayOfWeek::Monday.number_from_monday(), 1);
        assert_eq!(DayOfWeek::Sunday.number_from_monday(), 7);
        assert_eq!(DayOfWeek::from_number_from_monday(3).unwrap(), DayOfWeek::Wednesday);
        assert!(DayOfWeek::from_number_from_monday(0).is_err());
        assert!(DayOfWeek::from_number_from_monday(8).is_err());
    }

    #[test]
    fn test_chrono_conversion() {
        // 2024-09-02 is a Monday.
        let date = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        assert_eq!(DayOfWeek::from(date.weekday()), DayOfWeek::Monday);
        assert_eq!(Weekday::from(DayOfWeek::Sunday), Weekday::Sun);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&DayOfWeek::Wednesday).unwrap(), "\"wednesday\"");
        let day: DayOfWeek = serde_json::from_str("\"saturday\"").unwrap();
        assert_eq!(day, DayOfWeek::Saturday);
    }
}
