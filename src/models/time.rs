//! Wall-clock time primitives for the scheduling core.
//!
//! All comparisons happen at minute granularity: both `"HH:mm"` and
//! `"HH:mm:ss"` inputs normalize to the same minutes-since-midnight value.
//! Functions that need "now" take an injected [`Clock`] so that lesson
//! classification is deterministic under test.

use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Timezone of the reference deployment. The organization timezone is
/// configuration, not an assumption baked into arithmetic.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Tashkent;

/// Errors from time parsing and conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    /// Input did not match `"HH:mm"` or `"HH:mm:ss"`, or a field was out of range.
    #[error("invalid time {0:?}: expected HH:mm or HH:mm:ss")]
    InvalidFormat(String),
    /// Minute offset outside `0..=1439`; wrapping past midnight is a caller error.
    #[error("minute offset {0} is outside 0..=1439")]
    OutOfRange(i32),
}

/// A wall-clock time of day, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MINUTES_PER_DAY: i32 = 24 * 60;

    /// Create from an hour and minute.
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeError> {
        if hour > 23 || minute > 59 {
            return Err(TimeError::InvalidFormat(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(Self(hour as u16 * 60 + minute as u16))
    }

    /// Parse `"HH:mm"` or `"HH:mm:ss"`. Seconds are validated and discarded.
    pub fn parse(input: &str) -> Result<Self, TimeError> {
        let invalid = || TimeError::InvalidFormat(input.to_string());
        let parts: Vec<&str> = input.split(':').collect();
        if !(parts.len() == 2 || parts.len() == 3) {
            return Err(invalid());
        }
        let mut fields = [0u8; 3];
        for (i, part) in parts.iter().enumerate() {
            if part.is_empty() || part.len() > 2 {
                return Err(invalid());
            }
            fields[i] = part.parse().map_err(|_| invalid())?;
        }
        let (hour, minute, second) = (fields[0], fields[1], fields[2]);
        if second > 59 {
            return Err(invalid());
        }
        Self::new(hour, minute).map_err(|_| invalid())
    }

    /// Inverse of [`TimeOfDay::minutes`]. `minutes` must stay within the same day.
    pub fn from_minutes(minutes: i32) -> Result<Self, TimeError> {
        if !(0..Self::MINUTES_PER_DAY).contains(&minutes) {
            return Err(TimeError::OutOfRange(minutes));
        }
        Ok(Self(minutes as u16))
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> i32 {
        self.0 as i32
    }

    pub fn hour(&self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.0 % 60) as u8
    }

    /// Wire representation, always `"HH:mm:ss"`.
    pub fn to_wire(&self) -> String {
        format!("{:02}:{:02}:00", self.hour(), self.minute())
    }

    /// Offset by a signed number of minutes, erroring when the result would
    /// leave the day.
    pub fn offset(&self, minutes: i32) -> Result<Self, TimeError> {
        Self::from_minutes(self.minutes() + minutes)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Signed duration between two times, in minutes.
///
/// Negative when `end` precedes `start`; callers must treat a negative
/// duration as invalid input.
pub fn duration_minutes(start: TimeOfDay, end: TimeOfDay) -> i32 {
    end.minutes() - start.minutes()
}

/// Source of "now" in the organization timezone.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Tz>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn current_time(&self) -> TimeOfDay {
        let now = self.now();
        TimeOfDay((now.hour() * 60 + now.minute()) as u16)
    }
}

/// System clock shifted into a configured organization timezone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }
}

/// Clock pinned to a single instant, for deterministic classification tests.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: DateTime<Tz>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Tz>) -> Self {
        Self { instant }
    }

    /// Pin the clock to a local date and wall-clock time in the default
    /// organization timezone.
    pub fn at(date: NaiveDate, time: TimeOfDay) -> Self {
        let naive = date
            .and_hms_opt(time.hour() as u32, time.minute() as u32, 0)
            .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN));
        let instant = DEFAULT_TIMEZONE
            .from_local_datetime(&naive)
            .earliest()
            .unwrap_or_else(|| DEFAULT_TIMEZONE.from_utc_datetime(&naive));
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.instant
    }
}

/// Classification of a dated lesson relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonTiming {
    Past,
    Ongoing,
    Upcoming,
}

/// Classify a lesson occupying `[start, end)` on `date`.
///
/// A lesson is ongoing while `start <= now < end` on its own date; it becomes
/// past at the exact minute it ends.
pub fn classify_lesson(
    date: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
    clock: &dyn Clock,
) -> LessonTiming {
    let today = clock.today();
    if date < today {
        return LessonTiming::Past;
    }
    if date > today {
        return LessonTiming::Upcoming;
    }
    let now = clock.current_time();
    if now.minutes() >= end.minutes() {
        LessonTiming::Past
    } else if now.minutes() >= start.minutes() {
        LessonTiming::Ongoing
    } else {
        LessonTiming::Upcoming
    }
}

/// True iff "now" falls on `date` within `[start, end)`.
pub fn is_ongoing(date: NaiveDate, start: TimeOfDay, end: TimeOfDay, clock: &dyn Clock) -> bool {
    classify_lesson(date, start, end, clock) == LessonTiming::Ongoing
}

/// True iff the lesson has finished: `date` before today, or today with
/// `now >= end`.
pub fn is_past(date: NaiveDate, end: TimeOfDay, clock: &dyn Clock) -> bool {
    // Start does not affect the past check; midnight is a safe lower bound.
    let start = TimeOfDay(0);
    classify_lesson(date, start, end, clock) == LessonTiming::Past
}
