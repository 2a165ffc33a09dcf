//! Clock-time parsing and the weekly [`TimeInterval`] value object.
//!
//! Times are stored everywhere else as `"HH:MM"` strings; a `TimeInterval` is
//! the ephemeral, validated view built from them whenever two sessions are
//! compared. Intervals are half-open: `[start, end)`.

use chrono::Weekday;

use crate::error::{Result, ScheduleError};
use crate::weekday::{weekday_from_index, weekday_index};

/// Minutes since midnight.
pub type Minutes = i32;

/// Number of minutes in a day; valid clock times lie in `[0, MINUTES_PER_DAY)`.
pub const MINUTES_PER_DAY: Minutes = 24 * 60;

/// Parse `"HH:MM"` into minutes since midnight.
///
/// Each group must be one or two ASCII digits, the hour in `0..=23` and the
/// minute in `0..=59`. There is no lenient fallback: malformed input is an
/// error, never midnight.
///
/// # Errors
/// Returns `ScheduleError::InvalidTimeFormat` carrying the offending text.
pub fn parse_time(text: &str) -> Result<Minutes> {
    let invalid = || ScheduleError::InvalidTimeFormat(text.to_string());

    let (hour, minute) = text.split_once(':').ok_or_else(invalid)?;
    let hour = parse_group(hour).ok_or_else(invalid)?;
    let minute = parse_group(minute).ok_or_else(invalid)?;

    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok(hour * 60 + minute)
}

fn parse_group(group: &str) -> Option<Minutes> {
    if group.is_empty() || group.len() > 2 || !group.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    group.parse().ok()
}

/// Format minutes since midnight as `"HH:MM"`.
///
/// Out-of-day values are not clamped. Hours use floor division and minutes a
/// non-negative remainder, so `-60` formats as `"-1:00"`, `-30` as `"-1:30"`
/// and `1500` as `"25:00"`.
pub fn format_time(minutes: Minutes) -> String {
    let hours = minutes.div_euclid(60);
    let mins = minutes.rem_euclid(60);
    format!("{:02}:{:02}", hours, mins)
}

/// A validated half-open time range on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeInterval {
    weekday: Weekday,
    start: Minutes,
    end: Minutes,
}

impl TimeInterval {
    /// Build an interval from minute offsets.
    ///
    /// # Errors
    /// - `InvalidTimeFormat` if either bound lies outside `[0, 1440)`.
    /// - `EmptyInterval` if `start >= end`.
    pub fn new(weekday: Weekday, start: Minutes, end: Minutes) -> Result<Self> {
        for bound in [start, end] {
            if !(0..MINUTES_PER_DAY).contains(&bound) {
                return Err(ScheduleError::InvalidTimeFormat(format_time(bound)));
            }
        }
        if start >= end {
            return Err(ScheduleError::EmptyInterval { start, end });
        }
        Ok(Self {
            weekday,
            start,
            end,
        })
    }

    /// Build an interval from a wire weekday index and two `"HH:MM"` strings.
    pub fn parse(weekday: u8, starts_at: &str, ends_at: &str) -> Result<Self> {
        let weekday = weekday_from_index(weekday)?;
        Self::new(weekday, parse_time(starts_at)?, parse_time(ends_at)?)
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn weekday_index(&self) -> u8 {
        weekday_index(self.weekday)
    }

    pub fn start(&self) -> Minutes {
        self.start
    }

    pub fn end(&self) -> Minutes {
        self.end
    }

    pub fn duration_minutes(&self) -> Minutes {
        self.end - self.start
    }

    /// Whether the two intervals share any minute.
    ///
    /// True iff both fall on the same weekday and `a.start < b.end && b.start < a.end`.
    /// Touching intervals (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        overlaps(self, other)
    }

    /// Length of the shared range in minutes, or 0 when the intervals do not overlap.
    pub fn overlap_minutes(&self, other: &TimeInterval) -> Minutes {
        if !self.overlaps(other) {
            return 0;
        }
        self.end.min(other.end) - self.start.max(other.start)
    }
}

/// Half-open overlap test between two weekly intervals.
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> bool {
    a.weekday == b.weekday && a.start < b.end && b.start < a.end
}
