//! The single weekday convention used across the crate.
//!
//! Weekdays travel as `u8` indices with **Monday = 0 through Sunday = 6**
//! (ISO-8601 order, zero-based). Every label table in this module is indexed
//! the same way, so a grid header and a stored `weekday` field can never
//! disagree about which column is Sunday.

use chrono::Weekday;

use crate::error::{Result, ScheduleError};

/// Short Korean day labels, Monday first.
pub const KOREAN_LABELS: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];

/// Short English day labels, Monday first.
pub const ENGLISH_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Convert a wire weekday index into a [`Weekday`].
///
/// # Errors
/// Returns `ScheduleError::InvalidWeekday` for indices above 6.
pub fn weekday_from_index(index: u8) -> Result<Weekday> {
    Weekday::try_from(index).map_err(|_| ScheduleError::InvalidWeekday(index))
}

/// The wire index of a [`Weekday`] (Monday = 0).
pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_monday() as u8
}

/// Korean short label for a weekday, e.g. `"월"` for Monday.
pub fn korean_label(day: Weekday) -> &'static str {
    KOREAN_LABELS[day.num_days_from_monday() as usize]
}

/// English short label for a weekday, e.g. `"Mon"` for Monday.
pub fn english_label(day: Weekday) -> &'static str {
    ENGLISH_LABELS[day.num_days_from_monday() as usize]
}

/// RFC 5545 `BYDAY` code for a weekday, e.g. `"MO"`.
pub(crate) fn rrule_byday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}
