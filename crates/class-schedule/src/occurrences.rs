//! Expand a weekly session into dated occurrences for calendar and export views.
//!
//! Wraps the `rrule` crate: the session becomes an RFC 5545
//! `FREQ=WEEKLY;BYDAY=..;COUNT=n` rule anchored in an IANA timezone, so wall
//! clock times survive DST transitions.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rrule::RRuleSet;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::session::{SessionId, SessionTimeSpec};
use crate::time::format_time;
use crate::weekday::rrule_byday;

/// One concrete meeting of a weekly session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub session_id: SessionId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Expand `session` into its next `weeks` meetings on or after `from`.
///
/// The first occurrence is the first date on or after `from` that falls on the
/// session's weekday. Times are interpreted in `timezone`; a meeting that
/// falls in a spring-forward gap is moved past the gap.
///
/// # Errors
/// - `InvalidTimezone` if `timezone` is not a valid IANA identifier.
/// - `InvalidRule` if the generated rule cannot be expanded, or `weeks` does
///   not fit the rule's `COUNT`.
/// - Any interval error from the session itself.
pub fn expand_weekly(
    session: &SessionTimeSpec,
    from: NaiveDate,
    weeks: u32,
    timezone: &str,
) -> Result<Vec<Occurrence>> {
    let interval = session.interval()?;

    let tz: chrono_tz::Tz = timezone
        .parse()
        .map_err(|_| ScheduleError::InvalidTimezone(timezone.to_string()))?;

    if weeks == 0 {
        return Ok(Vec::new());
    }
    let count = u16::try_from(weeks).map_err(|_| {
        ScheduleError::InvalidRule(format!("cannot expand {} weeks (at most {})", weeks, u16::MAX))
    })?;

    let target = interval.weekday().num_days_from_monday() as i64;
    let current = from.weekday().num_days_from_monday() as i64;
    let first = from + Duration::days((target - current).rem_euclid(7));

    let hour = (interval.start() / 60) as u32;
    let minute = (interval.start() % 60) as u32;
    let start_time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| ScheduleError::InvalidTimeFormat(format_time(interval.start())))?;

    // `rrule` refuses a DTSTART inside a spring-forward gap but shifts later
    // gap dates forward. Anchor a week early and drop that extra meeting.
    let in_gap = tz
        .from_local_datetime(&first.and_time(start_time))
        .earliest()
        .is_none();
    let (anchor, limit) = if in_gap {
        let limit = count.checked_add(1).ok_or_else(|| {
            ScheduleError::InvalidRule(format!(
                "cannot expand {} weeks (at most {})",
                weeks,
                u16::MAX - 1
            ))
        })?;
        (first - Duration::weeks(1), limit)
    } else {
        (first, count)
    };

    let rrule_text = format!(
        "DTSTART;TZID={}:{}T{:02}{:02}00\nRRULE:FREQ=WEEKLY;BYDAY={};COUNT={}",
        timezone,
        anchor.format("%Y%m%d"),
        hour,
        minute,
        rrule_byday(interval.weekday()),
        limit
    );

    let rrule_set: RRuleSet = rrule_text
        .parse()
        .map_err(|e| ScheduleError::InvalidRule(format!("{}", e)))?;

    let duration = Duration::minutes(interval.duration_minutes() as i64);
    let occurrences: Vec<Occurrence> = rrule_set
        .all(limit)
        .dates
        .into_iter()
        .skip(usize::from(in_gap))
        .map(|dt| {
            let start = dt.with_timezone(&Utc);
            Occurrence {
                session_id: session.id.clone(),
                start,
                end: start + duration,
            }
        })
        .collect();

    debug!(session = %session.id, count = occurrences.len(), timezone, "expanded weekly session");
    Ok(occurrences)
}
