//! Compute free time in an owner's week.
//!
//! Collects the owner's sessions on one weekday, merges overlapping or
//! adjacent busy periods, then returns the gaps between them within a window
//! (typically the academy's opening hours).

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{Result, ScheduleError};
use crate::session::{OwnerId, SessionTimeSpec};
use crate::time::{format_time, Minutes, MINUTES_PER_DAY};
use crate::weekday::weekday_from_index;

/// A free time slot on one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSlot {
    pub start: Minutes,
    pub end: Minutes,
    pub duration_minutes: Minutes,
}

impl FreeSlot {
    fn new(start: Minutes, end: Minutes) -> Self {
        Self {
            start,
            end,
            duration_minutes: end - start,
        }
    }

    /// `"HH:MM-HH:MM"` label for the slot.
    pub fn label(&self) -> String {
        format!("{}-{}", format_time(self.start), format_time(self.end))
    }
}

/// A `(start, end)` window in minutes since midnight.
pub type Window = (Minutes, Minutes);

/// The whole day.
pub const FULL_DAY: Window = (0, MINUTES_PER_DAY);

/// Free slots for one owner on one weekday.
///
/// # Errors
/// - `InvalidWeekday` for a weekday index above 6.
/// - `InvalidTimeFormat`/`EmptyInterval` for a window outside `[0, 1440]` or inverted.
/// - Invalid times in any of the owner's sessions on that weekday.
pub fn find_free_slots(
    sessions: &[SessionTimeSpec],
    owner: &str,
    weekday: u8,
    window: Window,
) -> Result<Vec<FreeSlot>> {
    let owners = BTreeSet::from([owner.to_string()]);
    find_common_free_slots(sessions, &owners, weekday, window)
}

/// Free slots shared by every owner in `owners`: the gaps left after any of
/// them is busy. Used to place a group class.
pub fn find_common_free_slots(
    sessions: &[SessionTimeSpec],
    owners: &BTreeSet<OwnerId>,
    weekday: u8,
    window: Window,
) -> Result<Vec<FreeSlot>> {
    weekday_from_index(weekday)?;
    let (window_start, window_end) = validate_window(window)?;
    if window_start == window_end {
        return Ok(Vec::new());
    }

    // Only the group's own sessions are parsed; anyone else's broken row is
    // irrelevant here.
    let mut busy = Vec::new();
    for session in sessions
        .iter()
        .filter(|s| s.weekday == weekday && !s.owner_ids.is_disjoint(owners))
    {
        let interval = session.interval()?;
        busy.push((interval.start(), interval.end()));
    }

    let merged = merge_busy_periods(busy, window_start, window_end);

    let mut free_slots = Vec::new();
    let mut cursor = window_start;

    // Walk the merged busy list; every gap before the next block is free.
    for (busy_start, busy_end) in merged {
        if cursor < busy_start {
            free_slots.push(FreeSlot::new(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    // Tail of the window after the last busy block.
    if cursor < window_end {
        free_slots.push(FreeSlot::new(cursor, window_end));
    }

    Ok(free_slots)
}

/// The first free slot of at least `min_duration` minutes.
pub fn find_first_free_slot(
    sessions: &[SessionTimeSpec],
    owner: &str,
    weekday: u8,
    window: Window,
    min_duration: Minutes,
) -> Result<Option<FreeSlot>> {
    Ok(find_free_slots(sessions, owner, weekday, window)?
        .into_iter()
        .find(|slot| slot.duration_minutes >= min_duration))
}

fn validate_window((start, end): Window) -> Result<Window> {
    if !(0..=MINUTES_PER_DAY).contains(&start) || !(0..=MINUTES_PER_DAY).contains(&end) {
        return Err(ScheduleError::InvalidTimeFormat(format!(
            "{}-{}",
            format_time(start),
            format_time(end)
        )));
    }
    if start > end {
        return Err(ScheduleError::EmptyInterval { start, end });
    }
    Ok((start, end))
}

/// Merge overlapping or adjacent busy periods, clipped to the window.
fn merge_busy_periods(
    mut intervals: Vec<(Minutes, Minutes)>,
    window_start: Minutes,
    window_end: Minutes,
) -> Vec<(Minutes, Minutes)> {
    // Drop periods entirely outside the window, then clip the rest to it.
    intervals.retain(|&(start, end)| start < window_end && end > window_start);
    for interval in &mut intervals {
        interval.0 = interval.0.max(window_start);
        interval.1 = interval.1.min(window_end);
    }
    intervals.sort_unstable();

    let mut merged: Vec<(Minutes, Minutes)> = Vec::new();
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            // Overlapping or touching: extend the current block.
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }
    merged
}
