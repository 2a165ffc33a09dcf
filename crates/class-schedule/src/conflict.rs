//! Detect scheduling conflicts between a candidate session and existing ones.
//!
//! Two sessions conflict when they fall on the same weekday, their intervals
//! overlap (`a.start < b.end && b.start < a.end`) and they share at least one
//! owner. Adjacent sessions (one ends exactly when the other starts) are NOT
//! conflicts.
//!
//! These checks are necessary but not sufficient under concurrent writers: the
//! persistence layer must serialize read-existing / check / write per owner.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::session::{OwnerId, SessionId, SessionTimeSpec};
use crate::time::{Minutes, TimeInterval};

/// A detected conflict between the candidate and one existing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub session_id: SessionId,
    pub shared_owners: Vec<OwnerId>,
    pub overlap_minutes: Minutes,
}

/// Whether `candidate` conflicts with any session in `existing`.
///
/// Only sessions on the candidate's weekday are inspected, and a session with
/// the candidate's own `id` is skipped so that editing a session never clashes
/// with its stored copy. Stops at the first conflict. A candidate with no
/// owners never conflicts.
///
/// The answer holds only for the `existing` snapshot. Callers that write the
/// candidate afterwards must hold a per-owner lock across read, check and write.
///
/// # Errors
/// Propagates `InvalidTimeFormat`/`InvalidWeekday`/`EmptyInterval` from the
/// candidate or from a same-day existing session that shares an owner with it.
pub fn has_conflict(candidate: &SessionTimeSpec, existing: &[SessionTimeSpec]) -> Result<bool> {
    let interval = candidate.interval()?;

    for other in same_day(candidate, existing) {
        // First hit is enough; later rows are left unparsed.
        if let Some(conflict) = check_pair(candidate, &interval, other)? {
            debug!(
                candidate = %candidate.id,
                existing = %conflict.session_id,
                overlap_minutes = conflict.overlap_minutes,
                "session conflict"
            );
            return Ok(true);
        }
    }
    Ok(false)
}

/// Find every existing session that conflicts with `candidate`, in input order.
///
/// Same filtering and error semantics as [`has_conflict`], without the
/// short-circuit.
pub fn find_conflicts(
    candidate: &SessionTimeSpec,
    existing: &[SessionTimeSpec],
) -> Result<Vec<Conflict>> {
    let interval = candidate.interval()?;

    let mut conflicts = Vec::new();
    for other in same_day(candidate, existing) {
        if let Some(conflict) = check_pair(candidate, &interval, other)? {
            conflicts.push(conflict);
        }
    }

    debug!(candidate = %candidate.id, count = conflicts.len(), "conflict scan");
    Ok(conflicts)
}

fn same_day<'a>(
    candidate: &'a SessionTimeSpec,
    existing: &'a [SessionTimeSpec],
) -> impl Iterator<Item = &'a SessionTimeSpec> {
    existing
        .iter()
        // The stored copy of the session being edited is not a rival.
        .filter(move |s| s.weekday == candidate.weekday && s.id != candidate.id)
}

fn check_pair(
    candidate: &SessionTimeSpec,
    interval: &TimeInterval,
    other: &SessionTimeSpec,
) -> Result<Option<Conflict>> {
    // Another owner's session is never parsed, so a broken row only blocks
    // the students it belongs to.
    let shared_owners = candidate.shared_owners(other);
    if shared_owners.is_empty() {
        return Ok(None);
    }

    let other_interval = other.interval()?;
    if !interval.overlaps(&other_interval) {
        return Ok(None);
    }

    Ok(Some(Conflict {
        session_id: other.id.clone(),
        shared_owners,
        overlap_minutes: interval.overlap_minutes(&other_interval),
    }))
}
