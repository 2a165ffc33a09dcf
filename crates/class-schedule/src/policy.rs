//! The two conflict policies over the single overlap predicate.
//!
//! `Reject` is the write path of a form: accept the candidate or report what it
//! clashes with. `Stack` is the interactive grid: every candidate is placed,
//! and the answer is the track it lands on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conflict::{find_conflicts, Conflict};
use crate::error::Result;
use crate::session::SessionTimeSpec;
use crate::stacking::assign_stack_positions;

/// User-facing message shown when a session is rejected for overlapping.
pub const CONFLICT_MESSAGE: &str = "시간이 겹칩니다";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Refuse a candidate that overlaps a session of any of its owners.
    #[default]
    Reject,
    /// Always place the candidate, on the lowest free display track.
    Stack,
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "stack" => Ok(Self::Stack),
            other => Err(format!(
                "unknown conflict policy '{}' (expected 'reject' or 'stack')",
                other
            )),
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => f.write_str("reject"),
            Self::Stack => f.write_str("stack"),
        }
    }
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Resolution {
    Accepted,
    Rejected {
        message: String,
        conflicts: Vec<Conflict>,
    },
    Stacked {
        /// Row the candidate is drawn in.
        track: usize,
        /// Deepest stack among the candidate's owners that day.
        depth: usize,
    },
}

impl Resolution {
    /// Whether the candidate may be persisted.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Resolution::Rejected { .. })
    }
}

/// Apply `policy` to a candidate session.
///
/// Under `Stack`, the layout is computed over `existing` plus the candidate; a
/// stored session with the candidate's id is replaced rather than duplicated,
/// so dragging a session re-stacks it in its new place.
///
/// # Errors
/// Invalid candidate times. Under `Reject`, also invalid times in existing
/// sessions on the same weekday; under `Stack` those are only excluded.
pub fn resolve(
    candidate: &SessionTimeSpec,
    existing: &[SessionTimeSpec],
    policy: ConflictPolicy,
) -> Result<Resolution> {
    let resolution = match policy {
        ConflictPolicy::Reject => {
            let conflicts = find_conflicts(candidate, existing)?;
            if conflicts.is_empty() {
                Resolution::Accepted
            } else {
                Resolution::Rejected {
                    message: CONFLICT_MESSAGE.to_string(),
                    conflicts,
                }
            }
        }
        ConflictPolicy::Stack => {
            candidate.interval()?;

            let mut sessions: Vec<SessionTimeSpec> = existing
                .iter()
                .filter(|s| s.id != candidate.id)
                .cloned()
                .collect();
            sessions.push(candidate.clone());

            let layout = assign_stack_positions(&sessions);
            let track = layout.position(&candidate.id).unwrap_or(0);
            let depth = candidate
                .owner_ids
                .iter()
                .map(|owner| layout.depth(candidate.weekday, owner))
                .max()
                .unwrap_or(0);
            Resolution::Stacked { track, depth }
        }
    };

    debug!(candidate = %candidate.id, %policy, ?resolution, "resolved session");
    Ok(resolution)
}
