//! Session records as the rest of the application stores them.
//!
//! A [`SessionTimeSpec`] keeps its time fields as primitives (`weekday` index,
//! `"HH:MM"` strings); [`SessionTimeSpec::interval`] derives the validated
//! [`TimeInterval`] view on demand.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::time::TimeInterval;

/// Opaque session identifier.
pub type SessionId = String;

/// Opaque identifier of a calendar owner (a student, a room, a teacher).
pub type OwnerId = String;

/// One weekly recurring class session.
///
/// Two sessions conflict iff their intervals overlap **and** they share at
/// least one owner. A session with several owners is a group class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTimeSpec {
    pub id: SessionId,
    #[serde(default)]
    pub owner_ids: BTreeSet<OwnerId>,
    /// 0 = Monday .. 6 = Sunday.
    pub weekday: u8,
    pub starts_at: String,
    pub ends_at: String,
}

impl SessionTimeSpec {
    pub fn new<I, S>(id: &str, owners: I, weekday: u8, starts_at: &str, ends_at: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OwnerId>,
    {
        Self {
            id: id.to_string(),
            owner_ids: owners.into_iter().map(Into::into).collect(),
            weekday,
            starts_at: starts_at.to_string(),
            ends_at: ends_at.to_string(),
        }
    }

    /// Parse the stored primitives into a validated interval.
    pub fn interval(&self) -> Result<TimeInterval> {
        TimeInterval::parse(self.weekday, &self.starts_at, &self.ends_at)
    }

    pub fn has_owner(&self, owner: &str) -> bool {
        self.owner_ids.contains(owner)
    }

    /// Owners present in both sessions, in sorted order.
    pub fn shared_owners(&self, other: &SessionTimeSpec) -> Vec<OwnerId> {
        self.owner_ids
            .intersection(&other.owner_ids)
            .cloned()
            .collect()
    }

    pub fn shares_owner_with(&self, other: &SessionTimeSpec) -> bool {
        self.owner_ids
            .intersection(&other.owner_ids)
            .next()
            .is_some()
    }
}

/// A session still being edited: a form half filled in, or a drag in flight.
///
/// Missing fields stay `None` until the user supplies them. Drafts never reach
/// the conflict predicate; [`SessionDraft::finalize`] is the only way in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    pub id: SessionId,
    #[serde(default)]
    pub owner_ids: BTreeSet<OwnerId>,
    pub weekday: Option<u8>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
}

impl SessionDraft {
    pub fn is_complete(&self) -> bool {
        self.weekday.is_some() && self.starts_at.is_some() && self.ends_at.is_some()
    }

    /// Turn a complete draft into a session, validating its interval.
    ///
    /// # Errors
    /// `IncompleteDraft` naming the first missing field, or any error from
    /// [`SessionTimeSpec::interval`].
    pub fn finalize(self) -> Result<SessionTimeSpec> {
        let weekday = self
            .weekday
            .ok_or(ScheduleError::IncompleteDraft("weekday"))?;
        let starts_at = self
            .starts_at
            .ok_or(ScheduleError::IncompleteDraft("startsAt"))?;
        let ends_at = self
            .ends_at
            .ok_or(ScheduleError::IncompleteDraft("endsAt"))?;

        let session = SessionTimeSpec {
            id: self.id,
            owner_ids: self.owner_ids,
            weekday,
            starts_at,
            ends_at,
        };
        session.interval()?;
        Ok(session)
    }
}

/// Parse a JSON array of sessions.
pub fn sessions_from_json(json: &str) -> Result<Vec<SessionTimeSpec>> {
    Ok(serde_json::from_str(json)?)
}
