//! Assign display tracks so simultaneous sessions never draw on top of each other.
//!
//! Sessions are grouped by `(weekday, owner)`; a group class appears in the
//! bucket of every owner it has. Within a bucket, sessions are sorted by start
//! time (ties by id) and placed greedily: each goes into the first track whose
//! last session has already ended, or opens a new track. This is the classic
//! interval-partitioning greedy, so the number of tracks in a bucket equals
//! the maximum number of sessions running at the same instant.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::session::{OwnerId, SessionId, SessionTimeSpec};
use crate::time::{Minutes, TimeInterval};

/// Key of one stacking bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketKey {
    /// 0 = Monday .. 6 = Sunday.
    pub weekday: u8,
    pub owner_id: OwnerId,
}

/// Track assignment for one `(weekday, owner)` bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// `sessionId -> track`, 0-based.
    pub positions: BTreeMap<SessionId, usize>,
    /// Number of tracks used, i.e. the maximum simultaneous overlap.
    pub depth: usize,
}

/// Reason given for a session with an empty owner set.
pub const NO_OWNERS: &str = "session has no owners";

/// A session left out of the layout because its stored fields do not form a
/// valid interval, or because it belongs to nobody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataWarning {
    pub session_id: SessionId,
    pub reason: String,
}

/// Result of a stacking pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StackLayout {
    #[serde(serialize_with = "serialize_buckets")]
    pub buckets: BTreeMap<BucketKey, Bucket>,
    pub warnings: Vec<DataWarning>,
}

impl StackLayout {
    /// The row a renderer should draw `id` in: the highest track the session
    /// received across all of its owners' buckets.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.buckets
            .values()
            .filter_map(|bucket| bucket.positions.get(id).copied())
            .max()
    }

    /// [`StackLayout::position`] for every placed session.
    pub fn positions(&self) -> BTreeMap<SessionId, usize> {
        let mut out: BTreeMap<SessionId, usize> = BTreeMap::new();
        for bucket in self.buckets.values() {
            for (id, &track) in &bucket.positions {
                let entry = out.entry(id.clone()).or_insert(track);
                *entry = (*entry).max(track);
            }
        }
        out
    }

    /// Track count for one bucket; 0 when the owner has nothing that day.
    pub fn depth(&self, weekday: u8, owner: &str) -> usize {
        let key = BucketKey {
            weekday,
            owner_id: owner.to_string(),
        };
        self.buckets.get(&key).map_or(0, |bucket| bucket.depth)
    }

    pub fn bucket(&self, weekday: u8, owner: &str) -> Option<&Bucket> {
        self.buckets.get(&BucketKey {
            weekday,
            owner_id: owner.to_string(),
        })
    }
}

/// Assign a non-overlapping track to every valid session.
///
/// Never fails: invalid or ownerless sessions are skipped and reported in
/// [`StackLayout::warnings`].
pub fn assign_stack_positions(sessions: &[SessionTimeSpec]) -> StackLayout {
    let mut grouped: BTreeMap<BucketKey, Vec<(&SessionTimeSpec, TimeInterval)>> = BTreeMap::new();
    let mut warnings = Vec::new();

    for session in sessions {
        let interval = match session.interval() {
            Ok(interval) => interval,
            Err(e) => {
                warn!(session = %session.id, error = %e, "excluding session from stacking");
                warnings.push(DataWarning {
                    session_id: session.id.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        // No owner means no column to draw the session in.
        if session.owner_ids.is_empty() {
            warn!(session = %session.id, "excluding ownerless session from stacking");
            warnings.push(DataWarning {
                session_id: session.id.clone(),
                reason: NO_OWNERS.to_string(),
            });
            continue;
        }

        for owner in &session.owner_ids {
            grouped
                .entry(BucketKey {
                    weekday: session.weekday,
                    owner_id: owner.clone(),
                })
                .or_default()
                .push((session, interval));
        }
    }

    let buckets: BTreeMap<BucketKey, Bucket> = grouped
        .into_iter()
        .map(|(key, members)| {
            let bucket = partition(members);
            debug!(
                weekday = key.weekday,
                owner = %key.owner_id,
                depth = bucket.depth,
                "stacked bucket"
            );
            (key, bucket)
        })
        .collect();

    StackLayout { buckets, warnings }
}

/// Greedy interval partitioning of one bucket.
fn partition(mut members: Vec<(&SessionTimeSpec, TimeInterval)>) -> Bucket {
    members.sort_by(|(a, ai), (b, bi)| ai.start().cmp(&bi.start()).then_with(|| a.id.cmp(&b.id)));

    // Last end time of each open track.
    let mut tracks: Vec<Minutes> = Vec::new();
    let mut positions = BTreeMap::new();

    for (session, interval) in members {
        let track = match tracks.iter().position(|&last_end| last_end <= interval.start()) {
            Some(index) => {
                tracks[index] = interval.end();
                index
            }
            None => {
                tracks.push(interval.end());
                tracks.len() - 1
            }
        };
        positions.insert(session.id.clone(), track);
    }

    Bucket {
        positions,
        depth: tracks.len(),
    }
}

/// Buckets serialize as a list of `{weekday, ownerId, positions, depth}` since
/// JSON object keys must be strings.
fn serialize_buckets<S>(
    buckets: &BTreeMap<BucketKey, Bucket>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Entry<'a> {
        weekday: u8,
        owner_id: &'a str,
        positions: &'a BTreeMap<SessionId, usize>,
        depth: usize,
    }

    serializer.collect_seq(buckets.iter().map(|(key, bucket)| Entry {
        weekday: key.weekday,
        owner_id: &key.owner_id,
        positions: &bucket.positions,
        depth: bucket.depth,
    }))
}
