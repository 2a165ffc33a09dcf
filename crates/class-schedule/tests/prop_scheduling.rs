//! Property-based tests for the scheduling core using proptest.
//!
//! These check invariants that must hold for *any* set of sessions, not just
//! the hand-picked scenarios in the other test files.

use class_schedule::session::SessionTimeSpec;
use class_schedule::time::{format_time, parse_time, TimeInterval};
use class_schedule::{assign_stack_positions, has_conflict};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A canonical "HH:MM" string.
fn arb_clock() -> impl Strategy<Value = String> {
    (0u32..24, 0u32..60).prop_map(|(h, m)| format!("{:02}:{:02}", h, m))
}

/// A valid (start, end) pair in minutes, start < end < 1440.
fn arb_range() -> impl Strategy<Value = (i32, i32)> {
    (0i32..1439).prop_flat_map(|start| (Just(start), (start + 1)..1440))
}

fn arb_interval() -> impl Strategy<Value = TimeInterval> {
    (0u8..7, arb_range()).prop_map(|(day, (start, end))| {
        TimeInterval::parse(day, &format_time(start), &format_time(end)).unwrap()
    })
}

/// Sessions for one owner on one weekday, ids "s0", "s1", ...
fn arb_bucket() -> impl Strategy<Value = Vec<SessionTimeSpec>> {
    prop::collection::vec(arb_range(), 0..25).prop_map(|ranges| {
        ranges
            .into_iter()
            .enumerate()
            .map(|(i, (start, end))| {
                SessionTimeSpec::new(
                    &format!("s{}", i),
                    ["S1"],
                    1,
                    &format_time(start),
                    &format_time(end),
                )
            })
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Maximum number of sessions running at the same minute (half-open).
fn max_simultaneous(sessions: &[SessionTimeSpec]) -> usize {
    let mut events: Vec<(i32, i32)> = Vec::new();
    for s in sessions {
        let i = s.interval().unwrap();
        events.push((i.start(), 1));
        events.push((i.end(), -1));
    }
    // Ends sort before starts at the same minute.
    events.sort();

    let mut current = 0i32;
    let mut best = 0i32;
    for (_, delta) in events {
        current += delta;
        best = best.max(current);
    }
    best as usize
}

proptest! {
    #[test]
    fn parse_format_roundtrip(text in arb_clock()) {
        prop_assert_eq!(format_time(parse_time(&text).unwrap()), text);
    }

    #[test]
    fn overlap_is_symmetric(a in arb_interval(), b in arb_interval()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        prop_assert_eq!(a.overlap_minutes(&b), b.overlap_minutes(&a));
    }

    #[test]
    fn interval_always_overlaps_itself(a in arb_interval()) {
        prop_assert!(a.overlaps(&a));
        prop_assert_eq!(a.overlap_minutes(&a), a.duration_minutes());
    }

    #[test]
    fn stacking_uses_exactly_max_overlap_tracks(sessions in arb_bucket()) {
        let layout = assign_stack_positions(&sessions);
        let expected = max_simultaneous(&sessions);

        prop_assert_eq!(layout.depth(1, "S1"), expected);

        let used: std::collections::BTreeSet<usize> =
            layout.positions().values().copied().collect();
        prop_assert_eq!(used.len(), expected);
    }

    #[test]
    fn sessions_on_the_same_track_never_overlap(sessions in arb_bucket()) {
        let layout = assign_stack_positions(&sessions);

        for (i, a) in sessions.iter().enumerate() {
            for b in &sessions[i + 1..] {
                if layout.position(&a.id) == layout.position(&b.id) {
                    let ai = a.interval().unwrap();
                    let bi = b.interval().unwrap();
                    prop_assert!(!ai.overlaps(&bi), "{} and {} share a track", a.id, b.id);
                }
            }
        }
    }

    #[test]
    fn conflict_iff_some_same_owner_overlap(sessions in arb_bucket(), (start, end) in arb_range()) {
        let candidate =
            SessionTimeSpec::new("candidate", ["S1"], 1, &format_time(start), &format_time(end));
        let ci = candidate.interval().unwrap();
        let expected = sessions.iter().any(|s| s.interval().unwrap().overlaps(&ci));

        prop_assert_eq!(has_conflict(&candidate, &sessions).unwrap(), expected);

        let stranger =
            SessionTimeSpec::new("stranger", ["S9"], 1, &format_time(start), &format_time(end));
        prop_assert!(!has_conflict(&stranger, &sessions).unwrap());
    }
}
