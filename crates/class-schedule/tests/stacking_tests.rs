//! Tests for display-track assignment.

use class_schedule::session::SessionTimeSpec;
use class_schedule::stacking::{assign_stack_positions, NO_OWNERS};

fn session(id: &str, owners: &[&str], weekday: u8, start: &str, end: &str) -> SessionTimeSpec {
    SessionTimeSpec::new(id, owners.iter().copied(), weekday, start, end)
}

#[test]
fn staggered_three_sessions_use_two_tracks() {
    // 09:00-10:00, 09:30-10:30, 10:00-11:00 → third reuses track 0.
    let sessions = vec![
        session("s1", &["S1"], 1, "09:00", "10:00"),
        session("s2", &["S1"], 1, "09:30", "10:30"),
        session("s3", &["S1"], 1, "10:00", "11:00"),
    ];

    let layout = assign_stack_positions(&sessions);

    assert_eq!(layout.position("s1"), Some(0));
    assert_eq!(layout.position("s2"), Some(1));
    assert_eq!(layout.position("s3"), Some(0));
    assert_eq!(layout.depth(1, "S1"), 2);
    assert!(layout.warnings.is_empty());
}

#[test]
fn disjoint_sessions_share_track_zero() {
    let sessions = vec![
        session("a", &["S1"], 0, "09:00", "10:00"),
        session("b", &["S1"], 0, "11:00", "12:00"),
        session("c", &["S1"], 0, "13:00", "14:00"),
    ];

    let layout = assign_stack_positions(&sessions);

    assert_eq!(layout.depth(0, "S1"), 1);
    assert!(layout.positions().values().all(|&track| track == 0));
}

#[test]
fn fully_simultaneous_sessions_each_get_a_track() {
    let sessions = vec![
        session("c", &["S1"], 2, "15:00", "16:00"),
        session("a", &["S1"], 2, "15:00", "16:00"),
        session("b", &["S1"], 2, "15:00", "16:00"),
    ];

    let layout = assign_stack_positions(&sessions);

    // Ties are broken by id.
    assert_eq!(layout.position("a"), Some(0));
    assert_eq!(layout.position("b"), Some(1));
    assert_eq!(layout.position("c"), Some(2));
    assert_eq!(layout.depth(2, "S1"), 3);
}

#[test]
fn input_order_does_not_change_the_layout() {
    let forward = vec![
        session("s1", &["S1"], 1, "09:00", "10:00"),
        session("s2", &["S1"], 1, "09:30", "10:30"),
        session("s3", &["S1"], 1, "10:00", "11:00"),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    assert_eq!(
        assign_stack_positions(&forward),
        assign_stack_positions(&reversed)
    );
}

#[test]
fn buckets_are_per_owner_and_weekday() {
    let sessions = vec![
        session("mon-s1", &["S1"], 0, "09:00", "10:00"),
        session("mon-s2", &["S2"], 0, "09:00", "10:00"),
        session("tue-s1", &["S1"], 1, "09:00", "10:00"),
    ];

    let layout = assign_stack_positions(&sessions);

    assert_eq!(layout.buckets.len(), 3);
    assert_eq!(layout.depth(0, "S1"), 1);
    assert_eq!(layout.depth(0, "S2"), 1);
    assert_eq!(layout.depth(1, "S1"), 1);
    assert_eq!(layout.depth(3, "S1"), 0);
}

#[test]
fn group_class_is_stacked_in_every_owner_bucket() {
    let sessions = vec![
        session("private-s2", &["S2"], 0, "16:00", "17:00"),
        session("group", &["S1", "S2"], 0, "16:30", "17:30"),
    ];

    let layout = assign_stack_positions(&sessions);

    let s1 = layout.bucket(0, "S1").unwrap();
    let s2 = layout.bucket(0, "S2").unwrap();
    assert_eq!(s1.positions.get("group"), Some(&0));
    assert_eq!(s2.positions.get("group"), Some(&1));

    // Rendered in the deepest row it occupies.
    assert_eq!(layout.position("group"), Some(1));
    assert_eq!(layout.positions().get("private-s2"), Some(&0));
}

#[test]
fn invalid_sessions_become_warnings() {
    let sessions = vec![
        session("ok", &["S1"], 1, "09:00", "10:00"),
        session("bad-time", &["S1"], 1, "9 o'clock", "10:00"),
        session("inverted", &["S1"], 1, "11:00", "10:00"),
        session("bad-day", &["S1"], 9, "09:00", "10:00"),
    ];

    let layout = assign_stack_positions(&sessions);

    assert_eq!(layout.position("ok"), Some(0));
    assert_eq!(layout.position("bad-time"), None);

    let warned: Vec<&str> = layout
        .warnings
        .iter()
        .map(|w| w.session_id.as_str())
        .collect();
    assert_eq!(warned, vec!["bad-time", "inverted", "bad-day"]);
    assert!(layout.warnings[0].reason.contains("Invalid time format"));
}

#[test]
fn empty_input_gives_empty_layout() {
    let layout = assign_stack_positions(&[]);
    assert!(layout.buckets.is_empty());
    assert!(layout.warnings.is_empty());
    assert!(layout.positions().is_empty());
}

#[test]
fn layout_serializes_buckets_as_a_list() {
    let sessions = vec![session("s1", &["S1"], 1, "09:00", "10:00")];
    let layout = assign_stack_positions(&sessions);

    let json = serde_json::to_value(&layout).unwrap();
    assert_eq!(json["buckets"][0]["weekday"], 1);
    assert_eq!(json["buckets"][0]["ownerId"], "S1");
    assert_eq!(json["buckets"][0]["positions"]["s1"], 0);
    assert_eq!(json["buckets"][0]["depth"], 1);
}

#[test]
fn ownerless_session_is_reported_not_dropped() {
    let sessions = vec![
        session("ok", &["S1"], 1, "09:00", "10:00"),
        session("orphan", &[], 1, "09:00", "10:00"),
    ];

    let layout = assign_stack_positions(&sessions);

    assert_eq!(layout.position("orphan"), None);
    assert_eq!(layout.depth(1, "S1"), 1);
    assert_eq!(layout.warnings.len(), 1);
    assert_eq!(layout.warnings[0].session_id, "orphan");
    assert_eq!(layout.warnings[0].reason, NO_OWNERS);
}
