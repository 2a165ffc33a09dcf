//! WASM bindings for class-schedule.
//!
//! Exposes time parsing, conflict checks, stacking and free-slot lookup to the
//! browser timetable via `wasm-bindgen`. Session lists cross the boundary as
//! JSON strings of `{id, ownerIds, weekday, startsAt, endsAt}` objects
//! (weekday 0 = Monday); results come back as JSON strings too.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p class-schedule-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/class-schedule-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/class_schedule_wasm.wasm
//! ```

use std::collections::{BTreeMap, BTreeSet};

use class_schedule::session::{sessions_from_json, SessionDraft, SessionTimeSpec};
use class_schedule::{ConflictPolicy, FreeSlot, StackLayout};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StackLayoutDto<'a> {
    positions: BTreeMap<String, usize>,
    #[serde(flatten)]
    layout: &'a StackLayout,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FreeSlotDto {
    start: String,
    end: String,
    duration_minutes: i32,
}

impl From<&FreeSlot> for FreeSlotDto {
    fn from(slot: &FreeSlot) -> Self {
        Self {
            start: class_schedule::format_time(slot.start),
            end: class_schedule::format_time(slot.end),
            duration_minutes: slot.duration_minutes,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parse a candidate. Drafts from the grid (a drag still in flight) are
/// accepted as input but must be complete.
fn parse_candidate(json: &str) -> Result<SessionTimeSpec, JsValue> {
    let draft: SessionDraft = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid candidate JSON: {}", e)))?;
    draft.finalize().map_err(js_error)
}

fn parse_sessions(json: &str) -> Result<Vec<SessionTimeSpec>, JsValue> {
    sessions_from_json(json).map_err(js_error)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Parse `"HH:MM"` into minutes since midnight. Throws on malformed input.
#[wasm_bindgen(js_name = "parseTime")]
pub fn parse_time(text: &str) -> Result<i32, JsValue> {
    class_schedule::parse_time(text).map_err(js_error)
}

/// Format minutes since midnight as `"HH:MM"`.
#[wasm_bindgen(js_name = "formatTime")]
pub fn format_time(minutes: i32) -> String {
    class_schedule::format_time(minutes)
}

/// Whether the candidate session conflicts with any existing session.
#[wasm_bindgen(js_name = "hasConflict")]
pub fn has_conflict(candidate_json: &str, existing_json: &str) -> Result<bool, JsValue> {
    let candidate = parse_candidate(candidate_json)?;
    let existing = parse_sessions(existing_json)?;
    class_schedule::has_conflict(&candidate, &existing).map_err(js_error)
}

/// Every conflict of the candidate, as a JSON array of
/// `{sessionId, sharedOwners, overlapMinutes}`.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(candidate_json: &str, existing_json: &str) -> Result<String, JsValue> {
    let candidate = parse_candidate(candidate_json)?;
    let existing = parse_sessions(existing_json)?;
    let conflicts = class_schedule::find_conflicts(&candidate, &existing).map_err(js_error)?;
    to_json(&conflicts)
}

/// Track layout for the grid: `{positions, buckets, warnings}`.
#[wasm_bindgen(js_name = "assignStackPositions")]
pub fn assign_stack_positions(sessions_json: &str) -> Result<String, JsValue> {
    let sessions = parse_sessions(sessions_json)?;
    let layout = class_schedule::assign_stack_positions(&sessions);
    to_json(&StackLayoutDto {
        positions: layout.positions(),
        layout: &layout,
    })
}

/// Resolve a candidate under `"reject"` or `"stack"`; returns the resolution
/// JSON tagged by `outcome`.
#[wasm_bindgen(js_name = "resolveSession")]
pub fn resolve_session(
    candidate_json: &str,
    existing_json: &str,
    policy: &str,
) -> Result<String, JsValue> {
    let policy: ConflictPolicy = policy.parse().map_err(|e: String| JsValue::from_str(&e))?;
    let candidate = parse_candidate(candidate_json)?;
    let existing = parse_sessions(existing_json)?;
    let resolution = class_schedule::resolve(&candidate, &existing, policy).map_err(js_error)?;
    to_json(&resolution)
}

/// Free slots shared by `owners_json` (a JSON array of owner ids) on a weekday,
/// between `from` and `to` (`"HH:MM"`; `to` may be omitted for end of day).
#[wasm_bindgen(js_name = "findFreeSlots")]
pub fn find_free_slots(
    sessions_json: &str,
    owners_json: &str,
    weekday: u8,
    from: &str,
    to: Option<String>,
) -> Result<String, JsValue> {
    let sessions = parse_sessions(sessions_json)?;
    let owners: BTreeSet<String> = serde_json::from_str(owners_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid owners JSON: {}", e)))?;
    let start = class_schedule::parse_time(from).map_err(js_error)?;
    let end = match to.as_deref() {
        Some(text) => class_schedule::parse_time(text).map_err(js_error)?,
        None => class_schedule::time::MINUTES_PER_DAY,
    };

    let slots = class_schedule::find_common_free_slots(&sessions, &owners, weekday, (start, end))
        .map_err(js_error)?;
    let dtos: Vec<FreeSlotDto> = slots.iter().map(FreeSlotDto::from).collect();
    to_json(&dtos)
}

// Only success paths are exercised here: building a `JsValue` error needs a
// wasm32 host.
#[cfg(test)]
mod tests {
    use super::*;

    const SESSIONS: &str = r#"[
        {"id":"s1","ownerIds":["S1"],"weekday":1,"startsAt":"09:00","endsAt":"10:00"},
        {"id":"s2","ownerIds":["S1"],"weekday":1,"startsAt":"09:30","endsAt":"10:30"},
        {"id":"s3","ownerIds":["S1"],"weekday":1,"startsAt":"10:00","endsAt":"11:00"}
    ]"#;

    #[test]
    fn stacking_roundtrips_through_json() {
        let json = assign_stack_positions(SESSIONS).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["positions"]["s1"], 0);
        assert_eq!(value["positions"]["s2"], 1);
        assert_eq!(value["positions"]["s3"], 0);
        assert_eq!(value["buckets"][0]["depth"], 2);
    }

    #[test]
    fn conflict_checks_accept_drafts_and_sessions() {
        let candidate = r#"{"id":"new","ownerIds":["S1"],"weekday":1,"startsAt":"10:30","endsAt":"11:30"}"#;
        assert!(has_conflict(candidate, SESSIONS).unwrap());

        let other_owner = r#"{"id":"new","ownerIds":["S2"],"weekday":1,"startsAt":"10:30","endsAt":"11:30"}"#;
        assert!(!has_conflict(other_owner, SESSIONS).unwrap());
    }

    #[test]
    fn resolve_under_stack_policy() {
        let candidate = r#"{"id":"new","ownerIds":["S1"],"weekday":1,"startsAt":"09:15","endsAt":"09:45"}"#;
        let json = resolve_session(candidate, SESSIONS, "stack").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["outcome"], "stacked");
        assert_eq!(value["track"], 1);
    }

    #[test]
    fn free_slots_are_formatted() {
        let json = find_free_slots(SESSIONS, r#"["S1"]"#, 1, "08:00", Some("12:00".into())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["start"], "08:00");
        assert_eq!(value[1]["start"], "11:00");
        assert_eq!(value[1]["durationMinutes"], 60);
    }

    #[test]
    fn time_helpers() {
        assert_eq!(parse_time("07:45").unwrap(), 465);
        assert_eq!(format_time(465), "07:45");
    }
}
