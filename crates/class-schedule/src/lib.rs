//! # class-schedule
//!
//! Overlap detection and conflict resolution for weekly recurring class
//! sessions.
//!
//! A session is a weekday plus a `"HH:MM"` to `"HH:MM"` range, owned by one or
//! more students (or rooms, or teachers). Two sessions conflict when their
//! half-open intervals overlap and they share an owner. The crate offers two
//! policies over that one predicate: reject the candidate (form submission) or
//! stack it onto a free display track (drag-and-drop grid).
//!
//! Everything here is pure and synchronous. Callers pass in the sessions they
//! already loaded; nothing reads from storage or global state.
//!
//! ## Modules
//!
//! - [`time`] - `"HH:MM"` parsing/formatting and the [`TimeInterval`] value object
//! - [`weekday`] - the Monday = 0 weekday convention and day labels
//! - [`session`] - [`SessionTimeSpec`] and in-progress [`SessionDraft`]s
//! - [`conflict`] - `has_conflict` / `find_conflicts`
//! - [`stacking`] - greedy track assignment for the weekly grid
//! - [`policy`] - `Reject` / `Stack` resolution of a candidate session
//! - [`freebusy`] - free slots for an owner or a group of owners
//! - [`occurrences`] - weekly session → dated occurrences
//! - [`error`] - Error types

pub mod conflict;
pub mod error;
pub mod freebusy;
pub mod occurrences;
pub mod policy;
pub mod session;
pub mod stacking;
pub mod time;
pub mod weekday;

pub use conflict::{find_conflicts, has_conflict, Conflict};
pub use error::{Result, ScheduleError};
pub use freebusy::{find_common_free_slots, find_free_slots, FreeSlot};
pub use occurrences::{expand_weekly, Occurrence};
pub use policy::{resolve, ConflictPolicy, Resolution};
pub use session::{SessionDraft, SessionTimeSpec};
pub use stacking::{assign_stack_positions, StackLayout};
pub use time::{format_time, parse_time, Minutes, TimeInterval};
