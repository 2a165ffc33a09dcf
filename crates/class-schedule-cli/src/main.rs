//! `schedule` CLI - check, stack and expand weekly class sessions from the command line.
//!
//! Session lists are JSON arrays of
//! `{"id","ownerIds","weekday","startsAt","endsAt"}` objects (weekday 0 = Monday).
//!
//! ## Usage
//!
//! ```sh
//! # Would this session clash with the stored ones? (exit code 2 if rejected)
//! schedule check --candidate new.json -i sessions.json
//!
//! # Where does it land on the grid instead?
//! schedule check --candidate new.json -i sessions.json --policy stack
//!
//! # Track layout for the whole week
//! cat sessions.json | schedule stack
//!
//! # Free time for a student (or a group) on Monday
//! schedule free --owner S1 --owner S2 --weekday 0 --from 09:00 --to 18:00 -i sessions.json
//!
//! # Next four meetings of a session, in Seoul time
//! schedule expand --session lesson.json --from 2026-03-02 --weeks 4 --tz Asia/Seoul
//!
//! # Clock-time helpers
//! schedule time parse 09:30
//! schedule time format 570
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG` or pass `-v`/`-vv`.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use class_schedule::session::{sessions_from_json, SessionDraft, SessionTimeSpec};
use class_schedule::time::{Minutes, MINUTES_PER_DAY};
use class_schedule::{ConflictPolicy, Resolution, StackLayout};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Read};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit code for a candidate rejected under the `reject` policy.
const EXIT_REJECTED: i32 = 2;

#[derive(Parser)]
#[command(
    name = "schedule",
    version,
    about = "Weekly class-session conflict checking and stacking"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a candidate session against existing sessions
    Check {
        /// Candidate session (or draft) JSON file
        #[arg(long)]
        candidate: String,
        /// Existing sessions JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Conflict policy: reject or stack
        #[arg(long, env = "SCHEDULE_POLICY", default_value_t = ConflictPolicy::Reject)]
        policy: ConflictPolicy,
    },
    /// Assign display tracks to every session
    Stack {
        /// Sessions JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List free slots shared by one or more owners on a weekday
    Free {
        /// Owner id; repeat for a group
        #[arg(long, required = true)]
        owner: Vec<String>,
        /// Weekday, 0 = Monday .. 6 = Sunday
        #[arg(long)]
        weekday: u8,
        /// Window start (HH:MM)
        #[arg(long, default_value = "00:00")]
        from: String,
        /// Window end (HH:MM); end of day if omitted
        #[arg(long)]
        to: Option<String>,
        /// Only report slots at least this many minutes long
        #[arg(long, default_value_t = 0)]
        min_minutes: Minutes,
        /// Sessions JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Expand a weekly session into dated occurrences
    Expand {
        /// Session JSON file
        #[arg(long)]
        session: String,
        /// First date to consider (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Number of weekly occurrences
        #[arg(long, default_value_t = 4)]
        weeks: u32,
        /// IANA timezone the session's clock times are in
        #[arg(long, env = "SCHEDULE_TZ", default_value = "UTC")]
        tz: String,
    },
    /// Clock-time helpers
    Time {
        #[command(subcommand)]
        command: TimeCommands,
    },
}

#[derive(Subcommand)]
enum TimeCommands {
    /// Parse HH:MM into minutes since midnight
    Parse { text: String },
    /// Format minutes since midnight as HH:MM
    Format {
        #[arg(allow_hyphen_values = true)]
        minutes: Minutes,
    },
}

/// `stack` output: flattened positions next to the per-bucket layout.
#[derive(Serialize)]
struct StackReport<'a> {
    positions: BTreeMap<String, usize>,
    #[serde(flatten)]
    layout: &'a StackLayout,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FreeSlotView {
    start: String,
    end: String,
    duration_minutes: Minutes,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check {
            candidate,
            input,
            output,
            policy,
        } => {
            let candidate = read_candidate(&candidate)?;
            let existing = read_sessions(input.as_deref())?;
            info!(candidate = %candidate.id, existing = existing.len(), %policy, "checking session");

            let resolution = class_schedule::resolve(&candidate, &existing, policy)
                .context("Failed to check candidate session")?;
            write_output(output.as_deref(), &to_pretty_json(&resolution)?)?;

            if let Resolution::Rejected { message, .. } = &resolution {
                eprintln!("{}", message);
                process::exit(EXIT_REJECTED);
            }
        }
        Commands::Stack { input, output } => {
            let sessions = read_sessions(input.as_deref())?;
            let layout = class_schedule::assign_stack_positions(&sessions);
            if !layout.warnings.is_empty() {
                eprintln!(
                    "warning: {} session(s) excluded from the layout",
                    layout.warnings.len()
                );
            }

            let report = StackReport {
                positions: layout.positions(),
                layout: &layout,
            };
            write_output(output.as_deref(), &to_pretty_json(&report)?)?;
        }
        Commands::Free {
            owner,
            weekday,
            from,
            to,
            min_minutes,
            input,
        } => {
            let sessions = read_sessions(input.as_deref())?;
            let start = class_schedule::parse_time(&from).context("Invalid --from time")?;
            let end = match to.as_deref() {
                Some(text) => class_schedule::parse_time(text).context("Invalid --to time")?,
                None => MINUTES_PER_DAY,
            };
            let owners: BTreeSet<String> = owner.into_iter().collect();

            let slots =
                class_schedule::find_common_free_slots(&sessions, &owners, weekday, (start, end))
                    .context("Failed to compute free slots")?;
            let views: Vec<FreeSlotView> = slots
                .iter()
                .filter(|slot| slot.duration_minutes >= min_minutes)
                .map(|slot| FreeSlotView {
                    start: class_schedule::format_time(slot.start),
                    end: class_schedule::format_time(slot.end),
                    duration_minutes: slot.duration_minutes,
                })
                .collect();
            println!("{}", to_pretty_json(&views)?);
        }
        Commands::Expand {
            session,
            from,
            weeks,
            tz,
        } => {
            let json = read_input(Some(session.as_str()))?;
            let session: SessionTimeSpec =
                serde_json::from_str(&json).context("Failed to parse session JSON")?;
            let occurrences = class_schedule::expand_weekly(&session, from, weeks, &tz)
                .context("Failed to expand session")?;
            println!("{}", to_pretty_json(&occurrences)?);
        }
        Commands::Time { command } => match command {
            TimeCommands::Parse { text } => {
                let minutes = class_schedule::parse_time(&text).context("Failed to parse time")?;
                println!("{}", minutes);
            }
            TimeCommands::Format { minutes } => {
                println!("{}", class_schedule::format_time(minutes));
            }
        },
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Read a candidate, accepting either a full session or a draft. Drafts must
/// be complete.
fn read_candidate(path: &str) -> Result<SessionTimeSpec> {
    let json = read_input(Some(path))?;
    let draft: SessionDraft =
        serde_json::from_str(&json).context("Failed to parse candidate JSON")?;
    debug!(complete = draft.is_complete(), "loaded candidate");
    draft.finalize().context("Candidate session is not valid")
}

fn read_sessions(path: Option<&str>) -> Result<Vec<SessionTimeSpec>> {
    let json = read_input(path)?;
    let sessions = sessions_from_json(&json).context("Failed to parse sessions JSON")?;
    debug!(count = sessions.len(), "loaded sessions");
    Ok(sessions)
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
