//! Employee attendance tracking.
//!
//! This module owns the lifecycle of a worker's day: check-in with lateness
//! detection, meal and short breaks with overtime settlement, temporary exits
//! and re-entry, final check-out with gross and net hours, and the status
//! snapshot shown on the clock screen.

mod status;
mod timing;
mod tracker;

pub use status::{AlertLevel, AttendanceState, AttendanceStatus, BreakAlert, HoursTotals};
pub use timing::{elapsed_hours, lateness, round_hours, round_minutes, session_hours, settle_break};
pub use tracker::{AttendanceTracker, Checkout, EndedBreak, Resumption};
