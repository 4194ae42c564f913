//! Work session model.
//!
//! A [`WorkSession`] is one stretch of presence for a worker on a calendar
//! day. A day holds several sessions when the worker leaves temporarily and
//! comes back; each re-entry is a new row with the next `session_number`.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a worker leaves (or pauses) a work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitType {
    /// Leaves for a while and will check in again today.
    Temporary,
    /// Starts the day's meal break; the session stays open.
    Meal,
    /// Done for the day.
    Final,
}

/// Lifecycle state of a work session.
///
/// Replaces the "`end_time` is null" convention with an explicit tag so that
/// an open session can never carry hour totals and a closed one always has
/// its end time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SessionState {
    /// The worker is on the clock (possibly on a break).
    Open,
    /// The worker stepped out and is expected back the same day.
    ClosedTemporary {
        /// When the worker left.
        end_time: NaiveDateTime,
    },
    /// The worker checked out for the day.
    ClosedFinal {
        /// When the worker left.
        end_time: NaiveDateTime,
        /// Elapsed hours, rounded to 2 decimals.
        hours_worked: Decimal,
        /// Elapsed hours minus unpaid meal time, rounded to 2 decimals.
        net_hours_worked: Decimal,
    },
}

/// One attendance record for a worker on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSession {
    /// Unique identifier for the session.
    pub id: Uuid,
    /// The worker who owns the session.
    pub user_id: String,
    /// Calendar day the session belongs to.
    pub day_date: NaiveDate,
    /// 1-based position of the session within the worker's day.
    pub session_number: u32,
    /// Check-in time.
    pub start_time: NaiveDateTime,
    /// Whether the check-in was on time (only judged for session 1).
    pub is_on_time: bool,
    /// Minutes past the expected start (only judged for session 1).
    pub minutes_late: i64,
    /// ISO week of the check-in.
    pub week_number: u32,
    /// Calendar year of the check-in.
    pub year_number: i32,
    /// Lifecycle state.
    #[serde(flatten)]
    pub state: SessionState,
}

impl WorkSession {
    /// Returns true while the worker is on the clock.
    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open)
    }

    /// Returns the end time once the session is closed.
    pub fn end_time(&self) -> Option<NaiveDateTime> {
        match self.state {
            SessionState::Open => None,
            SessionState::ClosedTemporary { end_time }
            | SessionState::ClosedFinal { end_time, .. } => Some(end_time),
        }
    }

    /// Returns how the session was closed, if it was.
    pub fn exit_type(&self) -> Option<ExitType> {
        match self.state {
            SessionState::Open => None,
            SessionState::ClosedTemporary { .. } => Some(ExitType::Temporary),
            SessionState::ClosedFinal { .. } => Some(ExitType::Final),
        }
    }

    /// Returns `(hours_worked, net_hours_worked)` for a finished session.
    pub fn hours(&self) -> Option<(Decimal, Decimal)> {
        match self.state {
            SessionState::ClosedFinal {
                hours_worked,
                net_hours_worked,
                ..
            } => Some((hours_worked, net_hours_worked)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn make_session(state: SessionState) -> WorkSession {
        WorkSession {
            id: Uuid::new_v4(),
            user_id: "emp_001".to_string(),
            day_date: NaiveDate::from_ymd_opt(2026, 1, 13).unwrap(),
            session_number: 1,
            start_time: make_datetime("2026-01-13 08:00:00"),
            is_on_time: true,
            minutes_late: 0,
            week_number: 3,
            year_number: 2026,
            state,
        }
    }

    #[test]
    fn test_open_session_has_no_end_or_hours() {
        let session = make_session(SessionState::Open);
        assert!(session.is_open());
        assert_eq!(session.end_time(), None);
        assert_eq!(session.exit_type(), None);
        assert_eq!(session.hours(), None);
    }

    #[test]
    fn test_final_session_exposes_hours() {
        let session = make_session(SessionState::ClosedFinal {
            end_time: make_datetime("2026-01-13 16:00:00"),
            hours_worked: Decimal::new(800, 2),
            net_hours_worked: Decimal::new(717, 2),
        });
        assert!(!session.is_open());
        assert_eq!(session.exit_type(), Some(ExitType::Final));
        assert_eq!(
            session.hours(),
            Some((Decimal::new(800, 2), Decimal::new(717, 2)))
        );
    }

    #[test]
    fn test_serializes_status_tag_inline() {
        let session = make_session(SessionState::ClosedTemporary {
            end_time: make_datetime("2026-01-13 10:00:00"),
        });
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["status"], "closed_temporary");
        assert_eq!(json["endTime"], "2026-01-13T10:00:00");
        assert_eq!(json["sessionNumber"], 1);

        let back: WorkSession = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_exit_type_deserialization() {
        let exit: ExitType = serde_json::from_str("\"temporary\"").unwrap();
        assert_eq!(exit, ExitType::Temporary);
        assert!(serde_json::from_str::<ExitType>("\"lunch\"").is_err());
    }
}
