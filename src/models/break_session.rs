//! Break session model.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of pause inside a work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakType {
    /// The unpaid meal break, once per day.
    Meal,
    /// A short paid break.
    #[default]
    Break,
}

impl BreakType {
    /// Meal breaks are unpaid; short breaks are paid.
    pub fn is_paid(self) -> bool {
        matches!(self, BreakType::Break)
    }
}

/// Lifecycle state of a break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum BreakState {
    /// The break is running.
    Open,
    /// Ended normally; timing is settled against the allowance.
    Completed {
        /// When the break ended.
        end_time: NaiveDateTime,
        /// Rounded elapsed minutes.
        duration: i64,
        /// Whether `duration` exceeded the allowance.
        is_overtime: bool,
        /// Minutes beyond the allowance, never negative.
        overtime_minutes: i64,
    },
    /// Cut short by a temporary exit; no timing is recorded.
    Interrupted {
        /// When the worker left.
        end_time: NaiveDateTime,
    },
}

/// One pause nested in a [`WorkSession`](super::WorkSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakSession {
    /// Unique identifier for the break.
    pub id: Uuid,
    /// The work session the break belongs to.
    pub work_session_id: Uuid,
    /// The worker on break.
    pub user_id: String,
    /// Calendar day of the owning work session.
    pub day_date: NaiveDate,
    /// Meal or short break.
    pub break_type: BreakType,
    /// When the break started.
    pub start_time: NaiveDateTime,
    /// Allowance in minutes.
    pub max_allowed: i64,
    /// Whether the break counts as paid time.
    pub is_paid: bool,
    /// Lifecycle state.
    #[serde(flatten)]
    pub state: BreakState,
}

impl BreakSession {
    /// Returns true while the break is running.
    pub fn is_open(&self) -> bool {
        matches!(self.state, BreakState::Open)
    }

    /// Returns true for meal breaks.
    pub fn is_meal(&self) -> bool {
        self.break_type == BreakType::Meal
    }

    /// Settled duration in minutes; `None` while open or when interrupted.
    pub fn duration(&self) -> Option<i64> {
        match self.state {
            BreakState::Completed { duration, .. } => Some(duration),
            _ => None,
        }
    }

    /// Minutes beyond the allowance, zero unless the break completed late.
    pub fn overtime_minutes(&self) -> i64 {
        match self.state {
            BreakState::Completed {
                overtime_minutes, ..
            } => overtime_minutes,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn make_break(break_type: BreakType, state: BreakState) -> BreakSession {
        BreakSession {
            id: Uuid::new_v4(),
            work_session_id: Uuid::new_v4(),
            user_id: "emp_001".to_string(),
            day_date: NaiveDate::from_ymd_opt(2026, 1, 13).unwrap(),
            break_type,
            start_time: make_datetime("2026-01-13 12:00:00"),
            max_allowed: 60,
            is_paid: break_type.is_paid(),
            state,
        }
    }

    #[test]
    fn test_meal_is_unpaid_and_break_is_paid() {
        assert!(!BreakType::Meal.is_paid());
        assert!(BreakType::Break.is_paid());
    }

    #[test]
    fn test_break_type_defaults_to_short_break() {
        assert_eq!(BreakType::default(), BreakType::Break);
    }

    #[test]
    fn test_interrupted_break_has_no_duration() {
        let brk = make_break(
            BreakType::Meal,
            BreakState::Interrupted {
                end_time: make_datetime("2026-01-13 12:30:00"),
            },
        );
        assert!(!brk.is_open());
        assert_eq!(brk.duration(), None);
        assert_eq!(brk.overtime_minutes(), 0);
    }

    #[test]
    fn test_completed_break_serialization() {
        let brk = make_break(
            BreakType::Meal,
            BreakState::Completed {
                end_time: make_datetime("2026-01-13 13:15:00"),
                duration: 75,
                is_overtime: true,
                overtime_minutes: 15,
            },
        );
        let json = serde_json::to_value(&brk).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["breakType"], "meal");
        assert_eq!(json["overtimeMinutes"], 15);

        let back: BreakSession = serde_json::from_value(json).unwrap();
        assert_eq!(back, brk);
    }
}
