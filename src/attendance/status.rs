//! Attendance status snapshot.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::PosResult;
use crate::models::{BreakSession, SessionState, WorkSession};
use crate::store::AttendanceStore;

use super::timing::round_minutes;
use super::tracker::AttendanceTracker;

/// Where the worker stands right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceState {
    /// No session today.
    NotCheckedIn,
    /// On the clock (short breaks included).
    Working,
    /// On the meal break.
    OnMealBreak,
    /// Stepped out, expected back.
    TemporaryExit,
    /// Checked out for the day.
    Finished,
}

/// Severity of a break alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    /// Close to the allowance.
    Warning,
    /// Past the allowance.
    Overtime,
}

/// A soft alert about the running meal break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakAlert {
    /// Severity.
    pub level: AlertLevel,
    /// Minutes since the break started.
    pub elapsed_minutes: i64,
    /// Human-readable text.
    pub message: String,
}

/// Summed hours of finished sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursTotals {
    /// Sum of gross hours.
    pub hours_worked: Decimal,
    /// Sum of net hours.
    pub net_hours_worked: Decimal,
}

impl HoursTotals {
    fn sum<'s>(sessions: impl IntoIterator<Item = &'s WorkSession>) -> Self {
        sessions
            .into_iter()
            .filter_map(WorkSession::hours)
            .fold(Self::default(), |acc, (gross, net)| Self {
                hours_worked: acc.hours_worked + gross,
                net_hours_worked: acc.net_hours_worked + net,
            })
    }
}

/// Everything the clock screen shows for a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStatus {
    /// Derived state.
    pub state: AttendanceState,
    /// The open session, or the latest one today.
    pub current_session: Option<WorkSession>,
    /// The running break, if any.
    pub active_break: Option<BreakSession>,
    /// Sessions started today.
    pub sessions_today: usize,
    /// Whether the day's meal break was already used.
    pub meal_taken_today: bool,
    /// Totals for today's finished sessions.
    pub today: HoursTotals,
    /// Totals for this ISO week's finished sessions.
    pub week: HoursTotals,
    /// Alerts about the running meal break.
    pub alerts: Vec<BreakAlert>,
}

impl<S: AttendanceStore + ?Sized> AttendanceTracker<'_, S> {
    /// Derives the worker's current state and running totals.
    pub fn status(&self, user_id: &str, now: NaiveDateTime) -> PosResult<AttendanceStatus> {
        let today = now.date();
        let sessions_today = self.store.sessions_for_day(user_id, today)?;
        let iso_week = today.iso_week();
        let week_sessions =
            self.store
                .sessions_for_week(user_id, iso_week.year(), iso_week.week())?;
        let meal_taken_today = self
            .store
            .breaks_for_day(user_id, today)?
            .iter()
            .any(BreakSession::is_meal);

        let current_session = match self.store.open_session(user_id)? {
            Some(open) => Some(open),
            None => sessions_today.last().cloned(),
        };
        let active_break = match &current_session {
            Some(session) if session.is_open() => self.open_break(session)?,
            _ => None,
        };

        let state = match (&current_session, &active_break) {
            (None, _) => AttendanceState::NotCheckedIn,
            (Some(_), Some(brk)) if brk.is_meal() => AttendanceState::OnMealBreak,
            (Some(session), _) => match session.state {
                SessionState::Open => AttendanceState::Working,
                SessionState::ClosedTemporary { .. } => AttendanceState::TemporaryExit,
                SessionState::ClosedFinal { .. } => AttendanceState::Finished,
            },
        };

        let alerts = active_break
            .as_ref()
            .filter(|brk| brk.is_meal())
            .and_then(|brk| self.meal_alert(brk, now))
            .into_iter()
            .collect();

        Ok(AttendanceStatus {
            state,
            today: HoursTotals::sum(&sessions_today),
            week: HoursTotals::sum(&week_sessions),
            sessions_today: sessions_today.len(),
            meal_taken_today,
            current_session,
            active_break,
            alerts,
        })
    }

    /// Every worker's sessions for `day`.
    pub fn day_sheet(&self, day: NaiveDate) -> PosResult<Vec<WorkSession>> {
        self.store.all_sessions_for_day(day)
    }

    fn meal_alert(&self, brk: &BreakSession, now: NaiveDateTime) -> Option<BreakAlert> {
        let elapsed_minutes = round_minutes(now - brk.start_time);
        if elapsed_minutes > self.policy.meal_break_minutes {
            Some(BreakAlert {
                level: AlertLevel::Overtime,
                elapsed_minutes,
                message: format!(
                    "Meal break is {} minutes over the {}-minute allowance",
                    elapsed_minutes - self.policy.meal_break_minutes,
                    self.policy.meal_break_minutes
                ),
            })
        } else if elapsed_minutes > self.policy.meal_warning_minutes {
            Some(BreakAlert {
                level: AlertLevel::Warning,
                elapsed_minutes,
                message: format!(
                    "Meal break ends in {} minutes",
                    self.policy.meal_break_minutes - elapsed_minutes
                ),
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AttendancePolicy;
    use crate::models::{BreakType, ExitType};
    use crate::store::MemoryStore;
    use std::str::FromStr;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_state_transitions_through_the_day() {
        let store = MemoryStore::new();
        let policy = AttendancePolicy::default();
        let tracker = AttendanceTracker::new(&store, &policy);
        let day = "2026-01-13";

        let status = tracker.status("emp_001", at(day, "07:00:00")).unwrap();
        assert_eq!(status.state, AttendanceState::NotCheckedIn);
        assert!(status.current_session.is_none());

        tracker.check_in("emp_001", at(day, "08:00:00")).unwrap();
        let status = tracker.status("emp_001", at(day, "09:00:00")).unwrap();
        assert_eq!(status.state, AttendanceState::Working);

        tracker
            .start_break("emp_001", BreakType::Break, at(day, "10:00:00"))
            .unwrap();
        let status = tracker.status("emp_001", at(day, "10:05:00")).unwrap();
        assert_eq!(status.state, AttendanceState::Working);
        assert!(status.active_break.is_some());
        tracker.end_break("emp_001", at(day, "10:10:00")).unwrap();

        tracker
            .check_out("emp_001", ExitType::Meal, at(day, "12:00:00"))
            .unwrap();
        let status = tracker.status("emp_001", at(day, "12:10:00")).unwrap();
        assert_eq!(status.state, AttendanceState::OnMealBreak);
        assert!(status.meal_taken_today);
        tracker.resume("emp_001", at(day, "12:50:00")).unwrap();

        tracker
            .check_out("emp_001", ExitType::Temporary, at(day, "14:00:00"))
            .unwrap();
        let status = tracker.status("emp_001", at(day, "14:10:00")).unwrap();
        assert_eq!(status.state, AttendanceState::TemporaryExit);

        tracker.check_in("emp_001", at(day, "14:30:00")).unwrap();
        tracker
            .check_out("emp_001", ExitType::Final, at(day, "17:30:00"))
            .unwrap();
        let status = tracker.status("emp_001", at(day, "18:00:00")).unwrap();
        assert_eq!(status.state, AttendanceState::Finished);
        assert_eq!(status.sessions_today, 2);
        // Only finished sessions carry hours.
        assert_eq!(status.today.hours_worked, dec("3"));
        assert_eq!(status.today.net_hours_worked, dec("3"));
    }

    #[test]
    fn test_week_totals_span_days() {
        let store = MemoryStore::new();
        let policy = AttendancePolicy::default();
        let tracker = AttendanceTracker::new(&store, &policy);

        // Monday and Tuesday of ISO week 3, 2026.
        tracker.check_in("emp_001", at("2026-01-12", "08:00:00")).unwrap();
        tracker
            .check_out("emp_001", ExitType::Final, at("2026-01-12", "16:00:00"))
            .unwrap();
        tracker.check_in("emp_001", at("2026-01-13", "08:00:00")).unwrap();
        tracker
            .check_out("emp_001", ExitType::Final, at("2026-01-13", "12:30:00"))
            .unwrap();

        let status = tracker.status("emp_001", at("2026-01-13", "13:00:00")).unwrap();
        assert_eq!(status.today.hours_worked, dec("4.5"));
        assert_eq!(status.week.hours_worked, dec("12.5"));
    }

    #[test]
    fn test_week_totals_cross_new_year() {
        let store = MemoryStore::new();
        let policy = AttendancePolicy::default();
        let tracker = AttendanceTracker::new(&store, &policy);

        // 2026-12-30 and 2027-01-01 both fall in ISO week 53 of 2026.
        tracker.check_in("emp_001", at("2026-12-30", "08:00:00")).unwrap();
        tracker
            .check_out("emp_001", ExitType::Final, at("2026-12-30", "16:00:00"))
            .unwrap();
        tracker.check_in("emp_001", at("2027-01-01", "08:00:00")).unwrap();
        tracker
            .check_out("emp_001", ExitType::Final, at("2027-01-01", "12:00:00"))
            .unwrap();
        let session = &store
            .sessions_for_day("emp_001", at("2027-01-01", "00:00:00").date())
            .unwrap()[0];
        assert_eq!(session.year_number, 2027);
        assert_eq!(session.week_number, 53);

        let status = tracker.status("emp_001", at("2027-01-01", "13:00:00")).unwrap();
        assert_eq!(status.today.hours_worked, dec("4"));
        assert_eq!(status.week.hours_worked, dec("12"));

        // The following Monday opens ISO week 1 of 2027.
        let status = tracker.status("emp_001", at("2027-01-04", "09:00:00")).unwrap();
        assert_eq!(status.week.hours_worked, Decimal::ZERO);
    }

    #[test]
    fn test_meal_alerts() {
        let store = MemoryStore::new();
        let policy = AttendancePolicy::default();
        let tracker = AttendanceTracker::new(&store, &policy);
        let day = "2026-01-13";
        tracker.check_in("emp_001", at(day, "08:00:00")).unwrap();
        tracker
            .start_break("emp_001", BreakType::Meal, at(day, "12:00:00"))
            .unwrap();

        let quiet = tracker.status("emp_001", at(day, "12:50:00")).unwrap();
        assert!(quiet.alerts.is_empty());

        let warning = tracker.status("emp_001", at(day, "12:55:00")).unwrap();
        assert_eq!(warning.alerts.len(), 1);
        assert_eq!(warning.alerts[0].level, AlertLevel::Warning);
        assert_eq!(warning.alerts[0].message, "Meal break ends in 5 minutes");

        let overtime = tracker.status("emp_001", at(day, "13:05:00")).unwrap();
        assert_eq!(overtime.alerts[0].level, AlertLevel::Overtime);
        assert_eq!(overtime.alerts[0].elapsed_minutes, 65);
    }
}
