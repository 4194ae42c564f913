//! Check-in, check-out, breaks and re-entry.

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AttendancePolicy;
use crate::error::{PosError, PosResult};
use crate::models::{
    BreakSession, BreakState, BreakType, ExitType, SessionState, WorkSession,
};
use crate::store::AttendanceStore;

use super::timing::{lateness, round_minutes, session_hours, settle_break};

/// A break that was just ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndedBreak {
    /// The closed break.
    pub break_session: BreakSession,
    /// Human-readable notice when the break ran over its allowance.
    pub overtime_notice: Option<String>,
}

/// What a check-out did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "exitType", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Checkout {
    /// The meal break started; the session stays open.
    Meal {
        /// The still-open session.
        work_session: WorkSession,
        /// The meal break that started.
        break_session: BreakSession,
    },
    /// The worker stepped out for a while.
    Temporary {
        /// The closed session.
        work_session: WorkSession,
        /// Breaks that were running and got cut short.
        interrupted_breaks: Vec<BreakSession>,
    },
    /// The worker is done for the day.
    Final {
        /// The closed session.
        work_session: WorkSession,
        /// Breaks that were running and got settled.
        closed_breaks: Vec<BreakSession>,
        /// Elapsed hours, rounded to 2 decimals.
        hours_worked: Decimal,
        /// Elapsed hours minus unpaid meal time, rounded to 2 decimals.
        net_hours_worked: Decimal,
    },
}

impl Checkout {
    /// The session the check-out acted on.
    pub fn work_session(&self) -> &WorkSession {
        match self {
            Checkout::Meal { work_session, .. }
            | Checkout::Temporary { work_session, .. }
            | Checkout::Final { work_session, .. } => work_session,
        }
    }
}

/// What a "return from break" did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "resumedFrom", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Resumption {
    /// The meal break ended.
    Meal {
        /// The ended meal break.
        ended: EndedBreak,
    },
    /// A new session started after a temporary exit.
    TemporaryExit {
        /// The new session.
        work_session: WorkSession,
    },
}

/// The attendance state machine for one store and policy.
///
/// Each operation checks its preconditions, then performs a single store
/// write. A rejected operation changes nothing.
pub struct AttendanceTracker<'a, S: ?Sized> {
    pub(super) store: &'a S,
    pub(super) policy: &'a AttendancePolicy,
}

impl<'a, S: AttendanceStore + ?Sized> AttendanceTracker<'a, S> {
    /// Creates a tracker over `store` using `policy`.
    pub fn new(store: &'a S, policy: &'a AttendancePolicy) -> Self {
        Self { store, policy }
    }

    /// Opens a new work session.
    ///
    /// The first session of the day is judged against the policy's start
    /// time; re-entries after a temporary exit are always on time.
    pub fn check_in(&self, user_id: &str, now: NaiveDateTime) -> PosResult<WorkSession> {
        if self.store.open_session(user_id)?.is_some() {
            warn!(user_id, "Check-in rejected: session already open");
            return Err(PosError::AlreadyClockedIn {
                user_id: user_id.to_string(),
            });
        }

        let day = now.date();
        let session_number = self.store.sessions_for_day(user_id, day)?.len() as u32 + 1;
        let (is_on_time, minutes_late) = if session_number == 1 {
            lateness(day.and_time(self.policy.work_start), now)
        } else {
            (true, 0)
        };

        let session = self.store.insert_session(WorkSession {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            day_date: day,
            session_number,
            start_time: now,
            is_on_time,
            minutes_late,
            week_number: now.iso_week().week(),
            year_number: now.year(),
            state: SessionState::Open,
        })?;

        info!(
            user_id,
            session_id = %session.id,
            session_number,
            minutes_late,
            "Checked in"
        );
        Ok(session)
    }

    /// Starts a meal or short break on the open session.
    pub fn start_break(
        &self,
        user_id: &str,
        break_type: BreakType,
        now: NaiveDateTime,
    ) -> PosResult<BreakSession> {
        let session = self.require_open_session(user_id)?;

        if self.open_break(&session)?.is_some() {
            warn!(user_id, "Break rejected: another break is running");
            return Err(PosError::BreakAlreadyActive {
                user_id: user_id.to_string(),
            });
        }
        if break_type == BreakType::Meal {
            self.ensure_meal_available(user_id, &session)?;
        }

        let brk = self.store.insert_break(BreakSession {
            id: Uuid::new_v4(),
            work_session_id: session.id,
            user_id: user_id.to_string(),
            day_date: session.day_date,
            break_type,
            start_time: now,
            max_allowed: self.allowance(break_type),
            is_paid: break_type.is_paid(),
            state: BreakState::Open,
        })?;

        info!(user_id, break_id = %brk.id, ?break_type, "Break started");
        Ok(brk)
    }

    /// Ends the running break and settles it against its allowance.
    pub fn end_break(&self, user_id: &str, now: NaiveDateTime) -> PosResult<EndedBreak> {
        let no_break = || PosError::NoActiveBreak {
            user_id: user_id.to_string(),
        };
        let session = self.store.open_session(user_id)?.ok_or_else(no_break)?;
        let brk = self.open_break(&session)?.ok_or_else(no_break)?;

        let closed = complete_break(brk, now);
        self.store.update_break(&closed)?;

        let overtime_notice = overtime_notice(&closed);
        if overtime_notice.is_some() {
            warn!(
                user_id,
                break_id = %closed.id,
                overtime_minutes = closed.overtime_minutes(),
                "Break ran over allowance"
            );
        } else {
            info!(user_id, break_id = %closed.id, "Break ended");
        }

        Ok(EndedBreak {
            break_session: closed,
            overtime_notice,
        })
    }

    /// Leaves the open session.
    ///
    /// - `Meal` starts the day's meal break and leaves the session open.
    /// - `Temporary` cuts any running break short and closes the session;
    ///   the worker checks in again later, getting the next session number.
    /// - `Final` settles any running break and records the hour totals.
    pub fn check_out(
        &self,
        user_id: &str,
        exit_type: ExitType,
        now: NaiveDateTime,
    ) -> PosResult<Checkout> {
        let mut session = self.require_open_session(user_id)?;

        match exit_type {
            ExitType::Meal => {
                self.ensure_meal_available(user_id, &session)?;
                let break_session = self.start_break(user_id, BreakType::Meal, now)?;
                Ok(Checkout::Meal {
                    work_session: session,
                    break_session,
                })
            }
            ExitType::Temporary => {
                let interrupted_breaks: Vec<BreakSession> = self
                    .store
                    .breaks_for_session(session.id)?
                    .into_iter()
                    .filter(BreakSession::is_open)
                    .map(|mut brk| {
                        brk.state = BreakState::Interrupted { end_time: now };
                        brk
                    })
                    .collect();

                session.state = SessionState::ClosedTemporary { end_time: now };
                self.store.commit_session(&session, &interrupted_breaks)?;

                info!(
                    user_id,
                    session_id = %session.id,
                    interrupted = interrupted_breaks.len(),
                    "Temporary exit"
                );
                Ok(Checkout::Temporary {
                    work_session: session,
                    interrupted_breaks,
                })
            }
            ExitType::Final => {
                let breaks = self.store.breaks_for_session(session.id)?;
                let mut closed_breaks = Vec::new();
                let mut meal_minutes = 0;
                for brk in breaks {
                    let brk = if brk.is_open() {
                        let closed = complete_break(brk, now);
                        closed_breaks.push(closed.clone());
                        closed
                    } else {
                        brk
                    };
                    if brk.is_meal() {
                        meal_minutes += brk.duration().unwrap_or(0);
                    }
                }

                let (hours_worked, net_hours_worked) =
                    session_hours(session.start_time, now, meal_minutes);
                session.state = SessionState::ClosedFinal {
                    end_time: now,
                    hours_worked,
                    net_hours_worked,
                };
                self.store.commit_session(&session, &closed_breaks)?;

                info!(
                    user_id,
                    session_id = %session.id,
                    %hours_worked,
                    %net_hours_worked,
                    "Checked out"
                );
                Ok(Checkout::Final {
                    work_session: session,
                    closed_breaks,
                    hours_worked,
                    net_hours_worked,
                })
            }
        }
    }

    /// Comes back from the meal break or from a temporary exit, whichever
    /// the worker's latest session today is waiting on.
    pub fn resume(&self, user_id: &str, now: NaiveDateTime) -> PosResult<Resumption> {
        let latest = self
            .store
            .sessions_for_day(user_id, now.date())?
            .into_iter()
            .max_by_key(|s| s.session_number);

        let Some(latest) = latest else {
            return Err(PosError::NothingToResumeFrom {
                user_id: user_id.to_string(),
            });
        };

        if latest.is_open() {
            if let Some(brk) = self.open_break(&latest)?.filter(BreakSession::is_meal) {
                let closed = complete_break(brk, now);
                self.store.update_break(&closed)?;
                info!(user_id, break_id = %closed.id, "Returned from meal");
                return Ok(Resumption::Meal {
                    ended: EndedBreak {
                        overtime_notice: overtime_notice(&closed),
                        break_session: closed,
                    },
                });
            }
        } else if latest.exit_type() == Some(ExitType::Temporary) {
            let work_session = self.check_in(user_id, now)?;
            return Ok(Resumption::TemporaryExit { work_session });
        }

        Err(PosError::NothingToResumeFrom {
            user_id: user_id.to_string(),
        })
    }

    fn require_open_session(&self, user_id: &str) -> PosResult<WorkSession> {
        self.store
            .open_session(user_id)?
            .ok_or_else(|| PosError::NotClockedIn {
                user_id: user_id.to_string(),
            })
    }

    pub(super) fn open_break(&self, session: &WorkSession) -> PosResult<Option<BreakSession>> {
        Ok(self
            .store
            .breaks_for_session(session.id)?
            .into_iter()
            .find(BreakSession::is_open))
    }

    /// The meal rule spans every session of the day, unlike the running
    /// break rule which only looks at the current session.
    fn ensure_meal_available(&self, user_id: &str, session: &WorkSession) -> PosResult<()> {
        let taken = self
            .store
            .breaks_for_day(user_id, session.day_date)?
            .iter()
            .any(BreakSession::is_meal);
        if taken {
            warn!(user_id, "Meal break rejected: already taken today");
            return Err(PosError::MealAlreadyTaken {
                user_id: user_id.to_string(),
            });
        }
        Ok(())
    }

    fn allowance(&self, break_type: BreakType) -> i64 {
        match break_type {
            BreakType::Meal => self.policy.meal_break_minutes,
            BreakType::Break => self.policy.short_break_minutes,
        }
    }
}

fn complete_break(mut brk: BreakSession, now: NaiveDateTime) -> BreakSession {
    let duration = round_minutes(now - brk.start_time);
    let (is_overtime, overtime_minutes) = settle_break(duration, brk.max_allowed);
    brk.state = BreakState::Completed {
        end_time: now,
        duration,
        is_overtime,
        overtime_minutes,
    };
    brk
}

fn overtime_notice(brk: &BreakSession) -> Option<String> {
    match brk.state {
        BreakState::Completed {
            is_overtime: true,
            overtime_minutes,
            ..
        } => {
            let label = match brk.break_type {
                BreakType::Meal => "Meal break",
                BreakType::Break => "Break",
            };
            Some(format!(
                "{} exceeded the {}-minute allowance by {} minutes",
                label, brk.max_allowed, overtime_minutes
            ))
        }
        _ => None,
    }
}
