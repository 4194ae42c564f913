//! Time arithmetic for attendance: lateness, break settlement, hour totals.
//!
//! Minutes are rounded half away from zero; hours are rounded to two
//! decimals the same way.

use chrono::{NaiveDateTime, TimeDelta};
use rust_decimal::{Decimal, RoundingStrategy};

const SECONDS_PER_HOUR: i64 = 3600;

/// Rounds a time span to whole minutes.
///
/// ```
/// use bakery_pos::attendance::round_minutes;
/// use chrono::TimeDelta;
///
/// assert_eq!(round_minutes(TimeDelta::seconds(89)), 1);
/// assert_eq!(round_minutes(TimeDelta::seconds(90)), 2);
/// ```
pub fn round_minutes(delta: TimeDelta) -> i64 {
    let secs = delta.num_seconds();
    if secs >= 0 {
        (secs + 30) / 60
    } else {
        -((-secs + 30) / 60)
    }
}

/// Judges a check-in against the expected start of the day.
///
/// Returns `(is_on_time, minutes_late)`.
pub fn lateness(expected_start: NaiveDateTime, check_in: NaiveDateTime) -> (bool, i64) {
    if check_in > expected_start {
        (false, round_minutes(check_in - expected_start))
    } else {
        (true, 0)
    }
}

/// Settles a break of `duration` minutes against its allowance.
///
/// Returns `(is_overtime, overtime_minutes)`.
pub fn settle_break(duration: i64, max_allowed: i64) -> (bool, i64) {
    (duration > max_allowed, (duration - max_allowed).max(0))
}

/// Unrounded hours between two instants.
pub fn elapsed_hours(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    Decimal::from((end - start).num_seconds()) / Decimal::from(SECONDS_PER_HOUR)
}

/// Rounds an hour figure to two decimals, always carrying two places.
pub fn round_hours(hours: Decimal) -> Decimal {
    let mut rounded = hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Gross and net hours of a finished session.
///
/// Net hours subtract the unpaid meal minutes; both figures are rounded
/// after the subtraction so the rounding error does not compound.
pub fn session_hours(
    start: NaiveDateTime,
    end: NaiveDateTime,
    unpaid_minutes: i64,
) -> (Decimal, Decimal) {
    let gross = elapsed_hours(start, end);
    let net = gross - Decimal::from(unpaid_minutes) / Decimal::from(60);
    (round_hours(gross), round_hours(net))
}
