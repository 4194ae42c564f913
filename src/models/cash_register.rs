//! Cash register (drawer shift) model.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a register. Two states, two transitions:
/// nothing → `Open` on open, `Open` → `Closed` on close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RegisterState {
    /// Taking payments.
    Open,
    /// Counted and closed; totals are frozen.
    Closed {
        /// When the drawer was counted.
        closed_at: NaiveDateTime,
        /// Cash counted by the operator.
        closing_cash: Decimal,
        /// All sales streams for the day.
        total_sales: Decimal,
        /// All expenses for the day.
        total_expenses: Decimal,
        /// `opening + cash sales - expenses` at close time.
        expected_cash: Decimal,
        /// `closing_cash - expected_cash`.
        difference: Decimal,
        /// Staff member who closed the drawer.
        closed_by: String,
    },
}

/// One cash-drawer shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashRegister {
    /// Unique identifier for the register shift.
    pub id: Uuid,
    /// Business day of the shift.
    pub date: NaiveDate,
    /// When the drawer was opened.
    pub opened_at: NaiveDateTime,
    /// Float placed in the drawer.
    pub opening_cash: Decimal,
    /// Staff member who opened the drawer.
    pub opened_by: String,
    /// Free-form notes from open and close.
    pub notes: Option<String>,
    /// Lifecycle state.
    #[serde(flatten)]
    pub state: RegisterState,
}

impl CashRegister {
    /// Returns true while the drawer is taking payments.
    pub fn is_open(&self) -> bool {
        matches!(self.state, RegisterState::Open)
    }

    /// Start of the register's business day.
    pub fn window_start(&self) -> NaiveDateTime {
        self.date.and_time(chrono::NaiveTime::MIN)
    }

    /// Start of the following day (exclusive bound).
    pub fn window_end(&self) -> NaiveDateTime {
        self.window_start() + chrono::TimeDelta::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_register() -> CashRegister {
        CashRegister {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 1, 13).unwrap(),
            opened_at: NaiveDateTime::parse_from_str("2026-01-13 07:30:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            opening_cash: Decimal::new(100_000, 0),
            opened_by: "mgr_001".to_string(),
            notes: None,
            state: RegisterState::Open,
        }
    }

    #[test]
    fn test_day_window() {
        let register = make_register();
        assert_eq!(register.window_start().to_string(), "2026-01-13 00:00:00");
        assert_eq!(register.window_end().to_string(), "2026-01-14 00:00:00");
    }

    #[test]
    fn test_open_register_serialization() {
        let register = make_register();
        let json = serde_json::to_value(&register).unwrap();
        assert_eq!(json["status"], "open");
        assert_eq!(json["openingCash"], "100000");
        assert!(json.get("closingCash").is_none());
        assert!(register.is_open());
    }
}
