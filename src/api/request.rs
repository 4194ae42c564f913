//! Request types for the bakery back-office API.
//!
//! Action-style endpoints take a body tagged by `action`; each variant
//! carries only the fields that action needs, so a missing `exitType` or an
//! unknown action is rejected before any store access.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::SaleLine;
use crate::models::{BreakType, ExitType};

/// Body of `POST /employee/clock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClockRequest {
    /// Start a work session.
    Checkin,
    /// Leave for a meal, temporarily, or for the day.
    Checkout {
        /// Kind of exit.
        exit_type: ExitType,
    },
    /// Come back from a meal break or a temporary exit.
    ReturnFromBreak,
}

/// Body of `POST /employee/break`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum BreakRequest {
    /// Start a break on the open session.
    Start {
        /// Meal or short break; short when omitted.
        #[serde(default)]
        break_type: BreakType,
    },
    /// End the running break.
    End,
}

/// Action of `POST /admin/work-sessions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminClockAction {
    /// Check the employee in.
    Checkin,
    /// Check the employee out for the day.
    Checkout,
}

/// Body of `POST /admin/work-sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminClockRequest {
    /// What to do.
    pub action: AdminClockAction,
    /// Whom to do it for.
    pub employee_id: String,
}

/// Body of `POST /admin/cash-closure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CashClosureRequest {
    /// Open the register with a float.
    Open {
        /// Float placed in the drawer.
        opening_cash: Decimal,
        /// Optional notes.
        #[serde(default)]
        notes: Option<String>,
    },
    /// Count the drawer and close the register.
    Close {
        /// Cash counted.
        actual_cash: Decimal,
        /// Optional notes, appended to the opening notes.
        #[serde(default)]
        notes: Option<String>,
    },
}

/// Body of `POST /sales`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    /// Lines to sell.
    pub items: Vec<SaleLine>,
    /// Payment type as sent by the till: a code or a legacy object.
    #[serde(default)]
    pub payment_type: Value,
}

/// Body of `POST /cake-bar/payments` and `POST /custom-orders/payments`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPaymentRequest {
    /// The order being paid.
    pub order_reference: String,
    /// Amount received.
    pub amount: Decimal,
    /// Payment type as sent by the till: a code or a legacy object.
    #[serde(default)]
    pub payment_type: Value,
}

/// Body of `POST /admin/expenses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    /// Amount paid out.
    pub amount: Decimal,
    /// What it was for.
    pub description: String,
}
