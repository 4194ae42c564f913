//! Configuration types for the bakery back office.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Role, StaffMember};

/// Public business profile, printed on receipts and served to the
/// storefront without authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SystemProfile {
    /// Trading name.
    pub business_name: String,
    /// Street address.
    pub address: String,
    /// Contact phone.
    pub phone: String,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Sales tax rate as a fraction (e.g. 0.19).
    pub tax_rate: Decimal,
    /// Line printed at the bottom of receipts.
    #[serde(default)]
    pub receipt_footer: Option<String>,
}

/// Attendance rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttendancePolicy {
    /// Expected start of the working day; later first check-ins are late.
    #[serde(default = "default_work_start")]
    pub work_start: NaiveTime,
    /// Allowance for the meal break.
    #[serde(default = "default_meal_break_minutes")]
    pub meal_break_minutes: i64,
    /// Allowance for a short break.
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: i64,
    /// Running meal breaks longer than this raise a warning.
    #[serde(default = "default_meal_warning_minutes")]
    pub meal_warning_minutes: i64,
}

fn default_work_start() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_meal_break_minutes() -> i64 {
    60
}

fn default_short_break_minutes() -> i64 {
    15
}

fn default_meal_warning_minutes() -> i64 {
    50
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            work_start: default_work_start(),
            meal_break_minutes: default_meal_break_minutes(),
            short_break_minutes: default_short_break_minutes(),
            meal_warning_minutes: default_meal_warning_minutes(),
        }
    }
}

/// Cash register rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CashPolicy {
    /// How many transactions the register snapshot lists.
    #[serde(default = "default_recent_transactions_limit")]
    pub recent_transactions_limit: usize,
}

fn default_recent_transactions_limit() -> usize {
    10
}

impl Default for CashPolicy {
    fn default() -> Self {
        Self {
            recent_transactions_limit: default_recent_transactions_limit(),
        }
    }
}

/// A staff directory entry.
#[derive(Debug, Clone, Deserialize)]
pub struct StaffEntry {
    /// Unique identifier for the staff member.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Access level.
    pub role: Role,
    /// Token carried in the `session` cookie.
    pub session_token: String,
    /// Disabled accounts cannot sign in.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl StaffEntry {
    /// The public part of the entry.
    pub fn member(&self) -> StaffMember {
        StaffMember {
            id: self.id.clone(),
            name: self.name.clone(),
            role: self.role,
            active: self.active,
        }
    }
}

/// Staff configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct StaffConfig {
    /// All staff members.
    pub staff: Vec<StaffEntry>,
}

/// Complete configuration.
#[derive(Debug, Clone)]
pub struct BakeryConfig {
    /// Public business profile.
    pub system: SystemProfile,
    /// Attendance rules.
    pub attendance: AttendancePolicy,
    /// Cash register rules.
    pub cash: CashPolicy,
    /// Staff directory.
    pub staff: Vec<StaffEntry>,
}
