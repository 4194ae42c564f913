//! Error types for the bakery back office.
//!
//! Every rejected action is reported through [`PosError`]. State-conflict
//! variants are always raised before any write, so a rejected action never
//! leaves partial state behind.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the bakery back office.
///
/// # Example
///
/// ```
/// use bakery_pos::error::PosError;
///
/// let error = PosError::ConfigNotFound {
///     path: "/missing/staff.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/staff.yaml");
/// ```
#[derive(Debug, Error)]
pub enum PosError {
    /// The worker already has an open work session.
    #[error("User '{user_id}' is already clocked in")]
    AlreadyClockedIn {
        /// The worker's id.
        user_id: String,
    },

    /// The worker has no open work session.
    #[error("User '{user_id}' is not clocked in")]
    NotClockedIn {
        /// The worker's id.
        user_id: String,
    },

    /// A break is already running on the current work session.
    #[error("User '{user_id}' already has an active break")]
    BreakAlreadyActive {
        /// The worker's id.
        user_id: String,
    },

    /// There is no running break to end.
    #[error("User '{user_id}' has no active break")]
    NoActiveBreak {
        /// The worker's id.
        user_id: String,
    },

    /// The worker already took the meal break for the day.
    #[error("User '{user_id}' already took a meal break today")]
    MealAlreadyTaken {
        /// The worker's id.
        user_id: String,
    },

    /// Neither a meal break nor a temporary exit is pending.
    #[error("User '{user_id}' has nothing to resume from")]
    NothingToResumeFrom {
        /// The worker's id.
        user_id: String,
    },

    /// A cash register is already open.
    #[error("A cash register is already open")]
    RegisterAlreadyOpen,

    /// No cash register is open.
    #[error("No cash register is open")]
    NoOpenRegister,

    /// A sale line asks for more units than are in stock.
    #[error("Insufficient stock for product '{product}': requested {requested}, available {available}")]
    InsufficientStock {
        /// The product name.
        product: String,
        /// Units requested.
        requested: u32,
        /// Units in stock.
        available: u32,
    },

    /// A request field was missing or invalid.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "Product").
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// Missing or unknown session token.
    #[error("Authentication required")]
    Unauthenticated,

    /// The caller's role may not perform the action.
    #[error("Role '{role}' is not allowed to {action}")]
    Forbidden {
        /// The caller's role.
        role: String,
        /// The action that was attempted.
        action: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The persistent store failed.
    #[error("Store error: {message}")]
    Store {
        /// A description of the store failure.
        message: String,
    },
}

impl PosError {
    /// Builds a [`PosError::Validation`] for `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PosError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Rejects a non-positive amount, or one above [`MAX_AMOUNT`].
    pub fn require_positive(field: &str, amount: Decimal) -> PosResult<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(Self::validation(field, "must be greater than zero"));
        }
        Self::require_at_most_max(field, amount)
    }

    /// Rejects a negative amount, or one above [`MAX_AMOUNT`].
    pub fn require_non_negative(field: &str, amount: Decimal) -> PosResult<Decimal> {
        if amount < Decimal::ZERO {
            return Err(Self::validation(field, "must not be negative"));
        }
        Self::require_at_most_max(field, amount)
    }

    fn require_at_most_max(field: &str, amount: Decimal) -> PosResult<Decimal> {
        if amount > Decimal::from(MAX_AMOUNT) {
            return Err(Self::validation(
                field,
                format!("must not exceed {}", MAX_AMOUNT),
            ));
        }
        Ok(amount)
    }

    /// Unwraps a checked money operation, reporting overflow against `field`.
    pub fn in_range(field: &str, amount: Option<Decimal>) -> PosResult<Decimal> {
        amount.ok_or_else(|| Self::validation(field, "is outside the supported amount range"))
    }
}

/// Largest single amount (price, payment, float or expense) accepted as input.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// A type alias for Results that return PosError.
pub type PosResult<T> = Result<T, PosError>;
