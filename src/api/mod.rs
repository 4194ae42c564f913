//! HTTP API module for the bakery back office.
//!
//! This module provides the REST endpoints for attendance, the cash
//! register, products and the payment streams.

mod auth;
mod handlers;
mod request;
mod response;
mod state;

pub use auth::{CurrentUser, SESSION_COOKIE, require_manager};
pub use handlers::create_router;
pub use request::{
    AdminClockAction, AdminClockRequest, BreakRequest, CashClosureRequest, ClockRequest,
    ExpenseRequest, OrderPaymentRequest, SaleRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
