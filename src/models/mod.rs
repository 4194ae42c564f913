//! Core data models for the bakery back office.
//!
//! This module contains all the domain records shared by the attendance
//! tracker, the cash register and the HTTP layer.

mod break_session;
mod cash_register;
mod payment;
mod product;
mod staff;
mod work_session;

pub use break_session::{BreakSession, BreakState, BreakType};
pub use cash_register::{CashRegister, RegisterState};
pub use payment::{Expense, OrderPayment, PaymentSource, PaymentType, Sale, SaleItem};
pub use product::Product;
pub use staff::{Role, StaffMember};
pub use work_session::{ExitType, SessionState, WorkSession};
