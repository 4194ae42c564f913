//! Cash reconciliation.
//!
//! The drawer takes money from three independent streams (counter sales,
//! cake-bar payments and custom-order payments) and pays out expenses. At
//! close the counted cash is compared against
//! `opening_cash + cash payments - expenses` for the register's day.

mod payment_type;
mod reconciliation;
mod register;

pub use payment_type::{encode_payment_type, normalize_payment_type, resolve_payment_type};
pub use reconciliation::{
    LedgerEntry, PaymentStreams, PaymentTypeTotal, Reconciliation, recent_transactions, reconcile,
};
pub use register::{CashDrawer, RegisterClosure, RegisterSnapshot};
