//! Persistence boundary.
//!
//! The attendance tracker and the cash register only talk to storage through
//! these traits. Every method is atomic: the uniqueness rules (one open work
//! session per worker, one open break per session, one meal per worker and
//! day, one open register) are enforced inside the write itself rather than
//! by a separate read beforehand, so two racing requests cannot both win.

mod memory;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::error::PosResult;
use crate::models::{
    BreakSession, CashRegister, Expense, OrderPayment, PaymentSource, Product, Sale,
    WorkSession,
};

pub use memory::MemoryStore;

/// Storage for work sessions and breaks.
pub trait AttendanceStore: Send + Sync {
    /// The worker's open session, if any.
    fn open_session(&self, user_id: &str) -> PosResult<Option<WorkSession>>;

    /// The worker's sessions for `day`, ordered by session number.
    fn sessions_for_day(&self, user_id: &str, day: NaiveDate) -> PosResult<Vec<WorkSession>>;

    /// The worker's sessions in an ISO week. `iso_year` is the ISO
    /// week-numbering year, which differs from the calendar year around
    /// New Year.
    fn sessions_for_week(
        &self,
        user_id: &str,
        iso_year: i32,
        week: u32,
    ) -> PosResult<Vec<WorkSession>>;

    /// Every worker's sessions for `day`.
    fn all_sessions_for_day(&self, day: NaiveDate) -> PosResult<Vec<WorkSession>>;

    /// Inserts a session. Fails with `AlreadyClockedIn` if the worker already
    /// has an open one.
    fn insert_session(&self, session: WorkSession) -> PosResult<WorkSession>;

    /// Inserts a break. Fails with `BreakAlreadyActive` if the work session
    /// already has an open break, and with `MealAlreadyTaken` for a second
    /// meal break on the same worker and day.
    fn insert_break(&self, brk: BreakSession) -> PosResult<BreakSession>;

    /// Breaks taken during one work session, oldest first.
    fn breaks_for_session(&self, work_session_id: Uuid) -> PosResult<Vec<BreakSession>>;

    /// Breaks taken by the worker on `day`, across all sessions.
    fn breaks_for_day(&self, user_id: &str, day: NaiveDate) -> PosResult<Vec<BreakSession>>;

    /// Writes a closed break. Fails with `NoActiveBreak` unless the stored
    /// copy is still open.
    fn update_break(&self, brk: &BreakSession) -> PosResult<()>;

    /// Writes a closed session together with the breaks closed alongside
    /// it. Fails with `NotClockedIn` unless the stored session is still
    /// open; no row changes on failure.
    fn commit_session(&self, session: &WorkSession, breaks: &[BreakSession]) -> PosResult<()>;
}

/// Storage for the register and the payment streams it reconciles.
pub trait CashStore: Send + Sync {
    /// The open register, if any.
    fn open_register(&self) -> PosResult<Option<CashRegister>>;

    /// Inserts a register. Fails with `RegisterAlreadyOpen` if one is open.
    fn insert_register(&self, register: CashRegister) -> PosResult<CashRegister>;

    /// Writes the closed register. Fails with `NoOpenRegister` unless the
    /// stored copy is still open.
    fn close_register(&self, register: &CashRegister) -> PosResult<()>;

    /// Sales rung up against `register_id` within `[from, to)`.
    fn sales_between(
        &self,
        register_id: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> PosResult<Vec<Sale>>;

    /// Records an order payment in the stream named by `source`.
    fn insert_order_payment(
        &self,
        source: PaymentSource,
        payment: OrderPayment,
    ) -> PosResult<OrderPayment>;

    /// Order payments of one stream within `[from, to)`.
    fn order_payments_between(
        &self,
        source: PaymentSource,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> PosResult<Vec<OrderPayment>>;

    /// Records an expense.
    fn insert_expense(&self, expense: Expense) -> PosResult<Expense>;

    /// Expenses within `[from, to)`.
    fn expenses_between(&self, from: NaiveDateTime, to: NaiveDateTime) -> PosResult<Vec<Expense>>;
}

/// Storage for products and counter sales.
pub trait CatalogStore: Send + Sync {
    /// All products, by name.
    fn list_products(&self) -> PosResult<Vec<Product>>;

    /// One product.
    fn get_product(&self, id: Uuid) -> PosResult<Product>;

    /// Inserts a product.
    fn insert_product(&self, product: Product) -> PosResult<Product>;

    /// Replaces a product. Fails with `NotFound` if it does not exist.
    fn update_product(&self, product: Product) -> PosResult<Product>;

    /// Removes a product. Fails with `NotFound` if it does not exist.
    fn delete_product(&self, id: Uuid) -> PosResult<()>;

    /// Decrements stock for every line and inserts the sale, or changes
    /// nothing (`InsufficientStock`, `NotFound`).
    fn record_sale(&self, sale: Sale) -> PosResult<Sale>;
}

/// Everything the HTTP layer needs.
pub trait Store: AttendanceStore + CashStore + CatalogStore {}

impl<T: AttendanceStore + CashStore + CatalogStore> Store for T {}
