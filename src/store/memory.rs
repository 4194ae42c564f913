//! In-memory store.
//!
//! All tables live behind one [`RwLock`], so each trait method runs as a
//! single transaction.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::error::{PosError, PosResult};
use crate::models::{
    BreakSession, CashRegister, Expense, OrderPayment, PaymentSource, Product, Sale,
    WorkSession,
};

use super::{AttendanceStore, CashStore, CatalogStore};

#[derive(Debug, Default)]
struct Tables {
    work_sessions: Vec<WorkSession>,
    breaks: Vec<BreakSession>,
    registers: Vec<CashRegister>,
    sales: Vec<Sale>,
    cake_bar_payments: Vec<OrderPayment>,
    custom_order_payments: Vec<OrderPayment>,
    expenses: Vec<Expense>,
    products: HashMap<Uuid, Product>,
}

impl Tables {
    fn order_payments(&self, source: PaymentSource) -> &[OrderPayment] {
        match source {
            PaymentSource::CakeBar => &self.cake_bar_payments,
            PaymentSource::CustomOrder => &self.custom_order_payments,
            PaymentSource::Sale => &[],
        }
    }
}

/// A store that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> PosResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|e| PosError::Store {
            message: format!("lock poisoned: {e}"),
        })
    }

    fn write(&self) -> PosResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|e| PosError::Store {
            message: format!("lock poisoned: {e}"),
        })
    }
}

fn within(at: NaiveDateTime, from: NaiveDateTime, to: NaiveDateTime) -> bool {
    from <= at && at < to
}

impl AttendanceStore for MemoryStore {
    fn open_session(&self, user_id: &str) -> PosResult<Option<WorkSession>> {
        Ok(self
            .read()?
            .work_sessions
            .iter()
            .find(|s| s.user_id == user_id && s.is_open())
            .cloned())
    }

    fn sessions_for_day(&self, user_id: &str, day: NaiveDate) -> PosResult<Vec<WorkSession>> {
        let mut sessions: Vec<WorkSession> = self
            .read()?
            .work_sessions
            .iter()
            .filter(|s| s.user_id == user_id && s.day_date == day)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.session_number);
        Ok(sessions)
    }

    fn sessions_for_week(
        &self,
        user_id: &str,
        iso_year: i32,
        week: u32,
    ) -> PosResult<Vec<WorkSession>> {
        Ok(self
            .read()?
            .work_sessions
            .iter()
            .filter(|s| {
                let iso = s.day_date.iso_week();
                s.user_id == user_id && iso.year() == iso_year && iso.week() == week
            })
            .cloned()
            .collect())
    }

    fn all_sessions_for_day(&self, day: NaiveDate) -> PosResult<Vec<WorkSession>> {
        let mut sessions: Vec<WorkSession> = self
            .read()?
            .work_sessions
            .iter()
            .filter(|s| s.day_date == day)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.start_time);
        Ok(sessions)
    }

    fn insert_session(&self, session: WorkSession) -> PosResult<WorkSession> {
        let mut tables = self.write()?;
        if session.is_open()
            && tables
                .work_sessions
                .iter()
                .any(|s| s.user_id == session.user_id && s.is_open())
        {
            return Err(PosError::AlreadyClockedIn {
                user_id: session.user_id,
            });
        }
        tables.work_sessions.push(session.clone());
        Ok(session)
    }

    fn insert_break(&self, brk: BreakSession) -> PosResult<BreakSession> {
        let mut tables = self.write()?;
        if tables
            .breaks
            .iter()
            .any(|b| b.work_session_id == brk.work_session_id && b.is_open())
        {
            return Err(PosError::BreakAlreadyActive {
                user_id: brk.user_id,
            });
        }
        if brk.is_meal()
            && tables
                .breaks
                .iter()
                .any(|b| b.user_id == brk.user_id && b.day_date == brk.day_date && b.is_meal())
        {
            return Err(PosError::MealAlreadyTaken {
                user_id: brk.user_id,
            });
        }
        tables.breaks.push(brk.clone());
        Ok(brk)
    }

    fn breaks_for_session(&self, work_session_id: Uuid) -> PosResult<Vec<BreakSession>> {
        Ok(self
            .read()?
            .breaks
            .iter()
            .filter(|b| b.work_session_id == work_session_id)
            .cloned()
            .collect())
    }

    fn breaks_for_day(&self, user_id: &str, day: NaiveDate) -> PosResult<Vec<BreakSession>> {
        Ok(self
            .read()?
            .breaks
            .iter()
            .filter(|b| b.user_id == user_id && b.day_date == day)
            .cloned()
            .collect())
    }

    fn update_break(&self, brk: &BreakSession) -> PosResult<()> {
        let mut tables = self.write()?;
        let slot = tables
            .breaks
            .iter_mut()
            .find(|b| b.id == brk.id && b.is_open())
            .ok_or_else(|| PosError::NoActiveBreak {
                user_id: brk.user_id.clone(),
            })?;
        *slot = brk.clone();
        Ok(())
    }

    fn commit_session(&self, session: &WorkSession, breaks: &[BreakSession]) -> PosResult<()> {
        let mut tables = self.write()?;

        let session_idx = tables
            .work_sessions
            .iter()
            .position(|s| s.id == session.id && s.is_open())
            .ok_or_else(|| PosError::NotClockedIn {
                user_id: session.user_id.clone(),
            })?;
        let mut break_idxs = Vec::with_capacity(breaks.len());
        for brk in breaks {
            let idx = tables
                .breaks
                .iter()
                .position(|b| b.id == brk.id)
                .ok_or_else(|| PosError::NotFound {
                    entity: "Break session",
                    id: brk.id.to_string(),
                })?;
            break_idxs.push(idx);
        }

        // Every row was found; apply all writes.
        tables.work_sessions[session_idx] = session.clone();
        for (idx, brk) in break_idxs.into_iter().zip(breaks) {
            tables.breaks[idx] = brk.clone();
        }
        Ok(())
    }
}

impl CashStore for MemoryStore {
    fn open_register(&self) -> PosResult<Option<CashRegister>> {
        Ok(self
            .read()?
            .registers
            .iter()
            .find(|r| r.is_open())
            .cloned())
    }

    fn insert_register(&self, register: CashRegister) -> PosResult<CashRegister> {
        let mut tables = self.write()?;
        if tables.registers.iter().any(|r| r.is_open()) {
            return Err(PosError::RegisterAlreadyOpen);
        }
        tables.registers.push(register.clone());
        Ok(register)
    }

    fn close_register(&self, register: &CashRegister) -> PosResult<()> {
        let mut tables = self.write()?;
        let slot = tables
            .registers
            .iter_mut()
            .find(|r| r.id == register.id && r.is_open())
            .ok_or(PosError::NoOpenRegister)?;
        *slot = register.clone();
        Ok(())
    }

    fn sales_between(
        &self,
        register_id: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> PosResult<Vec<Sale>> {
        Ok(self
            .read()?
            .sales
            .iter()
            .filter(|s| s.register_id == Some(register_id) && within(s.created_at, from, to))
            .cloned()
            .collect())
    }

    fn insert_order_payment(
        &self,
        source: PaymentSource,
        payment: OrderPayment,
    ) -> PosResult<OrderPayment> {
        let mut tables = self.write()?;
        match source {
            PaymentSource::CakeBar => tables.cake_bar_payments.push(payment.clone()),
            PaymentSource::CustomOrder => tables.custom_order_payments.push(payment.clone()),
            PaymentSource::Sale => {
                return Err(PosError::validation(
                    "source",
                    "counter sales are recorded through the catalog",
                ));
            }
        }
        Ok(payment)
    }

    fn order_payments_between(
        &self,
        source: PaymentSource,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> PosResult<Vec<OrderPayment>> {
        Ok(self
            .read()?
            .order_payments(source)
            .iter()
            .filter(|p| within(p.paid_at, from, to))
            .cloned()
            .collect())
    }

    fn insert_expense(&self, expense: Expense) -> PosResult<Expense> {
        self.write()?.expenses.push(expense.clone());
        Ok(expense)
    }

    fn expenses_between(&self, from: NaiveDateTime, to: NaiveDateTime) -> PosResult<Vec<Expense>> {
        Ok(self
            .read()?
            .expenses
            .iter()
            .filter(|e| within(e.created_at, from, to))
            .cloned()
            .collect())
    }
}

impl CatalogStore for MemoryStore {
    fn list_products(&self) -> PosResult<Vec<Product>> {
        let mut products: Vec<Product> = self.read()?.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    fn get_product(&self, id: Uuid) -> PosResult<Product> {
        self.read()?
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| PosError::NotFound {
                entity: "Product",
                id: id.to_string(),
            })
    }

    fn insert_product(&self, product: Product) -> PosResult<Product> {
        self.write()?.products.insert(product.id, product.clone());
        Ok(product)
    }

    fn update_product(&self, product: Product) -> PosResult<Product> {
        let mut tables = self.write()?;
        let slot = tables
            .products
            .get_mut(&product.id)
            .ok_or_else(|| PosError::NotFound {
                entity: "Product",
                id: product.id.to_string(),
            })?;
        *slot = product.clone();
        Ok(product)
    }

    fn delete_product(&self, id: Uuid) -> PosResult<()> {
        self.write()?
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PosError::NotFound {
                entity: "Product",
                id: id.to_string(),
            })
    }

    fn record_sale(&self, sale: Sale) -> PosResult<Sale> {
        let mut tables = self.write()?;

        // Check every line against the stock left after earlier lines.
        let mut remaining: HashMap<Uuid, u32> = HashMap::new();
        for item in &sale.items {
            let product = tables
                .products
                .get(&item.product_id)
                .ok_or_else(|| PosError::NotFound {
                    entity: "Product",
                    id: item.product_id.to_string(),
                })?;
            let available = *remaining.entry(product.id).or_insert(product.stock);
            if item.quantity > available {
                return Err(PosError::InsufficientStock {
                    product: product.name.clone(),
                    requested: item.quantity,
                    available,
                });
            }
            remaining.insert(product.id, available - item.quantity);
        }

        for (id, stock) in remaining {
            if let Some(product) = tables.products.get_mut(&id) {
                product.stock = stock;
            }
        }
        tables.sales.push(sale.clone());
        Ok(sale)
    }
}
