//! Register lifecycle: open, snapshot, close, and the payments it takes in.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::CashPolicy;
use crate::error::{PosError, PosResult};
use crate::models::{CashRegister, Expense, OrderPayment, PaymentSource, RegisterState};
use crate::store::CashStore;

use super::reconciliation::{LedgerEntry, PaymentStreams, Reconciliation, recent_transactions, reconcile};

/// What the cash-closure screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSnapshot {
    /// Whether a register is taking payments.
    pub has_open_register: bool,
    /// The open register.
    pub register: Option<CashRegister>,
    /// Live drawer figures for the open register.
    pub summary: Option<Reconciliation>,
    /// Counted minus expected; always `None` while the register is open.
    pub difference: Option<Decimal>,
    /// Newest payments across all streams.
    pub recent_transactions: Vec<LedgerEntry>,
}

impl RegisterSnapshot {
    fn empty() -> Self {
        Self {
            has_open_register: false,
            register: None,
            summary: None,
            difference: None,
            recent_transactions: Vec::new(),
        }
    }
}

/// Outcome of closing a register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClosure {
    /// The closed register.
    pub register: CashRegister,
    /// Figures frozen at close.
    pub summary: Reconciliation,
    /// `actual_cash - expected_cash`.
    pub difference: Decimal,
}

/// Runs the cash drawer against a store.
pub struct CashDrawer<'a, S: ?Sized> {
    store: &'a S,
    policy: &'a CashPolicy,
}

impl<'a, S: CashStore + ?Sized> CashDrawer<'a, S> {
    /// Creates a drawer over `store`.
    pub fn new(store: &'a S, policy: &'a CashPolicy) -> Self {
        Self { store, policy }
    }

    /// Opens a register with `opening_cash` in the drawer.
    pub fn open(
        &self,
        opening_cash: Decimal,
        notes: Option<String>,
        opened_by: &str,
        now: NaiveDateTime,
    ) -> PosResult<CashRegister> {
        let opening_cash = PosError::require_non_negative("openingCash", opening_cash)?;
        let register = self.store.insert_register(CashRegister {
            id: Uuid::new_v4(),
            date: now.date(),
            opened_at: now,
            opening_cash,
            opened_by: opened_by.to_string(),
            notes: clean_notes(notes),
            state: RegisterState::Open,
        })?;

        info!(
            register_id = %register.id,
            %opening_cash,
            opened_by,
            "Register opened"
        );
        Ok(register)
    }

    /// Live figures for the open register, if any.
    pub fn snapshot(&self, today: NaiveDate) -> PosResult<RegisterSnapshot> {
        let Some(register) = self.store.open_register()? else {
            return Ok(RegisterSnapshot::empty());
        };
        if register.date != today {
            warn!(
                register_id = %register.id,
                register_date = %register.date,
                %today,
                "Open register belongs to an earlier day"
            );
        }

        let (summary, ledger) = self.reconcile_register(&register)?;
        Ok(RegisterSnapshot {
            has_open_register: true,
            register: Some(register),
            summary: Some(summary),
            difference: None,
            recent_transactions: recent_transactions(
                &ledger,
                self.policy.recent_transactions_limit,
            ),
        })
    }

    /// Counts the drawer and closes the open register.
    pub fn close(
        &self,
        actual_cash: Decimal,
        notes: Option<String>,
        closed_by: &str,
        now: NaiveDateTime,
    ) -> PosResult<RegisterClosure> {
        let actual_cash = PosError::require_non_negative("actualCash", actual_cash)?;
        let mut register = self.store.open_register()?.ok_or(PosError::NoOpenRegister)?;

        let (summary, _) = self.reconcile_register(&register)?;
        let difference = PosError::in_range(
            "actualCash",
            actual_cash.checked_sub(summary.expected_cash),
        )?;

        register.notes = merge_notes(register.notes.take(), clean_notes(notes));
        register.state = RegisterState::Closed {
            closed_at: now,
            closing_cash: actual_cash,
            total_sales: summary.total_sales_all,
            total_expenses: summary.total_expenses,
            expected_cash: summary.expected_cash,
            difference,
            closed_by: closed_by.to_string(),
        };
        self.store.close_register(&register)?;

        if difference.is_zero() {
            info!(register_id = %register.id, %actual_cash, "Register closed, drawer balanced");
        } else {
            warn!(
                register_id = %register.id,
                %actual_cash,
                expected_cash = %summary.expected_cash,
                %difference,
                "Register closed with a difference"
            );
        }
        if summary.unrecognized_payment_types > 0 {
            warn!(
                register_id = %register.id,
                count = summary.unrecognized_payment_types,
                "Expected cash includes payments with unreadable types counted as CASH"
            );
        }

        Ok(RegisterClosure {
            register,
            summary,
            difference,
        })
    }

    /// Records a cake-bar or custom-order payment.
    pub fn take_order_payment(
        &self,
        source: PaymentSource,
        order_reference: &str,
        amount: Decimal,
        payment_type: Option<String>,
        received_by: &str,
        now: NaiveDateTime,
    ) -> PosResult<OrderPayment> {
        let amount = PosError::require_positive("amount", amount)?;
        let order_reference = order_reference.trim();
        if order_reference.is_empty() {
            return Err(PosError::validation("orderReference", "must not be empty"));
        }

        let payment = self.store.insert_order_payment(
            source,
            OrderPayment {
                id: Uuid::new_v4(),
                order_reference: order_reference.to_string(),
                amount,
                payment_type,
                received_by: received_by.to_string(),
                paid_at: now,
            },
        )?;
        info!(payment_id = %payment.id, ?source, %amount, "Order payment recorded");
        Ok(payment)
    }

    /// Records cash paid out of the drawer.
    pub fn record_expense(
        &self,
        amount: Decimal,
        description: &str,
        recorded_by: &str,
        now: NaiveDateTime,
    ) -> PosResult<Expense> {
        let amount = PosError::require_positive("amount", amount)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(PosError::validation("description", "must not be empty"));
        }

        let expense = self.store.insert_expense(Expense {
            id: Uuid::new_v4(),
            amount,
            description: description.to_string(),
            recorded_by: recorded_by.to_string(),
            created_at: now,
        })?;
        info!(expense_id = %expense.id, %amount, "Expense recorded");
        Ok(expense)
    }

    fn reconcile_register(
        &self,
        register: &CashRegister,
    ) -> PosResult<(Reconciliation, Vec<LedgerEntry>)> {
        let (from, to) = (register.window_start(), register.window_end());
        let streams = PaymentStreams {
            sales: self.store.sales_between(register.id, from, to)?,
            cake_bar: self
                .store
                .order_payments_between(PaymentSource::CakeBar, from, to)?,
            custom_orders: self
                .store
                .order_payments_between(PaymentSource::CustomOrder, from, to)?,
        };
        let expenses = self.store.expenses_between(from, to)?;
        let ledger = streams.ledger();
        let summary = reconcile(register.opening_cash, &ledger, &expenses)?;
        Ok((summary, ledger))
    }
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

fn merge_notes(opening: Option<String>, closing: Option<String>) -> Option<String> {
    match (opening, closing) {
        (Some(a), Some(b)) => Some(format!("{}\n{}", a, b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sale;
    use crate::store::{CatalogStore, MemoryStore};
    use std::str::FromStr;

    fn at(time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("2026-01-13 {}", time), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ring_up(store: &MemoryStore, register_id: Uuid, total: &str, kind: &str, time: &str) {
        store
            .record_sale(Sale {
                id: Uuid::new_v4(),
                register_id: Some(register_id),
                sold_by: "emp_001".to_string(),
                items: vec![],
                total: dec(total),
                payment_type: Some(kind.to_string()),
                created_at: at(time),
            })
            .unwrap();
    }

    /// Opening float 100000 and one payment per stream.
    fn seeded_day(store: &MemoryStore, drawer: &CashDrawer<'_, MemoryStore>) -> CashRegister {
        let register = drawer
            .open(dec("100000"), Some("Morning float".to_string()), "mgr_001", at("07:00:00"))
            .unwrap();
        ring_up(store, register.id, "20000", "CASH", "09:00:00");
        drawer
            .take_order_payment(
                PaymentSource::CakeBar,
                "CB-17",
                dec("15000"),
                Some("CARD".to_string()),
                "emp_001",
                at("10:00:00"),
            )
            .unwrap();
        drawer
            .take_order_payment(
                PaymentSource::CustomOrder,
                "CO-3",
                dec("30000"),
                Some("CASH".to_string()),
                "emp_001",
                at("11:00:00"),
            )
            .unwrap();
        drawer
            .record_expense(dec("5000"), "Milk", "mgr_001", at("12:00:00"))
            .unwrap();
        register
    }

    #[test]
    fn test_full_day_balances() {
        let store = MemoryStore::new();
        let policy = CashPolicy::default();
        let drawer = CashDrawer::new(&store, &policy);
        seeded_day(&store, &drawer);

        let snapshot = drawer.snapshot(at("00:00:00").date()).unwrap();
        assert!(snapshot.has_open_register);
        assert_eq!(snapshot.difference, None);
        let summary = snapshot.summary.unwrap();
        assert_eq!(summary.cash_sales, dec("50000"));
        assert_eq!(summary.total_sales_all, dec("65000"));
        assert_eq!(summary.expected_cash, dec("145000"));
        assert_eq!(snapshot.recent_transactions.len(), 3);
        assert_eq!(snapshot.recent_transactions[0].source, PaymentSource::CustomOrder);

        let closure = drawer
            .close(dec("145000"), Some("All good".to_string()), "mgr_001", at("20:00:00"))
            .unwrap();
        assert_eq!(closure.difference, Decimal::ZERO);
        assert_eq!(closure.summary.expected_cash, summary.expected_cash);
        assert_eq!(closure.register.notes.as_deref(), Some("Morning float\nAll good"));
        match closure.register.state {
            RegisterState::Closed {
                closing_cash,
                total_sales,
                total_expenses,
                ..
            } => {
                assert_eq!(closing_cash, dec("145000"));
                assert_eq!(total_sales, dec("65000"));
                assert_eq!(total_expenses, dec("5000"));
            }
            RegisterState::Open => panic!("register should be closed"),
        }

        let after = drawer.snapshot(at("21:00:00").date()).unwrap();
        assert!(!after.has_open_register);
    }

    #[test]
    fn test_short_drawer_reports_negative_difference() {
        let store = MemoryStore::new();
        let policy = CashPolicy::default();
        let drawer = CashDrawer::new(&store, &policy);
        seeded_day(&store, &drawer);

        let closure = drawer
            .close(dec("140000"), None, "mgr_001", at("20:00:00"))
            .unwrap();
        assert_eq!(closure.difference, dec("-5000"));
        assert_eq!(closure.register.notes.as_deref(), Some("Morning float"));
    }

    #[test]
    fn test_register_singleton() {
        let store = MemoryStore::new();
        let policy = CashPolicy::default();
        let drawer = CashDrawer::new(&store, &policy);

        let err = drawer
            .close(dec("0"), None, "mgr_001", at("07:00:00"))
            .unwrap_err();
        assert!(matches!(err, PosError::NoOpenRegister));

        drawer.open(dec("0"), None, "mgr_001", at("07:00:00")).unwrap();
        let err = drawer
            .open(dec("50000"), None, "mgr_001", at("07:05:00"))
            .unwrap_err();
        assert!(matches!(err, PosError::RegisterAlreadyOpen));
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let store = MemoryStore::new();
        let policy = CashPolicy::default();
        let drawer = CashDrawer::new(&store, &policy);

        let err = drawer
            .open(dec("-1"), None, "mgr_001", at("07:00:00"))
            .unwrap_err();
        assert!(matches!(err, PosError::Validation { ref field, .. } if field == "openingCash"));
        assert!(store.open_register().unwrap().is_none());

        let err = drawer
            .record_expense(dec("0"), "Nothing", "mgr_001", at("08:00:00"))
            .unwrap_err();
        assert!(matches!(err, PosError::Validation { .. }));
    }

    #[test]
    fn test_oversized_payment_cannot_break_the_snapshot() {
        let store = MemoryStore::new();
        let policy = CashPolicy::default();
        let drawer = CashDrawer::new(&store, &policy);
        drawer
            .open(dec("100000"), None, "mgr_001", at("07:00:00"))
            .unwrap();

        let err = drawer
            .take_order_payment(
                PaymentSource::CakeBar,
                "CB-9",
                Decimal::MAX,
                Some("CASH".to_string()),
                "emp_001",
                at("09:00:00"),
            )
            .unwrap_err();
        assert!(matches!(err, PosError::Validation { ref field, .. } if field == "amount"));

        let snapshot = drawer.snapshot(at("10:00:00").date()).unwrap();
        assert_eq!(snapshot.summary.unwrap().expected_cash, dec("100000"));
    }

    #[test]
    fn test_window_excludes_other_days() {
        let store = MemoryStore::new();
        let policy = CashPolicy::default();
        let drawer = CashDrawer::new(&store, &policy);
        let register = drawer
            .open(dec("1000"), None, "mgr_001", at("07:00:00"))
            .unwrap();
        ring_up(&store, register.id, "700", "CASH", "09:00:00");
        drawer
            .record_expense(
                dec("300"),
                "Yesterday's courier",
                "mgr_001",
                at("09:00:00") - chrono::TimeDelta::days(1),
            )
            .unwrap();

        let summary = drawer.snapshot(at("10:00:00").date()).unwrap().summary.unwrap();
        assert_eq!(summary.total_expenses, Decimal::ZERO);
        assert_eq!(summary.expected_cash, dec("1700"));
    }

    #[test]
    fn test_snapshot_limits_recent_transactions() {
        let store = MemoryStore::new();
        let policy = CashPolicy {
            recent_transactions_limit: 2,
        };
        let drawer = CashDrawer::new(&store, &policy);
        let register = drawer.open(dec("0"), None, "mgr_001", at("07:00:00")).unwrap();
        for minute in 0..5 {
            ring_up(&store, register.id, "100", "CARD", &format!("09:0{}:00", minute));
        }

        let snapshot = drawer.snapshot(at("10:00:00").date()).unwrap();
        assert_eq!(snapshot.recent_transactions.len(), 2);
        assert_eq!(snapshot.recent_transactions[0].at, at("09:04:00"));
    }
}
