//! Drawer arithmetic over the three payment streams.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{PosError, PosResult};
use crate::models::{Expense, OrderPayment, PaymentSource, PaymentType, Sale};

use super::payment_type::normalize_payment_type;

/// One payment from any stream, with its type resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Which stream it came from.
    pub source: PaymentSource,
    /// Id of the sale or payment record.
    pub reference_id: Uuid,
    /// Amount received.
    pub amount: Decimal,
    /// Resolved payment type.
    pub payment_type: PaymentType,
    /// False when the stored type was unreadable and counted as CASH.
    pub recognized: bool,
    /// When the money came in.
    pub at: NaiveDateTime,
}

impl LedgerEntry {
    fn new(
        source: PaymentSource,
        reference_id: Uuid,
        amount: Decimal,
        stored_type: Option<&str>,
        at: NaiveDateTime,
    ) -> Self {
        let (payment_type, recognized) = normalize_payment_type(stored_type);
        Self {
            source,
            reference_id,
            amount,
            payment_type,
            recognized,
            at,
        }
    }
}

/// The three streams that feed a register's day.
#[derive(Debug, Clone, Default)]
pub struct PaymentStreams {
    /// Counter sales.
    pub sales: Vec<Sale>,
    /// Cake-bar payments.
    pub cake_bar: Vec<OrderPayment>,
    /// Custom-order payments.
    pub custom_orders: Vec<OrderPayment>,
}

impl PaymentStreams {
    /// Flattens all streams into one normalized ledger.
    pub fn ledger(&self) -> Vec<LedgerEntry> {
        let sales = self.sales.iter().map(|s| {
            LedgerEntry::new(
                PaymentSource::Sale,
                s.id,
                s.total,
                s.payment_type.as_deref(),
                s.created_at,
            )
        });
        let order_payments = |source: PaymentSource, payments: &[OrderPayment]| {
            payments
                .iter()
                .map(move |p| {
                    LedgerEntry::new(
                        source,
                        p.id,
                        p.amount,
                        p.payment_type.as_deref(),
                        p.paid_at,
                    )
                })
                .collect::<Vec<_>>()
        };

        sales
            .chain(order_payments(PaymentSource::CakeBar, &self.cake_bar))
            .chain(order_payments(PaymentSource::CustomOrder, &self.custom_orders))
            .collect()
    }
}

/// Running total for one payment type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaymentTypeTotal {
    /// Sum of amounts.
    pub total: Decimal,
    /// Number of payments.
    pub count: u32,
}

/// Expected-vs-counted drawer figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    /// Float placed in the drawer at open.
    pub opening_cash: Decimal,
    /// All three streams, every payment type.
    pub total_sales_all: Decimal,
    /// All three streams, CASH only.
    pub cash_sales: Decimal,
    /// Cash paid out.
    pub total_expenses: Decimal,
    /// `opening_cash + cash_sales - total_expenses`.
    pub expected_cash: Decimal,
    /// Totals grouped by resolved payment type.
    pub by_payment_type: BTreeMap<PaymentType, PaymentTypeTotal>,
    /// Payments whose stored type was unreadable and counted as CASH.
    pub unrecognized_payment_types: u32,
}

/// Computes the drawer figures for a ledger.
///
/// Fails with a validation error when a total leaves the `Decimal` range.
pub fn reconcile(
    opening_cash: Decimal,
    ledger: &[LedgerEntry],
    expenses: &[Expense],
) -> PosResult<Reconciliation> {
    let mut by_payment_type: BTreeMap<PaymentType, PaymentTypeTotal> = BTreeMap::new();
    let mut total_sales_all = Decimal::ZERO;
    for entry in ledger {
        let slot = by_payment_type.entry(entry.payment_type).or_default();
        slot.total = PosError::in_range("amount", slot.total.checked_add(entry.amount))?;
        slot.count += 1;
        total_sales_all =
            PosError::in_range("amount", total_sales_all.checked_add(entry.amount))?;
    }

    let cash_sales = by_payment_type
        .get(&PaymentType::Cash)
        .map(|t| t.total)
        .unwrap_or(Decimal::ZERO);
    let total_expenses = expenses.iter().try_fold(Decimal::ZERO, |acc, e| {
        PosError::in_range("amount", acc.checked_add(e.amount))
    })?;
    let expected_cash = opening_cash
        .checked_add(cash_sales)
        .and_then(|cash| cash.checked_sub(total_expenses));

    Ok(Reconciliation {
        opening_cash,
        total_sales_all,
        cash_sales,
        total_expenses,
        expected_cash: PosError::in_range("expectedCash", expected_cash)?,
        by_payment_type,
        unrecognized_payment_types: ledger.iter().filter(|e| !e.recognized).count() as u32,
    })
}

/// The `limit` newest ledger entries, newest first.
pub fn recent_transactions(ledger: &[LedgerEntry], limit: usize) -> Vec<LedgerEntry> {
    let mut entries = ledger.to_vec();
    entries.sort_by(|a, b| b.at.cmp(&a.at));
    entries.truncate(limit);
    entries
}
