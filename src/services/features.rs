//! Reduces a ledger to behavioural features.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::domain::features::DEFAULT_CLEARANCE_DAYS;
use crate::domain::{money, BehavioralFeatures, LedgerTransaction, PaymentStatus};

/// Aggregates `ledger` as of now.
pub fn aggregate(ledger: &[LedgerTransaction]) -> BehavioralFeatures {
    aggregate_at(ledger, Utc::now())
}

/// Aggregates `ledger` with recency measured from `now`. Pure: the same inputs
/// always give the same features.
pub fn aggregate_at(ledger: &[LedgerTransaction], now: DateTime<Utc>) -> BehavioralFeatures {
    let Some(last_invoice) = ledger.iter().map(|t| t.invoice_date).max() else {
        return BehavioralFeatures::empty();
    };

    let transaction_count = ledger.len() as u32;
    let customer_number = ledger
        .iter()
        .map(|t| t.customer_email.as_str())
        .collect::<HashSet<_>>()
        .len() as u32;

    let customer_order = if customer_number == 0 {
        0.0
    } else {
        transaction_count as f64 / customer_number as f64
    };

    let customer_stickiness = 1.0 - customer_number as f64 / transaction_count as f64;

    let paid = ledger
        .iter()
        .filter(|t| t.payment_status == PaymentStatus::Paid)
        .count();
    let completion_rate = paid as f64 / transaction_count as f64;

    let clearances: Vec<i64> = ledger.iter().filter_map(|t| t.clearance_days()).collect();
    let clearance_days = if clearances.is_empty() {
        DEFAULT_CLEARANCE_DAYS
    } else {
        clearances.iter().sum::<i64>() as f64 / clearances.len() as f64
    };

    BehavioralFeatures {
        customer_number,
        customer_order,
        amount: money::sum(ledger.iter().map(|t| &t.invoice_amount)),
        days_since_last_transaction: (now - last_invoice).num_days().max(0),
        customer_stickiness,
        transaction_count,
        completion_rate,
        clearance_days,
    }
}
