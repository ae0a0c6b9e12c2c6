use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Clearance assumed when no record in a ledger has been paid.
pub const DEFAULT_CLEARANCE_DAYS: f64 = 30.0;

/// Behavioural aggregates of one ledger. The first five fields feed the credit
/// scorer; the rest are used by hard filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralFeatures {
    pub customer_number: u32,
    pub customer_order: f64,
    pub amount: BigDecimal,
    pub days_since_last_transaction: i64,
    pub customer_stickiness: f64,
    pub transaction_count: u32,
    pub completion_rate: f64,
    pub clearance_days: f64,
}

impl BehavioralFeatures {
    /// Features of a business with no recorded activity.
    pub fn empty() -> Self {
        Self {
            customer_number: 0,
            customer_order: 0.0,
            amount: BigDecimal::from(0),
            days_since_last_transaction: 0,
            customer_stickiness: 0.0,
            transaction_count: 0,
            completion_rate: 0.0,
            clearance_days: DEFAULT_CLEARANCE_DAYS,
        }
    }
}
