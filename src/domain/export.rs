use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::business::SyntheticBusiness;
use super::credit::CreditCategory;
use super::features::BehavioralFeatures;
use super::ledger::LedgerTransaction;

/// Flat per-business record consumed by offline model training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiExportRecord {
    pub business_id: String,
    pub business_name: String,
    pub industry: String,
    pub customer_number: u32,
    pub customer_order: f64,
    pub amount: BigDecimal,
    pub days_since_last_transaction: i64,
    pub customer_stickiness: f64,
    pub transaction_count: u32,
    pub completion_rate: f64,
    pub clearance_days: f64,
    pub credit_score: i32,
    pub credit_category: CreditCategory,
    pub transactions: Vec<LedgerTransaction>,
}

impl AiExportRecord {
    pub fn features(&self) -> BehavioralFeatures {
        BehavioralFeatures {
            customer_number: self.customer_number,
            customer_order: self.customer_order,
            amount: self.amount.clone(),
            days_since_last_transaction: self.days_since_last_transaction,
            customer_stickiness: self.customer_stickiness,
            transaction_count: self.transaction_count,
            completion_rate: self.completion_rate,
            clearance_days: self.clearance_days,
        }
    }
}

impl From<&SyntheticBusiness> for AiExportRecord {
    fn from(business: &SyntheticBusiness) -> Self {
        let features = &business.features;
        AiExportRecord {
            business_id: business.business_id.clone(),
            business_name: business.profile.business_name.clone(),
            industry: business.profile.industry.clone(),
            customer_number: features.customer_number,
            customer_order: features.customer_order,
            amount: features.amount.clone(),
            days_since_last_transaction: features.days_since_last_transaction,
            customer_stickiness: features.customer_stickiness,
            transaction_count: features.transaction_count,
            completion_rate: features.completion_rate,
            clearance_days: features.clearance_days,
            credit_score: business.assessment.credit_score,
            credit_category: business.assessment.credit_category,
            transactions: business.ledger.clone(),
        }
    }
}
