//! Hard filters applied before scoring, and per-business predictions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::scorer::CreditScorer;
use crate::domain::credit::MIN_SCORE;
use crate::domain::{AiExportRecord, BehavioralFeatures, CreditCategory};

const MIN_TRUSTED_TRANSACTIONS: u32 = 5;
const MAX_STICKINESS: f64 = 0.8;
const MIN_COMPLETION_RATE: f64 = 0.2;
const MAX_CLEARANCE_DAYS: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOutcome {
    Pass,
    LowTrust,
    CircularFake,
    NonCompliant,
    SlowSettlement,
}

impl FilterOutcome {
    pub const ALL: [FilterOutcome; 5] = [
        FilterOutcome::Pass,
        FilterOutcome::LowTrust,
        FilterOutcome::CircularFake,
        FilterOutcome::NonCompliant,
        FilterOutcome::SlowSettlement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOutcome::Pass => "pass",
            FilterOutcome::LowTrust => "low_trust",
            FilterOutcome::CircularFake => "circular_fake",
            FilterOutcome::NonCompliant => "non_compliant",
            FilterOutcome::SlowSettlement => "slow_settlement",
        }
    }

    pub fn passed(&self) -> bool {
        *self == FilterOutcome::Pass
    }
}

impl fmt::Display for FilterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applies the hard filters in order; the first that trips wins.
pub fn screen(features: &BehavioralFeatures) -> FilterOutcome {
    if features.transaction_count < MIN_TRUSTED_TRANSACTIONS {
        FilterOutcome::LowTrust
    } else if features.customer_stickiness > MAX_STICKINESS {
        FilterOutcome::CircularFake
    } else if features.completion_rate < MIN_COMPLETION_RATE {
        FilterOutcome::NonCompliant
    } else if features.clearance_days > MAX_CLEARANCE_DAYS {
        FilterOutcome::SlowSettlement
    } else {
        FilterOutcome::Pass
    }
}

/// Screening result for one exported business.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub business_id: String,
    pub business_name: String,
    pub filter_result: FilterOutcome,
    pub predicted_credit_score: i32,
    /// `None` when the business was rejected by a hard filter.
    pub predicted_category: Option<CreditCategory>,
    pub features: BehavioralFeatures,
}

impl Prediction {
    pub fn category_label(&self) -> &'static str {
        self.predicted_category
            .map(|c| c.as_str())
            .unwrap_or("rejected")
    }
}

/// Flat CSV row for a prediction.
#[derive(Debug, Serialize)]
pub struct PredictionRow<'a> {
    pub business_id: &'a str,
    pub business_name: &'a str,
    pub filter_result: &'static str,
    pub predicted_credit_score: i32,
    pub predicted_category: &'static str,
}

impl<'a> From<&'a Prediction> for PredictionRow<'a> {
    fn from(p: &'a Prediction) -> Self {
        PredictionRow {
            business_id: &p.business_id,
            business_name: &p.business_name,
            filter_result: p.filter_result.as_str(),
            predicted_credit_score: p.predicted_credit_score,
            predicted_category: p.category_label(),
        }
    }
}

/// Screens and scores exported records. Rejected businesses get the floor score.
pub fn predict(records: &[AiExportRecord], scorer: &CreditScorer) -> Vec<Prediction> {
    records
        .iter()
        .map(|record| {
            let features = record.features();
            let filter_result = screen(&features);
            let (predicted_credit_score, predicted_category) = if filter_result.passed() {
                let assessment = scorer.assess_exact(&features);
                (assessment.credit_score, Some(assessment.credit_category))
            } else {
                (MIN_SCORE, None)
            };
            Prediction {
                business_id: record.business_id.clone(),
                business_name: record.business_name.clone(),
                filter_result,
                predicted_credit_score,
                predicted_category,
                features,
            }
        })
        .collect()
}
