//! Credit score bands and their two threshold schemes.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_SCORE: i32 = 300;
pub const MAX_SCORE: i32 = 900;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditCategory {
    Poor,
    AtRisk,
    Good,
    Excellent,
}

impl CreditCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditCategory::Poor => "poor",
            CreditCategory::AtRisk => "at_risk",
            CreditCategory::Good => "good",
            CreditCategory::Excellent => "excellent",
        }
    }
}

impl fmt::Display for CreditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score-to-category threshold sets.
///
/// `Standard` is the canonical scheme applied by the scorer. `Display` is a
/// presentation relabelling with wider bands, used only for dashboard labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdScheme {
    #[default]
    Standard,
    Display,
}

impl ThresholdScheme {
    /// Lower bounds for excellent, good and at_risk, in that order.
    fn bounds(&self) -> (i32, i32, i32) {
        match self {
            ThresholdScheme::Standard => (720, 660, 580),
            ThresholdScheme::Display => (750, 600, 500),
        }
    }

    pub fn categorize(&self, score: i32) -> CreditCategory {
        let (excellent, good, at_risk) = self.bounds();
        if score >= excellent {
            CreditCategory::Excellent
        } else if score >= good {
            CreditCategory::Good
        } else if score >= at_risk {
            CreditCategory::AtRisk
        } else {
            CreditCategory::Poor
        }
    }

    /// Human readable label for a category under this scheme.
    pub fn label(&self, category: CreditCategory) -> &'static str {
        match (self, category) {
            (_, CreditCategory::Excellent) => "Excellent",
            (ThresholdScheme::Standard, CreditCategory::Good) => "Good",
            (ThresholdScheme::Display, CreditCategory::Good) => "Good / Stable",
            (_, CreditCategory::AtRisk) => "At Risk",
            (_, CreditCategory::Poor) => "Poor",
        }
    }

    /// Inclusive score range covered by a category, e.g. `"600 - 749"`.
    pub fn range(&self, category: CreditCategory) -> String {
        let (excellent, good, at_risk) = self.bounds();
        let (low, high) = match category {
            CreditCategory::Excellent => (excellent, MAX_SCORE),
            CreditCategory::Good => (good, excellent - 1),
            CreditCategory::AtRisk => (at_risk, good - 1),
            CreditCategory::Poor => (MIN_SCORE, at_risk - 1),
        };
        format!("{} - {}", low, high)
    }
}

/// Score and band stored on a business profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditAssessment {
    pub credit_score: i32,
    pub credit_category: CreditCategory,
}
