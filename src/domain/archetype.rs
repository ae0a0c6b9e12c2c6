//! Business quality archetypes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named quality tier of a synthetic business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityTier {
    pub const ALL: [QualityTier; 4] = [
        QualityTier::Excellent,
        QualityTier::Good,
        QualityTier::Fair,
        QualityTier::Poor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Excellent => "excellent",
            QualityTier::Good => "good",
            QualityTier::Fair => "fair",
            QualityTier::Poor => "poor",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment behaviour profile driving ledger generation for one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessArchetype {
    pub tier: QualityTier,
    /// Probability in (0, 1] that an invoice receives any payment.
    pub payment_probability: f64,
    /// Mean payment delay in days; actual delays are drawn from [0, 2 * avg).
    pub avg_delay_days: f64,
    /// Nominal transactions per period. Carried for reference only.
    pub transaction_frequency: u32,
    /// Mean invoice amount; invoices are drawn from [0, 2 * avg) with a floor of 100.
    pub avg_amount: f64,
}

impl BusinessArchetype {
    pub fn standard(tier: QualityTier) -> Self {
        let (payment_probability, avg_delay_days, transaction_frequency, avg_amount) = match tier {
            QualityTier::Excellent => (0.95, 5.0, 25, 5000.0),
            QualityTier::Good => (0.85, 12.0, 18, 3000.0),
            QualityTier::Fair => (0.70, 20.0, 12, 2000.0),
            QualityTier::Poor => (0.45, 35.0, 6, 1500.0),
        };

        Self {
            tier,
            payment_probability,
            avg_delay_days,
            transaction_frequency,
            avg_amount,
        }
    }

    /// Checks the profile is usable by the ledger generator.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.payment_probability > 0.0 && self.payment_probability <= 1.0) {
            return Err(format!(
                "payment_probability must be in (0, 1], got {}",
                self.payment_probability
            ));
        }
        if !(self.avg_delay_days >= 0.0) {
            return Err(format!(
                "avg_delay_days must be non-negative, got {}",
                self.avg_delay_days
            ));
        }
        if !(self.avg_amount > 0.0) {
            return Err(format!(
                "avg_amount must be positive, got {}",
                self.avg_amount
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_archetypes_are_valid() {
        for tier in QualityTier::ALL {
            let archetype = BusinessArchetype::standard(tier);
            assert_eq!(archetype.tier, tier);
            assert!(archetype.validate().is_ok());
        }
    }

    #[test]
    fn test_payment_probability_decreases_with_tier() {
        let probs: Vec<f64> = QualityTier::ALL
            .iter()
            .map(|t| BusinessArchetype::standard(*t).payment_probability)
            .collect();
        assert!(probs.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let mut archetype = BusinessArchetype::standard(QualityTier::Good);
        archetype.payment_probability = 0.0;
        assert!(archetype.validate().is_err());
    }

    #[test]
    fn test_tier_serializes_snake_case() {
        let json = serde_json::to_string(&QualityTier::Excellent).unwrap();
        assert_eq!(json, "\"excellent\"");
    }
}
