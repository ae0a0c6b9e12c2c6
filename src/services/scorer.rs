//! Heuristic credit scoring from behavioural features.

use rand::Rng;
use serde::Serialize;

use super::random::RandomValues;
use crate::domain::credit::{MAX_SCORE, MIN_SCORE};
use crate::domain::{money, BehavioralFeatures, CreditAssessment, ThresholdScheme};

const BASE_SCORE: f64 = 300.0;
const SYNTHETIC_NOISE: f64 = 20.0;

/// Per-component points before noise and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub customer: f64,
    pub order: f64,
    pub amount: f64,
    pub recency: f64,
    pub stickiness: f64,
}

impl ScoreBreakdown {
    pub fn from_features(features: &BehavioralFeatures) -> Self {
        let amount = money::to_f64(&features.amount);
        Self {
            customer: ((features.customer_number as f64).sqrt() * 20.0).min(150.0),
            order: (features.customer_order * 10.0).min(100.0),
            amount: (amount.max(1.0).ln() * 15.0).min(200.0),
            recency: recency_points(features.days_since_last_transaction),
            stickiness: features.customer_stickiness * 100.0,
        }
    }

    pub fn raw(&self) -> f64 {
        BASE_SCORE + self.customer + self.order + self.amount + self.recency + self.stickiness
    }
}

/// Full marks within 30 days, then a 1.5/day decay to day 90 and 2/day beyond.
pub fn recency_points(days_since_last: i64) -> f64 {
    let days = days_since_last as f64;
    if days_since_last <= 30 {
        100.0
    } else if days_since_last <= 90 {
        100.0 - (days - 30.0) * 1.5
    } else {
        (100.0 - (days - 30.0) * 2.0).max(0.0)
    }
}

/// How much uniform noise is added to the raw score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Noise {
    /// Re-deriving an existing business's score.
    None,
    /// Uniform in `[-half_width, half_width)`, used for synthetic populations.
    Uniform { half_width: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct CreditScorer {
    noise: Noise,
    scheme: ThresholdScheme,
}

impl CreditScorer {
    pub fn new(noise: Noise, scheme: ThresholdScheme) -> Self {
        Self { noise, scheme }
    }

    /// ±20 points of noise, standard thresholds.
    pub fn synthetic() -> Self {
        Self::new(
            Noise::Uniform {
                half_width: SYNTHETIC_NOISE,
            },
            ThresholdScheme::Standard,
        )
    }

    /// No noise, standard thresholds.
    pub fn live() -> Self {
        Self::new(Noise::None, ThresholdScheme::Standard)
    }

    pub fn scheme(&self) -> ThresholdScheme {
        self.scheme
    }

    /// Scores with this scorer's noise drawn from `rv`.
    pub fn assess<R: Rng>(
        &self,
        features: &BehavioralFeatures,
        rv: &mut RandomValues<R>,
    ) -> CreditAssessment {
        let noise = match self.noise {
            Noise::None => 0.0,
            Noise::Uniform { half_width } => rv.uniform_float(-half_width, half_width),
        };
        self.assess_with_offset(features, noise)
    }

    /// Scores without any noise regardless of configuration.
    pub fn assess_exact(&self, features: &BehavioralFeatures) -> CreditAssessment {
        self.assess_with_offset(features, 0.0)
    }

    fn assess_with_offset(&self, features: &BehavioralFeatures, offset: f64) -> CreditAssessment {
        let raw = ScoreBreakdown::from_features(features).raw() + offset;
        let credit_score = clamp_score(raw);
        CreditAssessment {
            credit_score,
            credit_category: self.scheme.categorize(credit_score),
        }
    }
}

fn clamp_score(raw: f64) -> i32 {
    if raw.is_nan() {
        return MIN_SCORE;
    }
    (raw.round() as i32).clamp(MIN_SCORE, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CreditCategory;
    use bigdecimal::BigDecimal;

    fn features(
        customer_number: u32,
        customer_order: f64,
        amount: i64,
        days_since: i64,
        stickiness: f64,
    ) -> BehavioralFeatures {
        BehavioralFeatures {
            customer_number,
            customer_order,
            amount: BigDecimal::from(amount),
            days_since_last_transaction: days_since,
            customer_stickiness: stickiness,
            transaction_count: 20,
            completion_rate: 0.9,
            clearance_days: 8.0,
        }
    }

    #[test]
    fn test_recency_points_bands() {
        assert_eq!(recency_points(0), 100.0);
        assert_eq!(recency_points(30), 100.0);
        assert_eq!(recency_points(60), 55.0);
        assert_eq!(recency_points(90), 10.0);
        assert_eq!(recency_points(91), 0.0);
        assert_eq!(recency_points(200), 0.0);
        assert_eq!(recency_points(100_000), 0.0);
    }

    #[test]
    fn test_zero_amount_contributes_nothing() {
        let breakdown = ScoreBreakdown::from_features(&features(4, 1.0, 0, 10, 0.0));
        assert_eq!(breakdown.amount, 0.0);
        assert!(!breakdown.raw().is_nan());
    }

    #[test]
    fn test_component_caps() {
        let breakdown = ScoreBreakdown::from_features(&features(10_000, 50.0, 1_000_000_000_000, 0, 1.0));
        assert_eq!(breakdown.customer, 150.0);
        assert_eq!(breakdown.order, 100.0);
        assert_eq!(breakdown.amount, 200.0);
        assert_eq!(breakdown.recency, 100.0);
        assert_eq!(breakdown.stickiness, 100.0);
        assert_eq!(CreditScorer::live().assess_exact(&features(10_000, 50.0, 1_000_000_000_000, 0, 1.0)).credit_score, 900);
    }

    #[test]
    fn test_known_score() {
        // 5 customers, 4 orders each, 20k revenue, last sale 10 days ago, stickiness 0.75
        let f = features(5, 4.0, 20_000, 10, 0.75);
        let breakdown = ScoreBreakdown::from_features(&f);
        let expected = 300.0 + 5f64.sqrt() * 20.0 + 40.0 + 20_000f64.ln() * 15.0 + 100.0 + 75.0;
        assert!((breakdown.raw() - expected).abs() < 1e-9);

        let assessment = CreditScorer::live().assess_exact(&f);
        assert_eq!(assessment.credit_score, expected.round() as i32);
        // 708.27 sits in the standard "good" band
        assert_eq!(assessment.credit_score, 708);
        assert_eq!(assessment.credit_category, CreditCategory::Good);
    }

    #[test]
    fn test_degenerate_features_clamp_to_floor() {
        let assessment = CreditScorer::live().assess_exact(&BehavioralFeatures::empty());
        assert!(assessment.credit_score >= MIN_SCORE);
        assert_eq!(assessment.credit_category, CreditCategory::Poor);
    }

    #[test]
    fn test_noise_is_bounded() {
        let f = features(6, 2.0, 15_000, 45, 0.4);
        let exact = CreditScorer::live().assess_exact(&f).credit_score;
        let scorer = CreditScorer::synthetic();
        let mut rv = RandomValues::seeded(11);
        for _ in 0..500 {
            let noisy = scorer.assess(&f, &mut rv).credit_score;
            assert!((noisy - exact).abs() <= 21);
            assert!((MIN_SCORE..=MAX_SCORE).contains(&noisy));
        }
    }

    #[test]
    fn test_live_scorer_is_deterministic() {
        let f = features(3, 1.5, 8_000, 120, 0.2);
        let mut rv = RandomValues::seeded(5);
        let scorer = CreditScorer::live();
        assert_eq!(scorer.assess(&f, &mut rv), scorer.assess_exact(&f));
    }

    #[test]
    fn test_display_scheme_scorer() {
        let f = features(5, 4.0, 20_000, 10, 0.75);
        let standard = CreditScorer::live().assess_exact(&f);
        let display = CreditScorer::new(Noise::None, ThresholdScheme::Display).assess_exact(&f);
        assert_eq!(standard.credit_score, display.credit_score);
        assert_eq!(
            display.credit_category,
            ThresholdScheme::Display.categorize(display.credit_score)
        );
    }
}
