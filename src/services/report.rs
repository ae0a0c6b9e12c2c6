//! Text summary of a screening run.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

use super::screening::{FilterOutcome, Prediction};
use crate::domain::money;

const RECENT_ACTIVITY_DAYS: i64 = 30;
const DIVERSE_CUSTOMER_BASE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreStatistics {
    pub mean: f64,
    pub median: f64,
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringReport {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub filter_counts: BTreeMap<FilterOutcome, usize>,
    /// Keyed by category label, including `rejected`.
    pub category_counts: BTreeMap<&'static str, usize>,
    pub scores: Option<ScoreStatistics>,
    pub high_revenue: usize,
    pub recently_active: usize,
    pub diverse_customers: usize,
}

impl ScoringReport {
    pub fn from_predictions(predictions: &[Prediction], generated_at: DateTime<Utc>) -> Self {
        let mut filter_counts = BTreeMap::new();
        let mut category_counts = BTreeMap::new();
        for p in predictions {
            *filter_counts.entry(p.filter_result).or_insert(0) += 1;
            *category_counts.entry(p.category_label()).or_insert(0) += 1;
        }

        let scores: Vec<i32> = predictions.iter().map(|p| p.predicted_credit_score).collect();
        let amounts: Vec<f64> = predictions
            .iter()
            .map(|p| money::to_f64(&p.features.amount))
            .collect();
        let amount_median = median(amounts.clone());

        ScoringReport {
            generated_at,
            total: predictions.len(),
            filter_counts,
            category_counts,
            scores: score_statistics(&scores),
            high_revenue: match amount_median {
                Some(m) => amounts.iter().filter(|a| **a > m).count(),
                None => 0,
            },
            recently_active: predictions
                .iter()
                .filter(|p| p.features.days_since_last_transaction <= RECENT_ACTIVITY_DAYS)
                .count(),
            diverse_customers: predictions
                .iter()
                .filter(|p| p.features.customer_number >= DIVERSE_CUSTOMER_BASE)
                .count(),
        }
    }

    pub fn filter_count(&self, outcome: FilterOutcome) -> usize {
        self.filter_counts.get(&outcome).copied().unwrap_or(0)
    }

    fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }
}

fn score_statistics(scores: &[i32]) -> Option<ScoreStatistics> {
    let min = *scores.iter().min()?;
    let max = *scores.iter().max()?;
    let mean = scores.iter().map(|s| *s as f64).sum::<f64>() / scores.len() as f64;
    let median = median(scores.iter().map(|s| *s as f64).collect())?;
    Some(ScoreStatistics {
        mean,
        median,
        min,
        max,
    })
}

/// Middle value, or the mean of the two middle values for even lengths.
fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

impl fmt::Display for ScoringReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CREDIT SCORING REPORT")?;
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "Analysis Date: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Total Businesses Analyzed: {}", self.total)?;
        writeln!(f)?;

        writeln!(f, "HARD FILTER RESULTS:")?;
        for (outcome, count) in &self.filter_counts {
            writeln!(f, "  {}: {} ({:.1}%)", outcome, count, self.percent(*count))?;
        }
        writeln!(f)?;

        writeln!(f, "CREDIT CATEGORY DISTRIBUTION:")?;
        for (category, count) in &self.category_counts {
            writeln!(f, "  {}: {} ({:.1}%)", category, count, self.percent(*count))?;
        }
        writeln!(f)?;

        if let Some(stats) = &self.scores {
            writeln!(f, "CREDIT SCORE STATISTICS:")?;
            writeln!(f, "  Average Score: {:.1}", stats.mean)?;
            writeln!(f, "  Median Score: {:.1}", stats.median)?;
            writeln!(f, "  Min Score: {}", stats.min)?;
            writeln!(f, "  Max Score: {}", stats.max)?;
            writeln!(f)?;
        }

        if self.total > 0 {
            writeln!(f, "BUSINESS INSIGHTS:")?;
            writeln!(
                f,
                "  High-revenue businesses: {} ({:.1}%)",
                self.high_revenue,
                self.percent(self.high_revenue)
            )?;
            writeln!(
                f,
                "  Recently active: {} ({:.1}%)",
                self.recently_active,
                self.percent(self.recently_active)
            )?;
            write!(
                f,
                "  Diverse customer base (5+): {} ({:.1}%)",
                self.diverse_customers,
                self.percent(self.diverse_customers)
            )?;
        }
        Ok(())
    }
}
