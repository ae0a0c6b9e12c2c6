//! Screening use case.
//! Applies hard filters and noise-free scoring to an exported population.

use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::info;

use super::export_ai_data::read_records;
use crate::domain::AiExportRecord;
use crate::error::AppResult;
use crate::services::screening::{predict, PredictionRow};
use crate::services::{CreditScorer, FilterOutcome, Prediction, ScoringReport};

pub struct ScreenBusinesses {
    scorer: CreditScorer,
}

impl Default for ScreenBusinesses {
    fn default() -> Self {
        Self {
            scorer: CreditScorer::live(),
        }
    }
}

impl ScreenBusinesses {
    pub fn new(scorer: CreditScorer) -> Self {
        Self { scorer }
    }

    pub fn screen(
        &self,
        records: &[AiExportRecord],
        now: DateTime<Utc>,
    ) -> (Vec<Prediction>, ScoringReport) {
        let predictions = predict(records, &self.scorer);
        let report = ScoringReport::from_predictions(&predictions, now);
        info!(
            businesses = report.total,
            passed = report.filter_count(FilterOutcome::Pass),
            "Screening finished"
        );
        (predictions, report)
    }

    /// Reads an export file and screens it.
    pub fn execute(&self, input: &Path) -> AppResult<(Vec<Prediction>, ScoringReport)> {
        let records = read_records(input)?;
        Ok(self.screen(&records, Utc::now()))
    }
}

/// Writes one CSV row per prediction, with a header.
pub fn write_predictions_csv(path: &Path, predictions: &[Prediction]) -> AppResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for prediction in predictions {
        writer.serialize(PredictionRow::from(prediction))?;
    }
    writer.flush()?;
    Ok(())
}
