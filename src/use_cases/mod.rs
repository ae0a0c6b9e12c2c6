pub mod export_ai_data;
pub mod load_showcase;
pub mod populate_businesses;
pub mod rescore_businesses;
pub mod screen_businesses;

pub use export_ai_data::ExportAiData;
pub use load_showcase::LoadShowcase;
pub use populate_businesses::{
    BatchPopulator, CreatedBusiness, PhaseTimings, PopulationFailure, PopulationPhase,
    PopulationReport,
};
pub use rescore_businesses::{RescoreBusinesses, RescoredBusiness};
pub use screen_businesses::{write_predictions_csv, ScreenBusinesses};

use std::future::Future;
use std::time::Duration;

use crate::ports::{StoreError, StoreResult};

/// Runs one store call, mapping expiry of `limit` to [`StoreError::Timeout`].
pub(crate) async fn call_with_timeout<T, F>(
    operation: &'static str,
    limit: Duration,
    call: F,
) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout {
            operation,
            after_ms: limit.as_millis() as u64,
        }),
    }
}
