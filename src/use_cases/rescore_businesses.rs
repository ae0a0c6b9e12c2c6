//! Rescore use case.
//! Re-derives every stored business's score from its stored orders and
//! bookkeeping entries and writes it back to the profile.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::call_with_timeout;
use crate::domain::CreditAssessment;
use crate::error::AppResult;
use crate::ports::BusinessStore;
use crate::services::showcase::live_features;
use crate::services::CreditScorer;

#[derive(Debug, Clone, PartialEq)]
pub struct RescoredBusiness {
    pub store_id: String,
    pub business_name: String,
    pub previous_score: Option<i32>,
    pub assessment: CreditAssessment,
}

pub struct RescoreBusinesses {
    store: Arc<dyn BusinessStore>,
    scorer: CreditScorer,
    call_timeout: Duration,
}

impl RescoreBusinesses {
    pub fn new(store: Arc<dyn BusinessStore>, call_timeout: Duration) -> Self {
        Self {
            store,
            scorer: CreditScorer::live(),
            call_timeout,
        }
    }

    pub async fn execute(&self) -> AppResult<Vec<RescoredBusiness>> {
        self.execute_at(Utc::now()).await
    }

    pub async fn execute_at(&self, now: DateTime<Utc>) -> AppResult<Vec<RescoredBusiness>> {
        let limit = self.call_timeout;
        let businesses =
            call_with_timeout("get_all_businesses", limit, self.store.get_all_businesses()).await?;

        let mut rescored = Vec::with_capacity(businesses.len());
        for business in businesses {
            let id = business.id.as_str();
            let (orders, transactions) = futures::try_join!(
                call_with_timeout("get_orders", limit, self.store.get_orders(id)),
                call_with_timeout("get_transactions", limit, self.store.get_transactions(id)),
            )?;

            let assessment = self
                .scorer
                .assess_exact(&live_features(&orders, &transactions, now));
            call_with_timeout(
                "update_business_assessment",
                limit,
                self.store.update_business_assessment(id, &assessment),
            )
            .await?;

            debug!(
                business_id = id,
                previous = ?business.record.credit_score,
                score = assessment.credit_score,
                "Business rescored"
            );
            rescored.push(RescoredBusiness {
                store_id: business.id.clone(),
                business_name: business.record.business_name.clone(),
                previous_score: business.record.credit_score,
                assessment,
            });
        }

        info!(businesses = rescored.len(), "Rescore finished");
        Ok(rescored)
    }
}
