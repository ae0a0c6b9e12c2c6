//! Showcase use case.
//! Loads one stored business and re-derives its dashboard and live score.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::call_with_timeout;
use crate::error::AppResult;
use crate::ports::{BusinessStore, StoreError};
use crate::services::{CreditScorer, ShowcaseDashboard, ShowcaseDocuments};

pub struct LoadShowcase {
    store: Arc<dyn BusinessStore>,
    scorer: CreditScorer,
    call_timeout: Duration,
}

impl LoadShowcase {
    pub fn new(store: Arc<dyn BusinessStore>, call_timeout: Duration) -> Self {
        Self {
            store,
            scorer: CreditScorer::live(),
            call_timeout,
        }
    }

    pub async fn execute(&self, preferred_id: &str) -> AppResult<ShowcaseDashboard> {
        self.execute_at(preferred_id, Utc::now()).await
    }

    /// Loads the preferred business, or the first stored business when it is
    /// missing, with recency measured from `now`.
    pub async fn execute_at(
        &self,
        preferred_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<ShowcaseDashboard> {
        let limit = self.call_timeout;
        let businesses =
            call_with_timeout("get_all_businesses", limit, self.store.get_all_businesses()).await?;

        let (business_id, fell_back) = if businesses.iter().any(|b| b.id == preferred_id) {
            (preferred_id.to_string(), false)
        } else {
            let first = businesses
                .first()
                .ok_or_else(|| StoreError::NotFound(preferred_id.to_string()))?;
            warn!(
                preferred = preferred_id,
                fallback = %first.id,
                name = %first.record.business_name,
                "Showcase business not found, using first available business"
            );
            (first.id.clone(), true)
        };

        let id = business_id.as_str();
        let (profile, orders, invoices, transactions, credit_applications) = futures::try_join!(
            call_with_timeout("get_business_profile", limit, self.store.get_business_profile(id)),
            call_with_timeout("get_orders", limit, self.store.get_orders(id)),
            call_with_timeout("get_invoices", limit, self.store.get_invoices(id)),
            call_with_timeout("get_transactions", limit, self.store.get_transactions(id)),
            call_with_timeout(
                "get_credit_applications",
                limit,
                self.store.get_credit_applications(id)
            ),
        )?;

        info!(
            business_id = id,
            profile = profile.is_some(),
            orders = orders.len(),
            invoices = invoices.len(),
            transactions = transactions.len(),
            credit_applications = credit_applications.len(),
            "Loaded showcase data"
        );

        let docs = ShowcaseDocuments {
            profile,
            orders,
            invoices,
            transactions,
            credit_applications,
        };
        Ok(ShowcaseDashboard::assemble(
            business_id,
            fell_back,
            docs,
            &self.scorer,
            now,
        ))
    }
}
