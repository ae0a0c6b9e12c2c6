//! Populate businesses use case.
//! Generates a synthetic population and writes it through the BusinessStore port.

use futures::future::join_all;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use super::call_with_timeout;
use crate::config::PopulationConfig;
use crate::domain::SyntheticBusiness;
use crate::error::AppResult;
use crate::ports::{BusinessStore, StoreError, StoreResult};
use crate::services::{BusinessBuilder, RandomValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationPhase {
    Profile,
    Orders,
    Invoices,
    Transactions,
    CreditApplications,
}

impl fmt::Display for PopulationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PopulationPhase::Profile => "profile",
            PopulationPhase::Orders => "orders",
            PopulationPhase::Invoices => "invoices",
            PopulationPhase::Transactions => "transactions",
            PopulationPhase::CreditApplications => "credit applications",
        })
    }
}

/// A persistence failure tied to the business and phase it happened in.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("business {index} ({business_id}) failed during {phase}: {error}")]
pub struct PopulationFailure {
    pub index: usize,
    pub business_id: String,
    pub phase: PopulationPhase,
    #[source]
    pub error: StoreError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedBusiness {
    pub index: usize,
    pub business_id: String,
    /// Id the store assigned to the profile document.
    pub store_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhaseTimings {
    pub generation_ms: u64,
    pub profiles_ms: u64,
    pub related_ms: u64,
    pub total_ms: u64,
}

/// Outcome of a population run. Partial success is reported, never rolled back.
#[derive(Debug, Clone, Default)]
pub struct PopulationReport {
    pub created: Vec<CreatedBusiness>,
    pub failures: Vec<PopulationFailure>,
    /// Indices never sent to the store because the profile phase stopped early.
    pub not_attempted: Vec<usize>,
    pub related_documents: usize,
    pub timings: PhaseTimings,
}

impl PopulationReport {
    pub fn created_ids(&self) -> Vec<&str> {
        self.created.iter().map(|c| c.store_id.as_str()).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.not_attempted.is_empty()
    }

    pub fn first_failure(&self) -> Option<&PopulationFailure> {
        self.failures.first()
    }

    /// Store id of a created business, looked up by its `BIZ` id.
    pub fn store_id_for(&self, business_id: &str) -> Option<&str> {
        self.created
            .iter()
            .find(|c| c.business_id == business_id)
            .map(|c| c.store_id.as_str())
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

/// Generates businesses and persists profiles, then their related documents
/// in sequential batches.
pub struct BatchPopulator {
    store: Arc<dyn BusinessStore>,
    builder: BusinessBuilder,
    config: PopulationConfig,
}

impl BatchPopulator {
    pub fn new(
        store: Arc<dyn BusinessStore>,
        builder: BusinessBuilder,
        config: PopulationConfig,
    ) -> Self {
        Self {
            store,
            builder,
            config,
        }
    }

    pub async fn execute<R: Rng>(&self, rv: &mut RandomValues<R>) -> AppResult<PopulationReport> {
        let started = Instant::now();
        let businesses = self.generate(rv)?;
        let generation_ms = elapsed_ms(started);

        let mut report = self.persist(businesses).await;
        report.timings.generation_ms = generation_ms;
        report.timings.total_ms = elapsed_ms(started);

        info!(
            created = report.created.len(),
            failed = report.failures.len(),
            not_attempted = report.not_attempted.len(),
            related_documents = report.related_documents,
            generation_ms = report.timings.generation_ms,
            profiles_ms = report.timings.profiles_ms,
            related_ms = report.timings.related_ms,
            total_ms = report.timings.total_ms,
            "Population finished"
        );
        Ok(report)
    }

    /// Builds the whole population in memory. Failure here is a programming error.
    pub fn generate<R: Rng>(&self, rv: &mut RandomValues<R>) -> AppResult<Vec<SyntheticBusiness>> {
        info!(count = self.config.business_count, "Generating synthetic businesses");
        self.builder
            .build_population(self.config.business_count, rv)
            .map_err(|e| {
                error!(error = %e, "Synthetic business generation failed");
                e
            })
    }

    /// Writes already generated businesses. Profiles go first, in index order;
    /// the first profile failure stops the run and skips related documents.
    pub async fn persist(&self, businesses: Vec<SyntheticBusiness>) -> PopulationReport {
        let mut report = PopulationReport::default();

        let started = Instant::now();
        let persisted = self.persist_profiles(businesses, &mut report).await;
        report.timings.profiles_ms = elapsed_ms(started);
        info!(
            created = report.created.len(),
            elapsed_ms = report.timings.profiles_ms,
            "Profile phase finished"
        );

        if !report.failures.is_empty() {
            warn!(
                not_attempted = report.not_attempted.len(),
                "Profile phase failed; related documents skipped"
            );
            return report;
        }

        let started = Instant::now();
        self.persist_related(&persisted, &mut report).await;
        report.timings.related_ms = elapsed_ms(started);
        report
    }

    async fn persist_profiles(
        &self,
        businesses: Vec<SyntheticBusiness>,
        report: &mut PopulationReport,
    ) -> Vec<SyntheticBusiness> {
        let fanout = self.config.profile_fanout.max(1);
        let mut persisted = Vec::with_capacity(businesses.len());
        let mut remaining = businesses.into_iter();

        loop {
            let chunk: Vec<SyntheticBusiness> = remaining.by_ref().take(fanout).collect();
            if chunk.is_empty() {
                break;
            }

            let results = join_all(chunk.iter().map(|b| {
                call_with_timeout(
                    "create_business_profile",
                    self.config.call_timeout,
                    self.store.create_business_profile(&b.profile),
                )
            }))
            .await;

            for (mut business, result) in chunk.into_iter().zip(results) {
                match result {
                    Ok(store_id) => {
                        business.rebind_to(&store_id);
                        report.created.push(CreatedBusiness {
                            index: business.index,
                            business_id: business.business_id.clone(),
                            store_id,
                        });
                        persisted.push(business);
                    }
                    Err(error) => {
                        error!(
                            index = business.index,
                            business_id = %business.business_id,
                            error = %error,
                            "Failed to create business profile"
                        );
                        report.failures.push(PopulationFailure {
                            index: business.index,
                            business_id: business.business_id,
                            phase: PopulationPhase::Profile,
                            error,
                        });
                    }
                }
            }

            if !report.failures.is_empty() {
                report.not_attempted = remaining.by_ref().map(|b| b.index).collect();
                break;
            }
        }
        persisted
    }

    async fn persist_related(&self, businesses: &[SyntheticBusiness], report: &mut PopulationReport) {
        let permits = Semaphore::new(self.config.max_in_flight.max(1));
        let width = self.config.batch_width.max(1);

        for (batch_no, batch) in businesses.chunks(width).enumerate() {
            let started = Instant::now();
            let outcomes = join_all(batch.iter().map(|b| self.write_related(b, &permits))).await;

            let mut written = 0;
            for outcome in outcomes {
                match outcome {
                    Ok(count) => written += count,
                    Err(failure) => {
                        error!(
                            index = failure.index,
                            business_id = %failure.business_id,
                            phase = %failure.phase,
                            error = %failure.error,
                            "Failed to write related documents"
                        );
                        report.failures.push(failure);
                    }
                }
            }
            report.related_documents += written;

            info!(
                batch = batch_no + 1,
                businesses = batch.len(),
                documents = written,
                elapsed_ms = elapsed_ms(started),
                "Related batch written"
            );
        }
    }

    /// Writes every related document of one business concurrently. All writes
    /// are attempted; the first failure in phase order is reported.
    async fn write_related(
        &self,
        business: &SyntheticBusiness,
        permits: &Semaphore,
    ) -> Result<usize, PopulationFailure> {
        let orders = join_all(business.orders.iter().map(|o| {
            self.limited(permits, "create_order", self.store.create_order(o))
        }));
        let invoices = join_all(business.invoices.iter().map(|i| {
            self.limited(permits, "create_invoice", self.store.create_invoice(i))
        }));
        let transactions = join_all(business.bookkeeping.iter().map(|t| {
            self.limited(permits, "create_transaction", self.store.create_transaction(t))
        }));
        let applications = join_all(business.credit_applications.iter().map(|a| {
            self.limited(
                permits,
                "create_credit_application",
                self.store.create_credit_application(a),
            )
        }));

        let (orders, invoices, transactions, applications) =
            futures::join!(orders, invoices, transactions, applications);

        let mut written = 0;
        for (phase, results) in [
            (PopulationPhase::Orders, orders),
            (PopulationPhase::Invoices, invoices),
            (PopulationPhase::Transactions, transactions),
            (PopulationPhase::CreditApplications, applications),
        ] {
            for result in results {
                match result {
                    Ok(_) => written += 1,
                    Err(error) => {
                        return Err(PopulationFailure {
                            index: business.index,
                            business_id: business.business_id.clone(),
                            phase,
                            error,
                        })
                    }
                }
            }
        }
        Ok(written)
    }

    async fn limited<T, F>(&self, permits: &Semaphore, operation: &'static str, call: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        let _permit = permits
            .acquire()
            .await
            .map_err(|_| StoreError::Backend("write limiter closed".to_string()))?;
        call_with_timeout(operation, self.config.call_timeout, call).await
    }
}
