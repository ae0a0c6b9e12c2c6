//! Ports: the persistence seam between generation logic and a document store.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    BookkeepingTransaction, BusinessProfile, CreditApplication, CreditAssessment, Invoice, Order,
    Stored,
};

/// Failure of any store call. The core does not distinguish network from
/// validation causes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Store call {operation} timed out after {after_ms}ms")]
    Timeout {
        operation: &'static str,
        after_ms: u64,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Document store holding businesses and their bookkeeping collections.
///
/// Every create stamps server-side `created_at`/`updated_at` and returns the
/// generated document id. Writes are independently atomic per document.
#[async_trait]
pub trait BusinessStore: Send + Sync {
    async fn create_business_profile(&self, profile: &BusinessProfile) -> StoreResult<String>;
    async fn create_order(&self, order: &Order) -> StoreResult<String>;
    async fn create_invoice(&self, invoice: &Invoice) -> StoreResult<String>;
    async fn create_transaction(&self, txn: &BookkeepingTransaction) -> StoreResult<String>;
    async fn create_credit_application(
        &self,
        application: &CreditApplication,
    ) -> StoreResult<String>;

    async fn update_business_assessment(
        &self,
        business_id: &str,
        assessment: &CreditAssessment,
    ) -> StoreResult<()>;

    async fn get_all_businesses(&self) -> StoreResult<Vec<Stored<BusinessProfile>>>;
    async fn get_business_profile(
        &self,
        business_id: &str,
    ) -> StoreResult<Option<Stored<BusinessProfile>>>;
    async fn get_orders(&self, business_id: &str) -> StoreResult<Vec<Stored<Order>>>;
    async fn get_invoices(&self, business_id: &str) -> StoreResult<Vec<Stored<Invoice>>>;
    async fn get_transactions(
        &self,
        business_id: &str,
    ) -> StoreResult<Vec<Stored<BookkeepingTransaction>>>;
    async fn get_credit_applications(
        &self,
        business_id: &str,
    ) -> StoreResult<Vec<Stored<CreditApplication>>>;
}
