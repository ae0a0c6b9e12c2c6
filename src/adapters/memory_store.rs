//! In-process implementation of BusinessStore.

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Reverse;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    BookkeepingTransaction, BusinessProfile, CreditApplication, CreditAssessment, Invoice, Order,
    Stored,
};
use crate::ports::{BusinessStore, StoreError, StoreResult};

const ORDER_LIMIT: usize = 50;
const INVOICE_LIMIT: usize = 50;
const TRANSACTION_LIMIT: usize = 100;

/// Insertion sequence breaks ties between documents stamped in the same instant.
#[derive(Debug, Clone)]
struct Entry<T> {
    seq: u64,
    doc: Stored<T>,
}

#[derive(Debug, Default)]
struct Collections {
    next_seq: u64,
    businesses: Vec<Entry<BusinessProfile>>,
    orders: Vec<Entry<Order>>,
    invoices: Vec<Entry<Invoice>>,
    transactions: Vec<Entry<BookkeepingTransaction>>,
    credit_applications: Vec<Entry<CreditApplication>>,
}

impl Collections {
    fn stamp<T>(&mut self, record: T) -> Entry<T> {
        let now = Utc::now();
        let seq = self.next_seq;
        self.next_seq += 1;
        Entry {
            seq,
            doc: Stored {
                id: Uuid::new_v4().to_string(),
                created_at: now,
                updated_at: now,
                record,
            },
        }
    }
}

/// Document store kept in memory behind an async lock. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryBusinessStore {
    inner: Arc<RwLock<Collections>>,
}

impl InMemoryBusinessStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total documents across all collections.
    pub async fn document_count(&self) -> usize {
        let state = self.inner.read().await;
        state.businesses.len()
            + state.orders.len()
            + state.invoices.len()
            + state.transactions.len()
            + state.credit_applications.len()
    }

    async fn insert<T, F>(&self, record: T, select: F) -> String
    where
        F: FnOnce(&mut Collections) -> &mut Vec<Entry<T>>,
    {
        let mut state = self.inner.write().await;
        let entry = state.stamp(record);
        let id = entry.doc.id.clone();
        select(&mut *state).push(entry);
        id
    }
}

/// Newest-created first, ties broken by later insertion first.
fn newest_created<T: Clone>(entries: &[Entry<T>], limit: Option<usize>) -> Vec<Stored<T>> {
    let mut selected: Vec<&Entry<T>> = entries.iter().collect();
    selected.sort_by_key(|e| Reverse((e.doc.created_at, e.seq)));
    selected
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|e| e.doc.clone())
        .collect()
}

#[async_trait]
impl BusinessStore for InMemoryBusinessStore {
    async fn create_business_profile(&self, profile: &BusinessProfile) -> StoreResult<String> {
        Ok(self.insert(profile.clone(), |c| &mut c.businesses).await)
    }

    async fn create_order(&self, order: &Order) -> StoreResult<String> {
        Ok(self.insert(order.clone(), |c| &mut c.orders).await)
    }

    async fn create_invoice(&self, invoice: &Invoice) -> StoreResult<String> {
        Ok(self.insert(invoice.clone(), |c| &mut c.invoices).await)
    }

    async fn create_transaction(&self, txn: &BookkeepingTransaction) -> StoreResult<String> {
        Ok(self.insert(txn.clone(), |c| &mut c.transactions).await)
    }

    async fn create_credit_application(
        &self,
        application: &CreditApplication,
    ) -> StoreResult<String> {
        Ok(self
            .insert(application.clone(), |c| &mut c.credit_applications)
            .await)
    }

    async fn update_business_assessment(
        &self,
        business_id: &str,
        assessment: &CreditAssessment,
    ) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        let entry = state
            .businesses
            .iter_mut()
            .find(|e| e.doc.id == business_id)
            .ok_or_else(|| StoreError::NotFound(business_id.to_string()))?;

        entry.doc.record.apply_assessment(assessment);
        entry.doc.updated_at = Utc::now();
        Ok(())
    }

    async fn get_all_businesses(&self) -> StoreResult<Vec<Stored<BusinessProfile>>> {
        let state = self.inner.read().await;
        Ok(newest_created(&state.businesses, None))
    }

    async fn get_business_profile(
        &self,
        business_id: &str,
    ) -> StoreResult<Option<Stored<BusinessProfile>>> {
        let state = self.inner.read().await;
        Ok(state
            .businesses
            .iter()
            .find(|e| e.doc.id == business_id)
            .map(|e| e.doc.clone()))
    }

    async fn get_orders(&self, business_id: &str) -> StoreResult<Vec<Stored<Order>>> {
        let state = self.inner.read().await;
        let owned: Vec<Entry<Order>> = state
            .orders
            .iter()
            .filter(|e| e.doc.record.business_id == business_id)
            .cloned()
            .collect();
        Ok(newest_created(&owned, Some(ORDER_LIMIT)))
    }

    async fn get_invoices(&self, business_id: &str) -> StoreResult<Vec<Stored<Invoice>>> {
        let state = self.inner.read().await;
        let owned: Vec<Entry<Invoice>> = state
            .invoices
            .iter()
            .filter(|e| e.doc.record.business_id == business_id)
            .cloned()
            .collect();
        Ok(newest_created(&owned, Some(INVOICE_LIMIT)))
    }

    async fn get_transactions(
        &self,
        business_id: &str,
    ) -> StoreResult<Vec<Stored<BookkeepingTransaction>>> {
        let state = self.inner.read().await;
        let mut owned: Vec<&Entry<BookkeepingTransaction>> = state
            .transactions
            .iter()
            .filter(|e| e.doc.record.business_id == business_id)
            .collect();
        owned.sort_by_key(|e| Reverse((e.doc.record.date, e.seq)));
        Ok(owned
            .into_iter()
            .take(TRANSACTION_LIMIT)
            .map(|e| e.doc.clone())
            .collect())
    }

    async fn get_credit_applications(
        &self,
        business_id: &str,
    ) -> StoreResult<Vec<Stored<CreditApplication>>> {
        let state = self.inner.read().await;
        let mut owned: Vec<&Entry<CreditApplication>> = state
            .credit_applications
            .iter()
            .filter(|e| e.doc.record.business_id == business_id)
            .collect();
        owned.sort_by_key(|e| Reverse((e.doc.record.application_date, e.seq)));
        Ok(owned.into_iter().map(|e| e.doc.clone()).collect())
    }
}
