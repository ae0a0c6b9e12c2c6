//! Business profile and bookkeeping documents, in the shape the document store keeps them.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::archetype::QualityTier;
use super::credit::{CreditAssessment, CreditCategory};
use super::features::BehavioralFeatures;
use super::ledger::LedgerTransaction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub business_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub industry: String,
    pub registration_number: String,
    pub tax_id: String,
    pub credit_score: Option<i32>,
    pub credit_category: Option<CreditCategory>,
    pub monthly_revenue: Option<u32>,
}

impl BusinessProfile {
    pub fn apply_assessment(&mut self, assessment: &CreditAssessment) {
        self.credit_score = Some(assessment.credit_score);
        self.credit_category = Some(assessment.credit_category);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderProduct {
    pub name: String,
    pub quantity: u32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub business_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub products: Vec<OrderProduct>,
    pub total_amount: BigDecimal,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    /// Statuses the generator draws from. `Cancelled` only arises from edits.
    pub const GENERATED: [InvoiceStatus; 4] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Sent,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
    ];

    /// Sent or overdue invoices still await payment.
    pub fn is_pending(&self) -> bool {
        matches!(self, InvoiceStatus::Sent | InvoiceStatus::Overdue)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: u32,
    pub rate: BigDecimal,
    pub amount: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub business_id: String,
    pub order_id: Option<String>,
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<InvoiceItem>,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub total: BigDecimal,
    pub status: InvoiceStatus,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Income,
    Expense,
}

/// Income or expense entry in the business's books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookkeepingTransaction {
    pub business_id: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub category: String,
    pub description: String,
    pub amount: BigDecimal,
    pub date: DateTime<Utc>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditProduct {
    BusinessLoan,
    CreditLine,
    EquipmentFinancing,
}

impl CreditProduct {
    pub const ALL: [CreditProduct; 3] = [
        CreditProduct::BusinessLoan,
        CreditProduct::CreditLine,
        CreditProduct::EquipmentFinancing,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditApplicationStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl CreditApplicationStatus {
    pub const ALL: [CreditApplicationStatus; 4] = [
        CreditApplicationStatus::Pending,
        CreditApplicationStatus::UnderReview,
        CreditApplicationStatus::Approved,
        CreditApplicationStatus::Rejected,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditApplication {
    pub business_id: String,
    #[serde(rename = "type")]
    pub product: CreditProduct,
    pub requested_amount: u32,
    pub purpose: String,
    pub status: CreditApplicationStatus,
    pub application_date: DateTime<Utc>,
}

/// A document as read back from the store, with its store-assigned id and stamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stored<T> {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: T,
}

/// Everything generated for one synthetic business.
///
/// The bookkeeping collections (`orders`, `invoices`, `bookkeeping`,
/// `credit_applications`) are sampled independently of `ledger`, so they do not
/// reflect the behaviour that produced `assessment`.
#[derive(Debug, Clone)]
pub struct SyntheticBusiness {
    pub index: usize,
    pub business_id: String,
    pub tier: QualityTier,
    pub profile: BusinessProfile,
    pub ledger: Vec<LedgerTransaction>,
    pub features: BehavioralFeatures,
    pub assessment: CreditAssessment,
    pub orders: Vec<Order>,
    pub invoices: Vec<Invoice>,
    pub bookkeeping: Vec<BookkeepingTransaction>,
    pub credit_applications: Vec<CreditApplication>,
}

impl SyntheticBusiness {
    pub fn business_id_for(index: usize) -> String {
        format!("BIZ{:05}", index)
    }

    /// Number of documents written besides the profile.
    pub fn related_document_count(&self) -> usize {
        self.orders.len()
            + self.invoices.len()
            + self.bookkeeping.len()
            + self.credit_applications.len()
    }

    /// Points every bookkeeping document at the id the store assigned to the profile.
    pub fn rebind_to(&mut self, store_id: &str) {
        for order in &mut self.orders {
            order.business_id = store_id.to_string();
        }
        for invoice in &mut self.invoices {
            invoice.business_id = store_id.to_string();
        }
        for txn in &mut self.bookkeeping {
            txn.business_id = store_id.to_string();
        }
        for application in &mut self.credit_applications {
            application.business_id = store_id.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_id_is_zero_padded() {
        assert_eq!(SyntheticBusiness::business_id_for(1), "BIZ00001");
        assert_eq!(SyntheticBusiness::business_id_for(42), "BIZ00042");
        assert_eq!(SyntheticBusiness::business_id_for(123456), "BIZ123456");
    }

    #[test]
    fn test_pending_invoice_statuses() {
        assert!(InvoiceStatus::Sent.is_pending());
        assert!(InvoiceStatus::Overdue.is_pending());
        assert!(!InvoiceStatus::Paid.is_pending());
        assert!(!InvoiceStatus::Draft.is_pending());
    }

    #[test]
    fn test_bookkeeping_document_shape() {
        let txn = BookkeepingTransaction {
            business_id: "abc".to_string(),
            entry_type: EntryType::Income,
            category: "Sales".to_string(),
            description: "Payment from Nicole Tan".to_string(),
            amount: BigDecimal::from(250),
            date: Utc::now(),
            reference: Some("REF-000001".to_string()),
        };
        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["type"], "income");
        assert_eq!(value["businessId"], "abc");
        assert!(value.get("entry_type").is_none());
    }

    #[test]
    fn test_stored_document_flattens_record() {
        let now = Utc::now();
        let stored = Stored {
            id: "doc-1".to_string(),
            created_at: now,
            updated_at: now,
            record: CreditApplication {
                business_id: "abc".to_string(),
                product: CreditProduct::CreditLine,
                requested_amount: 50_000,
                purpose: "Inventory financing".to_string(),
                status: CreditApplicationStatus::UnderReview,
                application_date: now,
            },
        };
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["id"], "doc-1");
        assert_eq!(value["type"], "credit_line");
        assert_eq!(value["status"], "under_review");
        assert_eq!(value["requestedAmount"], 50_000);
    }
}
