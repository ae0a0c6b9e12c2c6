//! Framework-agnostic entities for synthetic businesses, their ledgers and
//! the credit assessments derived from them.

pub mod archetype;
pub mod business;
pub mod credit;
pub mod export;
pub mod features;
pub mod ledger;
pub mod money;

pub use archetype::{BusinessArchetype, QualityTier};
pub use business::{
    BookkeepingTransaction, BusinessProfile, CreditApplication, CreditApplicationStatus,
    CreditProduct, EntryType, Invoice, InvoiceItem, InvoiceStatus, Order, OrderProduct,
    OrderStatus, Stored, SyntheticBusiness,
};
pub use credit::{CreditAssessment, CreditCategory, ThresholdScheme};
pub use export::AiExportRecord;
pub use features::BehavioralFeatures;
pub use ledger::{CustomerType, LedgerTransaction, PaymentStatus};
