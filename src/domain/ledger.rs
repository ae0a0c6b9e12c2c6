//! Ledger records used for behavioural feature derivation.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Days between an invoice and its due date.
pub const PAYMENT_TERMS_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerType {
    New,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Partial,
    Unpaid,
}

/// One synthetic invoice and its (possibly absent) payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    pub transaction_id: String,
    pub business_id: String,
    pub invoice_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub invoice_amount: BigDecimal,
    pub customer_email: String,
    pub customer_type: CustomerType,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_amount: BigDecimal,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub product_category: String,
}

impl LedgerTransaction {
    pub fn due_date_for(invoice_date: DateTime<Utc>) -> DateTime<Utc> {
        invoice_date + Duration::days(PAYMENT_TERMS_DAYS)
    }

    /// Whole days from invoice to payment, truncated. `None` when unpaid.
    pub fn clearance_days(&self) -> Option<i64> {
        self.payment_date
            .map(|paid_at| (paid_at - self.invoice_date).num_days())
    }

    /// Checks the payment fields agree with `payment_status`.
    pub fn check_payment_consistency(&self) -> Result<(), String> {
        let zero = BigDecimal::from(0);
        match self.payment_status {
            PaymentStatus::Paid => {
                if self.payment_date.is_none() {
                    return Err(format!("{}: paid without payment date", self.transaction_id));
                }
                if self.payment_amount != self.invoice_amount {
                    return Err(format!(
                        "{}: paid amount {} differs from invoice {}",
                        self.transaction_id, self.payment_amount, self.invoice_amount
                    ));
                }
            }
            PaymentStatus::Partial => {
                if self.payment_date.is_none() {
                    return Err(format!(
                        "{}: partial payment without payment date",
                        self.transaction_id
                    ));
                }
                if !(self.payment_amount > zero && self.payment_amount < self.invoice_amount) {
                    return Err(format!(
                        "{}: partial amount {} outside (0, {})",
                        self.transaction_id, self.payment_amount, self.invoice_amount
                    ));
                }
            }
            PaymentStatus::Unpaid => {
                if self.payment_date.is_some() || self.payment_method.is_some() {
                    return Err(format!(
                        "{}: unpaid record carries payment details",
                        self.transaction_id
                    ));
                }
                if self.payment_amount != zero {
                    return Err(format!(
                        "{}: unpaid record has amount {}",
                        self.transaction_id, self.payment_amount
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money;
    use chrono::TimeZone;

    fn sample(status: PaymentStatus, paid: f64) -> LedgerTransaction {
        let invoice_date = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        LedgerTransaction {
            transaction_id: "TXN00000001".to_string(),
            business_id: "BIZ00001".to_string(),
            invoice_date,
            due_date: LedgerTransaction::due_date_for(invoice_date),
            invoice_amount: money::from_f64(500.0),
            customer_email: "raj.patel@gmail.com".to_string(),
            customer_type: CustomerType::New,
            payment_date: match status {
                PaymentStatus::Unpaid => None,
                _ => Some(invoice_date + Duration::hours(60)),
            },
            payment_amount: money::from_f64(paid),
            payment_status: status,
            payment_method: match status {
                PaymentStatus::Unpaid => None,
                _ => Some("Check".to_string()),
            },
            product_category: "Office Supplies".to_string(),
        }
    }

    #[test]
    fn test_due_date_is_thirty_days_later() {
        let txn = sample(PaymentStatus::Paid, 500.0);
        assert_eq!((txn.due_date - txn.invoice_date).num_days(), 30);
    }

    #[test]
    fn test_clearance_days_truncates() {
        let txn = sample(PaymentStatus::Paid, 500.0);
        assert_eq!(txn.clearance_days(), Some(2));
        assert_eq!(sample(PaymentStatus::Unpaid, 0.0).clearance_days(), None);
    }

    #[test]
    fn test_payment_consistency() {
        assert!(sample(PaymentStatus::Paid, 500.0).check_payment_consistency().is_ok());
        assert!(sample(PaymentStatus::Paid, 499.0).check_payment_consistency().is_err());
        assert!(sample(PaymentStatus::Partial, 250.0).check_payment_consistency().is_ok());
        assert!(sample(PaymentStatus::Partial, 500.0).check_payment_consistency().is_err());
        assert!(sample(PaymentStatus::Unpaid, 0.0).check_payment_consistency().is_ok());
        assert!(sample(PaymentStatus::Unpaid, 1.0).check_payment_consistency().is_err());
    }

    #[test]
    fn test_status_serializes_capitalized() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Partial).unwrap(),
            "\"Partial\""
        );
        assert_eq!(
            serde_json::to_string(&CustomerType::Repeat).unwrap(),
            "\"Repeat\""
        );
    }
}
