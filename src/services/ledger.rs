//! Ledger generation for one synthetic business.

use rand::Rng;
use tracing::debug;

use super::catalog::Catalog;
use super::random::{days, RandomValues};
use crate::domain::{
    money, BusinessArchetype, CustomerType, LedgerTransaction, PaymentStatus,
};
use crate::error::{AppError, AppResult};

/// Businesses with fewer ledger records are treated as low-activity downstream.
pub const MIN_TRANSACTIONS: u32 = 5;
/// Chance that a record reuses a customer already in the repeat pool.
pub const REPEAT_PROBABILITY: f64 = 0.3;
/// Chance that a paying customer settles the full invoice.
pub const FULL_PAYMENT_PROBABILITY: f64 = 0.95;
pub const INVOICE_FLOOR: f64 = 100.0;

const TYPICAL_TRANSACTIONS: (i64, i64) = (10, 40);
const PARTIAL_PAYMENT_SHARE: (f64, f64) = (0.3, 0.9);
const LEDGER_WINDOW_DAYS: (i64, i64) = (365, 1);

pub struct LedgerGenerator<'a> {
    catalog: &'a Catalog,
}

impl<'a> LedgerGenerator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Draws the ledger size: typically 10 to 40, never below [`MIN_TRANSACTIONS`].
    pub fn transaction_count<R: Rng>(rv: &mut RandomValues<R>) -> AppResult<u32> {
        let drawn = rv.uniform_int(TYPICAL_TRANSACTIONS.0, TYPICAL_TRANSACTIONS.1)?;
        Ok((drawn as u32).max(MIN_TRANSACTIONS))
    }

    /// Generates `transaction_count` records in generation order.
    pub fn generate<R: Rng>(
        &self,
        business_id: &str,
        archetype: &BusinessArchetype,
        transaction_count: u32,
        rv: &mut RandomValues<R>,
    ) -> AppResult<Vec<LedgerTransaction>> {
        if transaction_count == 0 {
            return Err(AppError::invalid("transaction_count must be positive"));
        }
        archetype
            .validate()
            .map_err(|e| AppError::invalid(format!("archetype {}: {}", archetype.tier, e)))?;

        let seed_customers = (transaction_count / 4).max(1);
        let mut repeat_pool = Vec::with_capacity(transaction_count as usize + seed_customers as usize);
        for _ in 0..seed_customers {
            repeat_pool.push(rv.email(&self.catalog.customer_names)?);
        }

        let mut ledger = Vec::with_capacity(transaction_count as usize);
        for i in 0..transaction_count {
            let is_repeat = i > 0 && rv.chance(REPEAT_PROBABILITY) && !repeat_pool.is_empty();
            let (customer_email, customer_type) = if is_repeat {
                (rv.choice(&repeat_pool)?.clone(), CustomerType::Repeat)
            } else {
                let email = rv.email(&self.catalog.customer_names)?;
                repeat_pool.push(email.clone());
                (email, CustomerType::New)
            };

            let invoice_date = rv.date_in_range(LEDGER_WINDOW_DAYS.0, LEDGER_WINDOW_DAYS.1)?;
            let invoice_amount =
                money::from_f64((rv.unit() * archetype.avg_amount * 2.0).max(INVOICE_FLOOR));

            let record = if rv.chance(archetype.payment_probability) {
                let delay = rv.uniform_float(0.0, archetype.avg_delay_days * 2.0);
                let (payment_status, payment_amount) = if rv.chance(FULL_PAYMENT_PROBABILITY) {
                    (PaymentStatus::Paid, invoice_amount.clone())
                } else {
                    let share = rv.uniform_float(PARTIAL_PAYMENT_SHARE.0, PARTIAL_PAYMENT_SHARE.1);
                    (
                        PaymentStatus::Partial,
                        money::from_f64(money::to_f64(&invoice_amount) * share),
                    )
                };
                let payment_method = rv.choice(&self.catalog.payment_methods)?.clone();

                LedgerTransaction {
                    transaction_id: transaction_id(i),
                    business_id: business_id.to_string(),
                    invoice_date,
                    due_date: LedgerTransaction::due_date_for(invoice_date),
                    invoice_amount,
                    customer_email,
                    customer_type,
                    payment_date: Some(invoice_date + days(delay)),
                    payment_amount,
                    payment_status,
                    payment_method: Some(payment_method),
                    product_category: rv.choice(&self.catalog.product_categories)?.clone(),
                }
            } else {
                LedgerTransaction {
                    transaction_id: transaction_id(i),
                    business_id: business_id.to_string(),
                    invoice_date,
                    due_date: LedgerTransaction::due_date_for(invoice_date),
                    invoice_amount,
                    customer_email,
                    customer_type,
                    payment_date: None,
                    payment_amount: money::zero(),
                    payment_status: PaymentStatus::Unpaid,
                    payment_method: None,
                    product_category: rv.choice(&self.catalog.product_categories)?.clone(),
                }
            };
            ledger.push(record);
        }

        debug!(
            business_id,
            tier = %archetype.tier,
            records = ledger.len(),
            "generated ledger"
        );
        Ok(ledger)
    }
}

fn transaction_id(i: u32) -> String {
    format!("TXN{:08}", i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QualityTier;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashSet;

    fn rv(seed: u64) -> RandomValues {
        RandomValues::seeded(seed).with_anchor(Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_transaction_count_floor() {
        let mut rv = rv(1);
        for _ in 0..200 {
            let count = LedgerGenerator::transaction_count(&mut rv).unwrap();
            assert!((MIN_TRANSACTIONS..=40).contains(&count));
            assert!(count >= 10);
        }
    }

    #[test]
    fn test_ledger_records_are_consistent() {
        let catalog = Catalog::default();
        let generator = LedgerGenerator::new(&catalog);
        let mut rv = rv(42);
        let anchor = rv.anchor();

        for tier in QualityTier::ALL {
            let archetype = BusinessArchetype::standard(tier);
            let ledger = generator.generate("BIZ00001", &archetype, 30, &mut rv).unwrap();
            assert_eq!(ledger.len(), 30);

            let ids: HashSet<&str> = ledger.iter().map(|t| t.transaction_id.as_str()).collect();
            assert_eq!(ids.len(), 30);

            for txn in &ledger {
                txn.check_payment_consistency().unwrap();
                assert!(txn.invoice_amount >= money::from_f64(INVOICE_FLOOR));
                assert!(txn.invoice_date >= anchor - Duration::days(365));
                assert!(txn.invoice_date <= anchor - Duration::days(1));
                assert_eq!(txn.due_date - txn.invoice_date, Duration::days(30));
                if let Some(paid_at) = txn.payment_date {
                    let delay = paid_at - txn.invoice_date;
                    assert!(delay >= Duration::zero());
                    assert!(delay <= Duration::days((archetype.avg_delay_days * 2.0) as i64 + 1));
                    assert!(catalog.payment_methods.contains(txn.payment_method.as_ref().unwrap()));
                }
                assert!(catalog.product_categories.contains(&txn.product_category));
            }
        }
    }

    #[test]
    fn test_first_record_is_always_new_customer() {
        let catalog = Catalog::default();
        let generator = LedgerGenerator::new(&catalog);
        for seed in 0..20 {
            let ledger = generator
                .generate("BIZ00002", &BusinessArchetype::standard(QualityTier::Good), 8, &mut rv(seed))
                .unwrap();
            assert_eq!(ledger[0].customer_type, CustomerType::New);
            assert_eq!(ledger[0].transaction_id, "TXN00000001");
        }
    }

    #[test]
    fn test_repeat_customers_come_from_pool() {
        let catalog = Catalog::default();
        let generator = LedgerGenerator::new(&catalog);
        let ledger = generator
            .generate("BIZ00003", &BusinessArchetype::standard(QualityTier::Fair), 40, &mut rv(9))
            .unwrap();
        assert!(ledger.iter().any(|t| t.customer_type == CustomerType::Repeat));
        assert!(ledger.iter().any(|t| t.customer_type == CustomerType::New));
    }

    #[test]
    fn test_single_payment_tier_always_pays() {
        let catalog = Catalog::default();
        let generator = LedgerGenerator::new(&catalog);
        let archetype = BusinessArchetype {
            payment_probability: 1.0,
            ..BusinessArchetype::standard(QualityTier::Excellent)
        };
        let ledger = generator.generate("BIZ00004", &archetype, 25, &mut rv(3)).unwrap();
        assert!(ledger
            .iter()
            .all(|t| t.payment_status != PaymentStatus::Unpaid));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let catalog = Catalog::default();
        let generator = LedgerGenerator::new(&catalog);
        let archetype = BusinessArchetype::standard(QualityTier::Poor);
        assert!(generator.generate("BIZ00005", &archetype, 0, &mut rv(1)).is_err());

        let broken = BusinessArchetype {
            avg_amount: -1.0,
            ..archetype
        };
        assert!(matches!(
            generator.generate("BIZ00005", &broken, 10, &mut rv(1)),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_same_seed_same_ledger() {
        let catalog = Catalog::default();
        let generator = LedgerGenerator::new(&catalog);
        let archetype = BusinessArchetype::standard(QualityTier::Good);
        let a = generator.generate("BIZ00006", &archetype, 12, &mut rv(77)).unwrap();
        let b = generator.generate("BIZ00006", &archetype, 12, &mut rv(77)).unwrap();
        assert_eq!(a, b);
    }
}
