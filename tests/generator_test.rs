use bizgen_core::domain::{AiExportRecord, PaymentStatus, ThresholdScheme};
use bizgen_core::services::{BusinessBuilder, RandomValues};
use chrono::{TimeZone, Utc};

#[test]
fn test_generated_population_properties() {
    let builder = BusinessBuilder::standard().unwrap();
    let anchor = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();

    for seed in 0..20u64 {
        let mut rv = RandomValues::seeded(seed).with_anchor(anchor);
        let population = builder.build_population(8, &mut rv).unwrap();
        assert_eq!(population.len(), 8);

        for business in &population {
            let features = &business.features;
            assert!(features.transaction_count >= 5);
            assert_eq!(features.transaction_count as usize, business.ledger.len());
            assert!(features.customer_number >= 1);
            assert!(features.customer_number <= features.transaction_count);
            assert!((0.0..=1.0).contains(&features.customer_stickiness));
            assert!((0.0..=1.0).contains(&features.completion_rate));
            assert!(features.days_since_last_transaction >= 0);
            assert!(features.clearance_days >= 0.0);

            let score = business.assessment.credit_score;
            assert!((300..=900).contains(&score), "score {} out of range", score);
            assert_eq!(
                business.assessment.credit_category,
                ThresholdScheme::Standard.categorize(score)
            );
            assert_eq!(business.profile.credit_score, Some(score));

            for txn in &business.ledger {
                txn.check_payment_consistency().unwrap();
                assert!(txn.invoice_date <= anchor);
                if let Some(paid_at) = txn.payment_date {
                    assert!(paid_at >= txn.invoice_date);
                }
                if txn.payment_status == PaymentStatus::Unpaid {
                    assert!(txn.payment_method.is_none());
                }
            }
        }
    }
}

#[test]
fn test_export_record_mirrors_business() {
    let builder = BusinessBuilder::standard().unwrap();
    let mut rv = RandomValues::seeded(21);
    let business = builder.build(4, &mut rv).unwrap();

    let record = AiExportRecord::from(&business);
    assert_eq!(record.business_id, "BIZ00004");
    assert_eq!(record.business_name, business.profile.business_name);
    assert_eq!(record.industry, business.profile.industry);
    assert_eq!(record.features(), business.features);
    assert_eq!(record.credit_score, business.assessment.credit_score);
    assert_eq!(record.credit_category, business.assessment.credit_category);
    assert_eq!(record.transactions, business.ledger);
}
