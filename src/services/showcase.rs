//! Dashboard analytics and live re-scoring of a stored business.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::scorer::CreditScorer;
use crate::domain::features::DEFAULT_CLEARANCE_DAYS;
use crate::domain::{
    money, BehavioralFeatures, BookkeepingTransaction, BusinessProfile, CreditApplication,
    CreditAssessment, EntryType, Invoice, Order, OrderStatus, Stored, ThresholdScheme,
};

/// Recency assumed for a business with no bookkeeping entries.
pub const NO_ACTIVITY_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardAnalytics {
    pub total_revenue: BigDecimal,
    pub total_expenses: BigDecimal,
    pub net_profit: BigDecimal,
    pub pending_invoices_count: usize,
    pub pending_amount: BigDecimal,
    pub orders_this_month: usize,
    pub total_orders: usize,
    pub total_invoices: usize,
    pub total_transactions: usize,
}

impl DashboardAnalytics {
    pub fn derive(
        orders: &[Stored<Order>],
        invoices: &[Stored<Invoice>],
        transactions: &[Stored<BookkeepingTransaction>],
        now: DateTime<Utc>,
    ) -> Self {
        let total_for = |entry_type: EntryType| {
            money::sum(
                transactions
                    .iter()
                    .filter(|t| t.record.entry_type == entry_type)
                    .map(|t| &t.record.amount),
            )
        };
        let total_revenue = total_for(EntryType::Income);
        let total_expenses = total_for(EntryType::Expense);
        let pending: Vec<&Invoice> = invoices
            .iter()
            .map(|i| &i.record)
            .filter(|i| i.status.is_pending())
            .collect();

        DashboardAnalytics {
            net_profit: &total_revenue - &total_expenses,
            total_revenue,
            total_expenses,
            pending_invoices_count: pending.len(),
            pending_amount: money::sum(pending.iter().map(|i| &i.total)),
            orders_this_month: orders
                .iter()
                .filter(|o| {
                    o.record.order_date.year() == now.year()
                        && o.record.order_date.month() == now.month()
                })
                .count(),
            total_orders: orders.len(),
            total_invoices: invoices.len(),
            total_transactions: transactions.len(),
        }
    }
}

/// Behavioural features re-derived from the stored bookkeeping collections.
///
/// Orders stand in for ledger records: customers are distinct order emails
/// and the amount is the sum of order totals. Recency comes from the newest
/// bookkeeping entry. Completion is the share of completed orders; clearance
/// is not observable here and takes the default.
pub fn live_features(
    orders: &[Stored<Order>],
    transactions: &[Stored<BookkeepingTransaction>],
    now: DateTime<Utc>,
) -> BehavioralFeatures {
    let customers = orders
        .iter()
        .map(|o| o.record.customer_email.as_str())
        .collect::<HashSet<_>>()
        .len();
    let order_count = orders.len();

    let days_since_last_transaction = transactions
        .iter()
        .map(|t| t.record.date)
        .max()
        .map(|last| (now - last).num_days().max(0))
        .unwrap_or(NO_ACTIVITY_DAYS);

    let (customer_stickiness, completion_rate) = if order_count == 0 {
        (0.0, 0.0)
    } else {
        let completed = orders
            .iter()
            .filter(|o| o.record.status == OrderStatus::Completed)
            .count();
        (
            1.0 - customers as f64 / order_count as f64,
            completed as f64 / order_count as f64,
        )
    };

    BehavioralFeatures {
        customer_number: customers as u32,
        customer_order: order_count as f64 / customers.max(1) as f64,
        amount: money::sum(orders.iter().map(|o| &o.record.total_amount)),
        days_since_last_transaction,
        customer_stickiness,
        transaction_count: order_count as u32,
        completion_rate,
        clearance_days: DEFAULT_CLEARANCE_DAYS,
    }
}

/// Everything the showcase page shows for one business.
#[derive(Debug, Clone, Serialize)]
pub struct ShowcaseDashboard {
    pub business_id: String,
    pub business_name: String,
    /// True when the preferred id was missing and the first stored business was used.
    pub fell_back: bool,
    pub profile: Option<Stored<BusinessProfile>>,
    pub orders: Vec<Stored<Order>>,
    pub invoices: Vec<Stored<Invoice>>,
    pub transactions: Vec<Stored<BookkeepingTransaction>>,
    pub credit_applications: Vec<Stored<CreditApplication>>,
    pub analytics: DashboardAnalytics,
    pub features: BehavioralFeatures,
    pub live_assessment: CreditAssessment,
    /// Stored profile score when present, otherwise the live score.
    pub displayed_score: i32,
    pub display_label: &'static str,
    pub display_range: String,
}

/// Loaded documents for one business, before derivation.
#[derive(Debug, Clone, Default)]
pub struct ShowcaseDocuments {
    pub profile: Option<Stored<BusinessProfile>>,
    pub orders: Vec<Stored<Order>>,
    pub invoices: Vec<Stored<Invoice>>,
    pub transactions: Vec<Stored<BookkeepingTransaction>>,
    pub credit_applications: Vec<Stored<CreditApplication>>,
}

impl ShowcaseDashboard {
    pub fn assemble(
        business_id: String,
        fell_back: bool,
        docs: ShowcaseDocuments,
        scorer: &CreditScorer,
        now: DateTime<Utc>,
    ) -> Self {
        let analytics = DashboardAnalytics::derive(&docs.orders, &docs.invoices, &docs.transactions, now);
        let features = live_features(&docs.orders, &docs.transactions, now);
        let live_assessment = scorer.assess_exact(&features);

        let displayed_score = docs
            .profile
            .as_ref()
            .and_then(|p| p.record.credit_score)
            .unwrap_or(live_assessment.credit_score);
        let display_category = ThresholdScheme::Display.categorize(displayed_score);

        ShowcaseDashboard {
            business_name: docs
                .profile
                .as_ref()
                .map(|p| p.record.business_name.clone())
                .unwrap_or_else(|| business_id.clone()),
            business_id,
            fell_back,
            profile: docs.profile,
            orders: docs.orders,
            invoices: docs.invoices,
            transactions: docs.transactions,
            credit_applications: docs.credit_applications,
            analytics,
            features,
            live_assessment,
            displayed_score,
            display_label: ThresholdScheme::Display.label(display_category),
            display_range: ThresholdScheme::Display.range(display_category),
        }
    }
}

impl fmt::Display for ShowcaseDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.analytics;
        writeln!(f, "{} ({})", self.business_name, self.business_id)?;
        writeln!(
            f,
            "  Credit score: {} [{} {}]",
            self.displayed_score, self.display_label, self.display_range
        )?;
        writeln!(
            f,
            "  Live score:   {} ({})",
            self.live_assessment.credit_score, self.live_assessment.credit_category
        )?;
        writeln!(
            f,
            "  Revenue {} / Expenses {} / Net {}",
            a.total_revenue, a.total_expenses, a.net_profit
        )?;
        writeln!(
            f,
            "  Pending invoices: {} totalling {}",
            a.pending_invoices_count, a.pending_amount
        )?;
        writeln!(
            f,
            "  Orders: {} ({} this month), invoices: {}, transactions: {}, credit applications: {}",
            a.total_orders,
            a.orders_this_month,
            a.total_invoices,
            a.total_transactions,
            self.credit_applications.len()
        )?;
        write!(
            f,
            "  Customers: {} ({:.2} orders each, stickiness {:.2}), last activity {} days ago",
            self.features.customer_number,
            self.features.customer_order,
            self.features.customer_stickiness,
            self.features.days_since_last_transaction
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InvoiceStatus, OrderProduct};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 20, 12, 0, 0).unwrap()
    }

    fn stored<T>(id: usize, record: T) -> Stored<T> {
        Stored {
            id: format!("doc-{}", id),
            created_at: now(),
            updated_at: now(),
            record,
        }
    }

    fn order(email: &str, total: i64, days_ago: i64, status: OrderStatus) -> Order {
        Order {
            business_id: "store-1".to_string(),
            customer_name: "Nicole Tan".to_string(),
            customer_email: email.to_string(),
            products: vec![OrderProduct {
                name: "Office Supplies".to_string(),
                quantity: 1,
                price: BigDecimal::from(total),
            }],
            total_amount: BigDecimal::from(total),
            status,
            order_date: now() - Duration::days(days_ago),
        }
    }

    fn entry(entry_type: EntryType, amount: i64, days_ago: i64) -> BookkeepingTransaction {
        BookkeepingTransaction {
            business_id: "store-1".to_string(),
            entry_type,
            category: "Sales".to_string(),
            description: "Payment from Raj Patel".to_string(),
            amount: BigDecimal::from(amount),
            date: now() - Duration::days(days_ago),
            reference: None,
        }
    }

    fn invoice(status: InvoiceStatus, total: i64) -> Invoice {
        Invoice {
            business_id: "store-1".to_string(),
            order_id: None,
            invoice_number: "INV-1-001".to_string(),
            customer_name: "Raj Patel".to_string(),
            customer_email: "raj.patel@gmail.com".to_string(),
            items: Vec::new(),
            subtotal: BigDecimal::from(total),
            tax: BigDecimal::from(0),
            total: BigDecimal::from(total),
            status,
            due_date: now(),
        }
    }

    #[test]
    fn test_analytics_totals() {
        let orders = vec![
            stored(1, order("a@gmail.com", 500, 3, OrderStatus::Completed)),
            stored(2, order("b@gmail.com", 300, 40, OrderStatus::Pending)),
        ];
        let invoices = vec![
            stored(3, invoice(InvoiceStatus::Sent, 200)),
            stored(4, invoice(InvoiceStatus::Overdue, 150)),
            stored(5, invoice(InvoiceStatus::Paid, 999)),
        ];
        let transactions = vec![
            stored(6, entry(EntryType::Income, 1000, 2)),
            stored(7, entry(EntryType::Income, 500, 5)),
            stored(8, entry(EntryType::Expense, 300, 1)),
        ];

        let a = DashboardAnalytics::derive(&orders, &invoices, &transactions, now());
        assert_eq!(a.total_revenue, BigDecimal::from(1500));
        assert_eq!(a.total_expenses, BigDecimal::from(300));
        assert_eq!(a.net_profit, BigDecimal::from(1200));
        assert_eq!(a.pending_invoices_count, 2);
        assert_eq!(a.pending_amount, BigDecimal::from(350));
        assert_eq!(a.orders_this_month, 1);
        assert_eq!(a.total_orders, 2);
        assert_eq!(a.total_invoices, 3);
        assert_eq!(a.total_transactions, 3);
    }

    #[test]
    fn test_live_features_from_orders() {
        let orders = vec![
            stored(1, order("a@gmail.com", 500, 3, OrderStatus::Completed)),
            stored(2, order("a@gmail.com", 250, 9, OrderStatus::Completed)),
            stored(3, order("b@gmail.com", 250, 20, OrderStatus::Cancelled)),
            stored(4, order("c@gmail.com", 1000, 30, OrderStatus::Pending)),
        ];
        let transactions = vec![
            stored(5, entry(EntryType::Income, 100, 12)),
            stored(6, entry(EntryType::Expense, 100, 7)),
        ];
        let features = live_features(&orders, &transactions, now());
        assert_eq!(features.customer_number, 3);
        assert!((features.customer_order - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(features.amount, BigDecimal::from(2000));
        assert_eq!(features.days_since_last_transaction, 7);
        assert_eq!(features.customer_stickiness, 0.25);
        assert_eq!(features.completion_rate, 0.5);
    }

    #[test]
    fn test_live_features_without_activity() {
        let features = live_features(&[], &[], now());
        assert_eq!(features.customer_number, 0);
        assert_eq!(features.customer_order, 0.0);
        assert_eq!(features.customer_stickiness, 0.0);
        assert_eq!(features.days_since_last_transaction, NO_ACTIVITY_DAYS);
    }

    #[test]
    fn test_dashboard_prefers_stored_score() {
        let mut profile = BusinessProfile {
            business_name: "Food & Beverage Central".to_string(),
            email: "admin@business9.com".to_string(),
            phone: "+60123123456".to_string(),
            address: "1 Business Street, 50100 Kuala Lumpur, Malaysia".to_string(),
            industry: "Food & Beverage".to_string(),
            registration_number: "202012345678".to_string(),
            tax_id: "C12345678901".to_string(),
            credit_score: None,
            credit_category: None,
            monthly_revenue: Some(40_000),
        };
        let docs = ShowcaseDocuments {
            profile: Some(stored(1, profile.clone())),
            orders: vec![stored(2, order("a@gmail.com", 800, 2, OrderStatus::Completed))],
            ..ShowcaseDocuments::default()
        };
        let live = ShowcaseDashboard::assemble("doc-1".to_string(), false, docs.clone(), &CreditScorer::live(), now());
        assert_eq!(live.displayed_score, live.live_assessment.credit_score);
        assert_eq!(live.business_name, "Food & Beverage Central");

        profile.credit_score = Some(755);
        let docs = ShowcaseDocuments {
            profile: Some(stored(1, profile)),
            ..docs
        };
        let dashboard = ShowcaseDashboard::assemble("doc-1".to_string(), false, docs, &CreditScorer::live(), now());
        assert_eq!(dashboard.displayed_score, 755);
        assert_eq!(dashboard.display_label, "Excellent");
        assert_eq!(dashboard.display_range, "750 - 900");
        assert!(dashboard.to_string().contains("Credit score: 755 [Excellent 750 - 900]"));
    }
}
