//! Assembles one complete synthetic business.

use bigdecimal::BigDecimal;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

use super::catalog::Catalog;
use super::features;
use super::ledger::LedgerGenerator;
use super::random::RandomValues;
use super::scorer::CreditScorer;
use crate::domain::{
    money, BookkeepingTransaction, BusinessProfile, CreditApplication, CreditApplicationStatus,
    CreditProduct, EntryType, Invoice, InvoiceItem, InvoiceStatus, Order, OrderProduct,
    OrderStatus, SyntheticBusiness,
};
use crate::error::{AppError, AppResult};

/// Sales tax applied to invoice subtotals, in percent.
const INVOICE_TAX_PERCENT: i64 = 6;
const INCOME_PROBABILITY: f64 = 0.7;

/// Inclusive collection sizes.
const ORDERS_PER_BUSINESS: (i64, i64) = (3, 8);
const INVOICES_PER_BUSINESS: (i64, i64) = (3, 6);
const BOOKKEEPING_PER_BUSINESS: (i64, i64) = (10, 20);
const APPLICATIONS_PER_BUSINESS: (i64, i64) = (1, 3);

/// Builds [`SyntheticBusiness`] aggregates from a shared catalog.
#[derive(Clone)]
pub struct BusinessBuilder {
    catalog: Arc<Catalog>,
    scorer: CreditScorer,
}

impl BusinessBuilder {
    pub fn new(catalog: Arc<Catalog>, scorer: CreditScorer) -> AppResult<Self> {
        catalog.validate()?;
        Ok(Self { catalog, scorer })
    }

    /// Standard catalog with synthetic scoring noise.
    pub fn standard() -> AppResult<Self> {
        Self::new(Arc::new(Catalog::default()), CreditScorer::synthetic())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Builds the business at 1-based `index`. Pure apart from the draws on `rv`.
    pub fn build<R: Rng>(&self, index: usize, rv: &mut RandomValues<R>) -> AppResult<SyntheticBusiness> {
        if index == 0 {
            return Err(AppError::invalid("business index is 1-based"));
        }
        let business_id = SyntheticBusiness::business_id_for(index);
        let archetype = rv.choice(&self.catalog.archetypes)?.clone();

        let mut profile = self.profile(index, rv)?;

        let transaction_count = LedgerGenerator::transaction_count(rv)?;
        let ledger = LedgerGenerator::new(&self.catalog).generate(
            &business_id,
            &archetype,
            transaction_count,
            rv,
        )?;
        let features = features::aggregate_at(&ledger, rv.anchor());
        let assessment = self.scorer.assess(&features, rv);
        profile.apply_assessment(&assessment);

        let orders = self.orders(&business_id, rv)?;
        let invoices = self.invoices(&business_id, index, rv)?;
        let bookkeeping = self.bookkeeping(&business_id, rv)?;
        let credit_applications = self.credit_applications(&business_id, rv)?;

        debug!(
            business_id = %business_id,
            tier = %archetype.tier,
            credit_score = assessment.credit_score,
            category = %assessment.credit_category,
            "built synthetic business"
        );

        Ok(SyntheticBusiness {
            index,
            business_id,
            tier: archetype.tier,
            profile,
            ledger,
            features,
            assessment,
            orders,
            invoices,
            bookkeeping,
            credit_applications,
        })
    }

    /// Builds businesses `1..=count` in index order.
    pub fn build_population<R: Rng>(
        &self,
        count: usize,
        rv: &mut RandomValues<R>,
    ) -> AppResult<Vec<SyntheticBusiness>> {
        (1..=count).map(|index| self.build(index, rv)).collect()
    }

    fn profile<R: Rng>(&self, index: usize, rv: &mut RandomValues<R>) -> AppResult<BusinessProfile> {
        let street = rv.uniform_int(1, 999)?;
        let postcode = rv.uniform_int(10_000, 99_999)?;
        Ok(BusinessProfile {
            business_name: self.catalog.business_name_for(index)?.to_string(),
            email: format!("admin@business{}.com", index),
            phone: rv.phone()?,
            address: format!(
                "{} Business Street, {} Kuala Lumpur, Malaysia",
                street, postcode
            ),
            industry: rv.choice(&self.catalog.industries)?.clone(),
            registration_number: rv.registration_number()?,
            tax_id: rv.tax_id()?,
            credit_score: None,
            credit_category: None,
            monthly_revenue: Some(rv.uniform_int(20_000, 100_000)? as u32),
        })
    }

    fn orders<R: Rng>(&self, business_id: &str, rv: &mut RandomValues<R>) -> AppResult<Vec<Order>> {
        let count = rv.uniform_int(ORDERS_PER_BUSINESS.0, ORDERS_PER_BUSINESS.1)?;
        let mut orders = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let customer_name = rv.choice(&self.catalog.customer_names)?.clone();
            let customer_email = rv.email_for(&customer_name)?;

            let product_count = rv.uniform_int(1, 4)?;
            let mut products = Vec::with_capacity(product_count as usize);
            for _ in 0..product_count {
                products.push(OrderProduct {
                    name: rv.choice(&self.catalog.product_categories)?.clone(),
                    quantity: rv.uniform_int(1, 5)? as u32,
                    price: money::from_f64(rv.uniform_float(50.0, 1000.0)),
                });
            }
            let total_amount = products
                .iter()
                .fold(money::zero(), |acc, p| acc + &p.price * BigDecimal::from(p.quantity));

            orders.push(Order {
                business_id: business_id.to_string(),
                customer_name,
                customer_email,
                products,
                total_amount,
                status: *rv.choice(&OrderStatus::ALL)?,
                order_date: rv.date_in_range(180, 1)?,
            });
        }
        Ok(orders)
    }

    fn invoices<R: Rng>(
        &self,
        business_id: &str,
        index: usize,
        rv: &mut RandomValues<R>,
    ) -> AppResult<Vec<Invoice>> {
        let count = rv.uniform_int(INVOICES_PER_BUSINESS.0, INVOICES_PER_BUSINESS.1)?;
        let mut invoices = Vec::with_capacity(count as usize);
        for i in 0..count {
            let customer_name = rv.choice(&self.catalog.customer_names)?.clone();
            let customer_email = rv.email_for(&customer_name)?;

            let item_count = rv.uniform_int(1, 3)?;
            let mut items = Vec::with_capacity(item_count as usize);
            for _ in 0..item_count {
                let quantity = rv.uniform_int(1, 3)? as u32;
                let rate = money::from_f64(rv.uniform_float(100.0, 500.0));
                items.push(InvoiceItem {
                    description: rv.choice(&self.catalog.product_categories)?.clone(),
                    quantity,
                    amount: &rate * BigDecimal::from(quantity),
                    rate,
                });
            }
            let subtotal = money::sum(items.iter().map(|item| &item.amount));
            let tax = invoice_tax(&subtotal);
            let total = &subtotal + &tax;

            invoices.push(Invoice {
                business_id: business_id.to_string(),
                order_id: None,
                invoice_number: format!("INV-{}-{:03}", index, i + 1),
                customer_name,
                customer_email,
                items,
                subtotal,
                tax,
                total,
                status: *rv.choice(&InvoiceStatus::GENERATED)?,
                due_date: rv.date_in_range(30, -30)?,
            });
        }
        Ok(invoices)
    }

    fn bookkeeping<R: Rng>(
        &self,
        business_id: &str,
        rv: &mut RandomValues<R>,
    ) -> AppResult<Vec<BookkeepingTransaction>> {
        let count = rv.uniform_int(BOOKKEEPING_PER_BUSINESS.0, BOOKKEEPING_PER_BUSINESS.1)?;
        let mut entries = Vec::with_capacity(count as usize);
        for i in 0..count {
            let (entry_type, categories, preposition) = if rv.chance(INCOME_PROBABILITY) {
                (EntryType::Income, &self.catalog.income_categories, "from")
            } else {
                (EntryType::Expense, &self.catalog.expense_categories, "to")
            };
            let category = rv.choice(categories)?.clone();
            let counterparty = rv.choice(&self.catalog.customer_names)?;

            entries.push(BookkeepingTransaction {
                business_id: business_id.to_string(),
                entry_type,
                category,
                description: format!("Payment {} {}", preposition, counterparty),
                amount: money::from_f64(rv.uniform_float(100.0, 5000.0)),
                date: rv.date_in_range(90, 1)?,
                reference: Some(format!("REF-{:06}", i + 1)),
            });
        }
        Ok(entries)
    }

    fn credit_applications<R: Rng>(
        &self,
        business_id: &str,
        rv: &mut RandomValues<R>,
    ) -> AppResult<Vec<CreditApplication>> {
        let count = rv.uniform_int(APPLICATIONS_PER_BUSINESS.0, APPLICATIONS_PER_BUSINESS.1)?;
        let mut applications = Vec::with_capacity(count as usize);
        for _ in 0..count {
            applications.push(CreditApplication {
                business_id: business_id.to_string(),
                product: *rv.choice(&CreditProduct::ALL)?,
                requested_amount: rv.uniform_int(10_000, 100_000)? as u32,
                purpose: rv.choice(&self.catalog.credit_purposes)?.clone(),
                status: *rv.choice(&CreditApplicationStatus::ALL)?,
                application_date: rv.date_in_range(60, 1)?,
            });
        }
        Ok(applications)
    }
}

fn invoice_tax(subtotal: &BigDecimal) -> BigDecimal {
    let tax = subtotal * BigDecimal::from(INVOICE_TAX_PERCENT) / BigDecimal::from(100);
    tax.with_scale(2)
}
