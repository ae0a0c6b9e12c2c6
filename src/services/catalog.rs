//! Static tables the generators draw names, categories and behaviour from.

use crate::domain::{BusinessArchetype, QualityTier};
use crate::error::{AppError, AppResult};

/// Immutable generator input. `Catalog::default()` is the standard demo set;
/// tests may substitute smaller tables.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub business_names: Vec<String>,
    pub industries: Vec<String>,
    pub customer_names: Vec<String>,
    pub product_categories: Vec<String>,
    pub payment_methods: Vec<String>,
    pub income_categories: Vec<String>,
    pub expense_categories: Vec<String>,
    pub credit_purposes: Vec<String>,
    pub archetypes: Vec<BusinessArchetype>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            business_names: owned(&[
                "TechCorp Solutions Sdn Bhd",
                "Global Trading Enterprise",
                "Digital Innovation Hub",
                "Manufacturing Excellence Ltd",
                "Healthcare Plus Services",
                "Financial Advisory Group",
                "Retail Master Chain",
                "Construction Elite Co",
                "Food & Beverage Central",
                "Logistics Pro Network",
            ]),
            industries: owned(&[
                "Technology",
                "Healthcare",
                "Finance",
                "Retail",
                "Manufacturing",
                "Construction",
                "Hospitality",
                "Wholesale",
                "Food & Beverage",
                "Logistics",
            ]),
            customer_names: owned(&[
                "Ahmad Zulkifli",
                "Siti Nurhaliza",
                "Raj Patel",
                "Li Wei Chen",
                "Sarah Thompson",
                "Michael Johnson",
                "Priya Sharma",
                "David Lee",
                "Maria Santos",
                "James Wilson",
                "Fatimah Abdullah",
                "Kumar Rajan",
                "Nicole Tan",
                "Robert Kim",
                "Aisha Mohamed",
                "Carlos Rodriguez",
            ]),
            product_categories: owned(&[
                "Software Licenses",
                "Hardware Equipment",
                "Consulting Services",
                "Marketing Services",
                "Office Supplies",
                "Raw Materials",
                "Finished Goods",
                "Professional Services",
                "Maintenance Services",
                "Training Programs",
                "Digital Solutions",
                "Security Systems",
            ]),
            payment_methods: owned(&["Bank Transfer", "Credit Card", "Check", "Digital Wallet"]),
            income_categories: owned(&["Sales", "Services", "Investment", "Other Income"]),
            expense_categories: owned(&[
                "Office Supplies",
                "Marketing",
                "Utilities",
                "Travel",
                "Equipment",
            ]),
            credit_purposes: owned(&[
                "Working capital and cash flow management",
                "Equipment purchase and upgrade",
                "Business expansion and growth",
                "Inventory financing",
                "Technology infrastructure improvement",
            ]),
            archetypes: QualityTier::ALL
                .iter()
                .map(|tier| BusinessArchetype::standard(*tier))
                .collect(),
        }
    }
}

impl Catalog {
    /// Rejects tables the generators cannot draw from.
    pub fn validate(&self) -> AppResult<()> {
        let tables: [(&str, usize); 8] = [
            ("business_names", self.business_names.len()),
            ("industries", self.industries.len()),
            ("customer_names", self.customer_names.len()),
            ("product_categories", self.product_categories.len()),
            ("payment_methods", self.payment_methods.len()),
            ("income_categories", self.income_categories.len()),
            ("expense_categories", self.expense_categories.len()),
            ("credit_purposes", self.credit_purposes.len()),
        ];
        if let Some((name, _)) = tables.iter().find(|(_, len)| *len == 0) {
            return Err(AppError::invalid(format!("catalog table {} is empty", name)));
        }
        if self.archetypes.is_empty() {
            return Err(AppError::invalid("catalog has no archetypes"));
        }
        for archetype in &self.archetypes {
            archetype
                .validate()
                .map_err(|e| AppError::invalid(format!("archetype {}: {}", archetype.tier, e)))?;
        }
        Ok(())
    }

    /// Name for the business at a 1-based index, cycling through the table.
    pub fn business_name_for(&self, index: usize) -> AppResult<&str> {
        if self.business_names.is_empty() {
            return Err(AppError::invalid("catalog table business_names is empty"));
        }
        Ok(&self.business_names[index % self.business_names.len()])
    }
}
