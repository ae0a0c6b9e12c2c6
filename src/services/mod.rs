pub mod builder;
pub mod catalog;
pub mod features;
pub mod ledger;
pub mod random;
pub mod report;
pub mod scorer;
pub mod screening;
pub mod showcase;

pub use builder::BusinessBuilder;
pub use catalog::Catalog;
pub use ledger::LedgerGenerator;
pub use random::RandomValues;
pub use report::ScoringReport;
pub use scorer::{CreditScorer, Noise, ScoreBreakdown};
pub use screening::{FilterOutcome, Prediction, PredictionRow};
pub use showcase::{DashboardAnalytics, ShowcaseDashboard, ShowcaseDocuments};
