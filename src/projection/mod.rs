//! Ten-year after-tax cash flow projection

pub mod amortization;
mod engine;
pub mod irr;
mod summary;
pub mod tax;
mod yearly;

pub use amortization::{amortizing_payment, LoanState, LoanTerms, YearSplit};
pub use engine::{CashFlowProjector, ProjectionConfig, ProjectionResult};
pub use summary::{exit_loan_balance, summarize, MetricValues, SummaryMetrics};
pub use tax::TaxRates;
pub use yearly::{
    project_year, project_years, ExpenseBreakdown, ExpenseLine, YearlyProjection,
    PROJECTION_YEARS,
};
