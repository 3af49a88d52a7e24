//! Cash flow projector: loan terms, ten-year series and summary in one call

use log::debug;
use serde::{Deserialize, Serialize};

use super::amortization::LoanTerms;
use super::summary::{summarize, SummaryMetrics};
use super::tax::{TaxRates, RESIDENTIAL_DEPRECIATION_YEARS};
use super::yearly::{project_years, YearlyProjection};
use crate::inputs::ProjectionParams;

/// Fixed modeling assumptions for a projection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    pub tax_rates: TaxRates,

    /// Straight-line recovery period for the building
    pub depreciation_years: f64,

    /// Annual property appreciation used for the terminal value (decimal)
    pub appreciation_rate: f64,

    /// Share of closing costs treated as financing costs amortized over the loan term
    pub loan_cost_share: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            tax_rates: TaxRates::default(),
            depreciation_years: RESIDENTIAL_DEPRECIATION_YEARS,
            appreciation_rate: 0.03,
            loan_cost_share: 0.20,
        }
    }
}

/// Complete projection output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub params: ProjectionParams,
    pub config: ProjectionConfig,
    pub loan: LoanTerms,
    /// Always ten records, year 1 first
    pub years: Vec<YearlyProjection>,
    pub summary: SummaryMetrics,
}

impl ProjectionResult {
    pub fn year_one(&self) -> &YearlyProjection {
        &self.years[0]
    }
}

/// Stateless projector. Each call is a pure function of its parameters, so a
/// single instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct CashFlowProjector {
    config: ProjectionConfig,
}

impl CashFlowProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the full projection for one property
    pub fn project(&self, params: &ProjectionParams) -> ProjectionResult {
        let loan = LoanTerms::new(
            params.acquisition.loan_amount(),
            params.financing.interest_rate_pct,
            params.financing.amortization_years,
            params.financing.structure,
        );
        debug!(
            "loan {:.2} at {}% ({:?}): monthly payment {:.2}",
            loan.loan_amount, params.financing.interest_rate_pct, loan.structure, loan.monthly_payment
        );

        let years = project_years(params, &loan, &self.config);
        let summary = summarize(params, &loan, &years, &self.config);

        ProjectionResult {
            params: params.clone(),
            config: self.config,
            loan,
            years,
            summary,
        }
    }
}
