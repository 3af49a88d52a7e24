//! Scenario runner for batch and sensitivity projections
//!
//! Every projection is a pure function of its parameters, so batches and
//! sweeps fan out across threads with no coordination.

use log::debug;
use rayon::prelude::*;

use crate::inputs::ProjectionParams;
use crate::projection::{CashFlowProjector, ProjectionConfig, ProjectionResult};

/// One input varied across a sensitivity sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepVariable {
    /// Annual interest rate, percent
    InterestRate,
    PurchasePrice,
    /// Vacancy rate, percent
    VacancyRate,
    /// Annual rent growth, percent
    RentalGrowth,
}

impl SweepVariable {
    pub fn apply(&self, params: &mut ProjectionParams, value: f64) {
        match self {
            SweepVariable::InterestRate => params.financing.interest_rate_pct = value,
            SweepVariable::PurchasePrice => params.acquisition.purchase_price = value,
            SweepVariable::VacancyRate => params.income.vacancy_rate_pct = value,
            SweepVariable::RentalGrowth => params.income.rental_growth_pct = value,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SweepVariable::InterestRate => "interest rate",
            SweepVariable::PurchasePrice => "purchase price",
            SweepVariable::VacancyRate => "vacancy rate",
            SweepVariable::RentalGrowth => "rental growth",
        }
    }
}

/// Result of one sweep point
#[derive(Debug, Clone)]
pub struct SweepPoint {
    pub value: f64,
    pub result: ProjectionResult,
}

/// Shared projector for many runs
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// for point in runner.sweep(&params, SweepVariable::InterestRate, &[5.0, 6.0, 7.0]) {
///     println!("{}: {:.2}", point.value, point.result.summary.effective.dscr);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    projector: CashFlowProjector,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProjectionConfig) -> Self {
        Self {
            projector: CashFlowProjector::new(config),
        }
    }

    pub fn run(&self, params: &ProjectionParams) -> ProjectionResult {
        self.projector.project(params)
    }

    /// Project many properties in parallel; output order matches input order
    pub fn run_batch(&self, batch: &[ProjectionParams]) -> Vec<ProjectionResult> {
        debug!("projecting batch of {} properties", batch.len());
        batch.par_iter().map(|p| self.projector.project(p)).collect()
    }

    /// Re-run one property with `variable` set to each of `values`
    pub fn sweep(
        &self,
        base: &ProjectionParams,
        variable: SweepVariable,
        values: &[f64],
    ) -> Vec<SweepPoint> {
        debug!("sweeping {} over {} values", variable.label(), values.len());
        values
            .par_iter()
            .map(|&value| {
                let mut params = base.clone();
                variable.apply(&mut params, value);
                SweepPoint {
                    value,
                    result: self.projector.project(&params),
                }
            })
            .collect()
    }

    pub fn projector(&self) -> &CashFlowProjector {
        &self.projector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::fixtures::sample_params;

    #[test]
    fn test_batch_preserves_order() {
        let runner = ScenarioRunner::new();
        let batch: Vec<_> = [500_000.0, 1_000_000.0, 2_000_000.0]
            .iter()
            .map(|&price| {
                let mut p = sample_params();
                p.acquisition.purchase_price = price;
                p
            })
            .collect();

        let results = runner.run_batch(&batch);
        assert_eq!(results.len(), 3);
        for (result, params) in results.iter().zip(&batch) {
            assert_eq!(result.summary.purchase_price, params.acquisition.purchase_price);
            assert_eq!(*result, runner.run(params));
        }
    }

    #[test]
    fn test_rate_sweep() {
        let runner = ScenarioRunner::new();
        let points = runner.sweep(&sample_params(), SweepVariable::InterestRate, &[5.0, 6.0, 7.0]);

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].value, 5.0);
        // Higher rates cost more debt service and lower coverage
        assert!(points[2].result.summary.annual_debt_service > points[0].result.summary.annual_debt_service);
        assert!(points[2].result.summary.computed.dscr < points[0].result.summary.computed.dscr);
    }

    #[test]
    fn test_vacancy_sweep() {
        let runner = ScenarioRunner::new();
        let points = runner.sweep(&sample_params(), SweepVariable::VacancyRate, &[0.0, 20.0]);
        assert_eq!(points[0].result.years[0].vacancy_credit_loss, 0.0);
        assert!(points[1].result.summary.computed.net_operating_income
            < points[0].result.summary.computed.net_operating_income);
    }
}
