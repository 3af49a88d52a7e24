//! Ten-year operating projection
//!
//! Income and expenses compound independently from year 1 (factor 1.0).
//! The loan balance is threaded explicitly through the years so each record
//! carries the exact interest deduction for that year.

use serde::{Deserialize, Serialize};

use super::amortization::{LoanState, LoanTerms};
use super::engine::ProjectionConfig;
use super::tax;
use crate::inputs::{ExpenseModel, ItemizedExpenses, ProjectionParams};

/// Fixed projection horizon. The summary step consults a subset of these
/// records based on the holding period; the series itself is always ten long.
pub const PROJECTION_YEARS: u32 = 10;

/// One displayable operating expense line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseLine {
    PropertyTaxes,
    Insurance,
    PropertyManagement,
    MaintenanceRepairs,
    Utilities,
    ContractServices,
    Payroll,
    Marketing,
    GeneralAdmin,
    Other,
}

impl ExpenseLine {
    /// Report order
    pub const ALL: [ExpenseLine; 10] = [
        ExpenseLine::PropertyTaxes,
        ExpenseLine::Insurance,
        ExpenseLine::PropertyManagement,
        ExpenseLine::MaintenanceRepairs,
        ExpenseLine::Utilities,
        ExpenseLine::ContractServices,
        ExpenseLine::Payroll,
        ExpenseLine::Marketing,
        ExpenseLine::GeneralAdmin,
        ExpenseLine::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseLine::PropertyTaxes => "Property Taxes",
            ExpenseLine::Insurance => "Insurance",
            ExpenseLine::PropertyManagement => "Property Management",
            ExpenseLine::MaintenanceRepairs => "Maintenance & Repairs",
            ExpenseLine::Utilities => "Utilities",
            ExpenseLine::ContractServices => "Contract Services",
            ExpenseLine::Payroll => "Payroll",
            ExpenseLine::Marketing => "Marketing",
            ExpenseLine::GeneralAdmin => "General & Administrative",
            ExpenseLine::Other => "Other Expenses",
        }
    }
}

/// Operating expenses for one year, shaped by the expense model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExpenseBreakdown {
    Itemized {
        lines: ItemizedExpenses,
        property_management: f64,
    },
    /// Only a total is known; every individual line reads as zero
    Blended { total: f64 },
}

impl ExpenseBreakdown {
    /// Amount for a single line; zero for blended expenses
    pub fn line(&self, line: ExpenseLine) -> f64 {
        let (lines, management) = match self {
            ExpenseBreakdown::Itemized {
                lines,
                property_management,
            } => (lines, *property_management),
            ExpenseBreakdown::Blended { .. } => return 0.0,
        };
        match line {
            ExpenseLine::PropertyTaxes => lines.property_taxes,
            ExpenseLine::Insurance => lines.insurance,
            ExpenseLine::PropertyManagement => management,
            ExpenseLine::MaintenanceRepairs => lines.maintenance_repairs,
            ExpenseLine::Utilities => lines.utilities,
            ExpenseLine::ContractServices => lines.contract_services,
            ExpenseLine::Payroll => lines.payroll,
            ExpenseLine::Marketing => lines.marketing,
            ExpenseLine::GeneralAdmin => lines.general_admin,
            ExpenseLine::Other => lines.other,
        }
    }

    pub fn total(&self) -> f64 {
        match self {
            ExpenseBreakdown::Itemized {
                lines,
                property_management,
            } => lines.total() + property_management,
            ExpenseBreakdown::Blended { total } => *total,
        }
    }
}

/// One year of the projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjection {
    pub year: u32,

    // Income
    pub gross_rental_income: f64,
    pub vacancy_credit_loss: f64,
    /// Other income net of income reductions
    pub other_income: f64,
    pub effective_gross_income: f64,

    // Expenses
    pub expenses: ExpenseBreakdown,
    pub total_operating_expenses: f64,
    pub net_operating_income: f64,

    // Financing
    pub debt_service: f64,
    pub cash_flow_before_tax: f64,
    pub interest_deduction: f64,
    pub principal_payment: f64,
    pub ending_loan_balance: f64,

    // Tax
    pub depreciation: f64,
    pub taxable_income: f64,
    pub tax_liability: f64,
    pub cash_flow_after_tax: f64,
}

impl YearlyProjection {
    /// Gross rent less vacancy and credit loss
    pub fn effective_rental_income(&self) -> f64 {
        self.gross_rental_income - self.vacancy_credit_loss
    }
}

fn growth_factor(rate_pct: f64, year: u32) -> f64 {
    (1.0 + rate_pct / 100.0).powi(year as i32 - 1)
}

fn operating_expenses(params: &ProjectionParams, egi: f64, expense_factor: f64) -> ExpenseBreakdown {
    match params.expenses.model {
        ExpenseModel::Itemized(items) => ExpenseBreakdown::Itemized {
            lines: items.scaled(expense_factor),
            // Tracks income, so not grown by the expense growth rate
            property_management: egi * (params.expenses.management_fee_pct / 100.0),
        },
        ExpenseModel::Percentage {
            operating_expense_pct,
        } => ExpenseBreakdown::Blended {
            total: egi * (operating_expense_pct / 100.0) * expense_factor,
        },
    }
}

/// Compute a single year given the loan state at the start of that year.
/// Returns the record and the loan state for the next year.
pub fn project_year(
    params: &ProjectionParams,
    loan: &LoanTerms,
    state: LoanState,
    year: u32,
    config: &ProjectionConfig,
) -> (YearlyProjection, LoanState) {
    let income_factor = growth_factor(params.income.rental_growth_pct, year);
    let expense_factor = growth_factor(params.expenses.growth_pct, year);

    let gross_rental_income = params.income.gross_potential_rent() * income_factor;
    let vacancy_credit_loss = gross_rental_income * (params.income.vacancy_rate_pct / 100.0);
    let other_income = (params.income.other_income_annual - params.income.income_reductions_annual)
        * income_factor;
    let effective_gross_income = gross_rental_income - vacancy_credit_loss + other_income;

    let expenses = operating_expenses(params, effective_gross_income, expense_factor);
    let total_operating_expenses = expenses.total();
    let net_operating_income = effective_gross_income - total_operating_expenses;

    let debt_service = loan.annual_debt_service();
    let cash_flow_before_tax = net_operating_income - debt_service;

    let (split, next_state) = loan.advance_year(state);

    let depreciation =
        tax::annual_depreciation(params.acquisition.purchase_price, config.depreciation_years);
    let taxable_income = tax::taxable_income(net_operating_income, split.interest, depreciation);
    let tax_liability = config.tax_rates.liability(taxable_income);
    let cash_flow_after_tax = cash_flow_before_tax - tax_liability;

    let record = YearlyProjection {
        year,
        gross_rental_income,
        vacancy_credit_loss,
        other_income,
        effective_gross_income,
        expenses,
        total_operating_expenses,
        net_operating_income,
        debt_service,
        cash_flow_before_tax,
        interest_deduction: split.interest,
        principal_payment: split.principal,
        ending_loan_balance: split.ending_balance,
        depreciation,
        taxable_income,
        tax_liability,
        cash_flow_after_tax,
    };
    (record, next_state)
}

/// Produce exactly [`PROJECTION_YEARS`] records in year order
pub fn project_years(
    params: &ProjectionParams,
    loan: &LoanTerms,
    config: &ProjectionConfig,
) -> Vec<YearlyProjection> {
    let mut state = loan.initial_state();
    let mut years = Vec::with_capacity(PROJECTION_YEARS as usize);

    for year in 1..=PROJECTION_YEARS {
        let (record, next) = project_year(params, loan, state, year, config);
        years.push(record);
        state = next;
    }

    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::fixtures::sample_params;
    use crate::inputs::LoanStructure;
    use approx::assert_relative_eq;

    fn run(params: &ProjectionParams) -> Vec<YearlyProjection> {
        let loan = LoanTerms::new(
            params.acquisition.loan_amount(),
            params.financing.interest_rate_pct,
            params.financing.amortization_years,
            params.financing.structure,
        );
        project_years(params, &loan, &ProjectionConfig::default())
    }

    #[test]
    fn test_always_ten_years_in_order() {
        for holding in [1, 5, 15, 30] {
            let mut params = sample_params();
            params.capital.holding_period_years = holding;
            let years = run(&params);
            assert_eq!(years.len(), 10);
            assert!(years.iter().enumerate().all(|(i, y)| y.year == i as u32 + 1));
        }
    }

    #[test]
    fn test_income_and_noi_identities_hold_exactly() {
        let mut params = sample_params();
        for model in [
            params.expenses.model,
            ExpenseModel::Percentage {
                operating_expense_pct: 42.0,
            },
        ] {
            params.expenses.model = model;
            for y in run(&params) {
                assert_eq!(
                    y.effective_gross_income,
                    y.gross_rental_income - y.vacancy_credit_loss + y.other_income
                );
                assert_eq!(
                    y.net_operating_income,
                    y.effective_gross_income - y.total_operating_expenses
                );
                assert_eq!(y.cash_flow_before_tax, y.net_operating_income - y.debt_service);
                assert_eq!(y.cash_flow_after_tax, y.cash_flow_before_tax - y.tax_liability);
            }
        }
    }

    #[test]
    fn test_year_one_has_no_growth() {
        let years = run(&sample_params());
        let y1 = &years[0];
        assert_relative_eq!(y1.gross_rental_income, 144_000.0);
        assert_relative_eq!(y1.vacancy_credit_loss, 14_400.0);
        assert_relative_eq!(y1.effective_rental_income(), 129_600.0);
        assert_relative_eq!(y1.other_income, 5_000.0);

        let y2 = &years[1];
        assert_relative_eq!(y2.gross_rental_income, 144_000.0 * 1.03, epsilon = 1e-6);
        assert_relative_eq!(
            y2.expenses.line(ExpenseLine::PropertyTaxes),
            12_000.0 * 1.02,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_management_fee_tracks_income_not_expense_growth() {
        let years = run(&sample_params());
        for y in &years {
            assert_relative_eq!(
                y.expenses.line(ExpenseLine::PropertyManagement),
                y.effective_gross_income * 0.06,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_percentage_mode_year_one_total() {
        let mut params = sample_params();
        params.expenses.model = ExpenseModel::Percentage {
            operating_expense_pct: 45.0,
        };
        let years = run(&params);
        let y1 = &years[0];
        assert_relative_eq!(
            y1.total_operating_expenses,
            y1.effective_gross_income * 45.0 / 100.0,
            epsilon = 1e-9
        );
        for line in ExpenseLine::ALL {
            assert_eq!(y1.expenses.line(line), 0.0);
        }
        // Blended total compounds with the expense growth rate on top of EGI growth
        let y3 = &years[2];
        assert_relative_eq!(
            y3.total_operating_expenses,
            y3.effective_gross_income * 0.45 * 1.02_f64.powi(2),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_taxable_income_never_negative() {
        let mut params = sample_params();
        // Thin income against a large depreciation base
        params.income.avg_monthly_rent_per_unit = 400.0;
        for y in run(&params) {
            assert!(y.taxable_income >= 0.0);
            assert!(y.interest_deduction + y.depreciation > y.net_operating_income);
            assert_eq!(y.tax_liability, 0.0);
        }
    }

    #[test]
    fn test_tax_liability_uses_combined_rate() {
        let mut params = sample_params();
        params.financing.interest_rate_pct = 0.0;
        params.acquisition.down_payment_pct = 100.0;
        let years = run(&params);
        let y1 = &years[0];
        let expected_taxable = y1.net_operating_income - 1_000_000.0 / 27.5;
        assert_relative_eq!(y1.taxable_income, expected_taxable, epsilon = 1e-6);
        assert_relative_eq!(y1.tax_liability, expected_taxable * 0.338, epsilon = 1e-6);
    }

    #[test]
    fn test_interest_only_years_have_no_principal() {
        let mut params = sample_params();
        params.financing.structure = LoanStructure::InterestOnly;
        for y in run(&params) {
            assert_eq!(y.principal_payment, 0.0);
            assert_relative_eq!(y.ending_loan_balance, 800_000.0);
            assert_relative_eq!(y.interest_deduction, 56_000.0, epsilon = 1e-6);
        }
    }
}
