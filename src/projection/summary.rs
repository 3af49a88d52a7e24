//! Investment summary metrics
//!
//! Every metric is computed from first principles first; caller-supplied
//! overrides are then applied one metric at a time, so the computed set
//! stays available next to the effective one.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::amortization::LoanTerms;
use super::engine::ProjectionConfig;
use super::irr;
use super::yearly::{YearlyProjection, PROJECTION_YEARS};
use crate::inputs::{MetricOverrides, ProjectionParams};

/// The nine headline metrics. Ratios expressed as percentages except DSCR.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricValues {
    pub expense_ratio: f64,
    pub cap_rate: f64,
    pub dscr: f64,
    pub cash_on_cash_return: f64,
    pub projected_equity: f64,
    /// Annualized return over the holding period
    pub projected_irr: f64,
    pub total_roi: f64,
    pub net_operating_income: f64,
    pub cash_flow_before_tax: f64,
}

impl MetricValues {
    /// Replace each metric that has an override, leaving the rest untouched
    pub fn with_overrides(&self, overrides: &MetricOverrides) -> Self {
        Self {
            expense_ratio: overrides.expense_ratio.unwrap_or(self.expense_ratio),
            cap_rate: overrides.cap_rate.unwrap_or(self.cap_rate),
            dscr: overrides.dscr.unwrap_or(self.dscr),
            cash_on_cash_return: overrides
                .cash_on_cash_return
                .unwrap_or(self.cash_on_cash_return),
            projected_equity: overrides.projected_equity.unwrap_or(self.projected_equity),
            projected_irr: overrides.projected_irr.unwrap_or(self.projected_irr),
            total_roi: overrides.total_roi.unwrap_or(self.total_roi),
            net_operating_income: overrides
                .net_operating_income
                .unwrap_or(self.net_operating_income),
            cash_flow_before_tax: overrides
                .cash_flow_before_tax
                .unwrap_or(self.cash_flow_before_tax),
        }
    }

    fn named(&self) -> [(&'static str, f64); 9] {
        [
            ("expense_ratio", self.expense_ratio),
            ("cap_rate", self.cap_rate),
            ("dscr", self.dscr),
            ("cash_on_cash_return", self.cash_on_cash_return),
            ("projected_equity", self.projected_equity),
            ("projected_irr", self.projected_irr),
            ("total_roi", self.total_roi),
            ("net_operating_income", self.net_operating_income),
            ("cash_flow_before_tax", self.cash_flow_before_tax),
        ]
    }
}

/// Summary of one projection run: acquisition figures, headline metrics and
/// the exit figures behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// Values computed from the projection alone
    pub computed: MetricValues,
    /// Values shown to the user: overrides where supplied, computed otherwise
    pub effective: MetricValues,

    pub holding_period_years: u32,

    // Acquisition and financing
    pub purchase_price: f64,
    pub down_payment: f64,
    pub closing_costs: f64,
    pub loan_amount: f64,
    pub interest_rate_pct: f64,
    pub monthly_payment: f64,
    pub annual_debt_service: f64,
    pub total_initial_investment: f64,
    pub annual_capital_reserve: f64,
    /// Share of closing costs deducted each year as loan costs
    pub amortized_loan_costs: f64,

    // Exit
    pub exit_loan_balance: f64,
    pub projected_property_value: f64,
    /// NOI in the exit year capitalized at the disposition cap rate
    pub disposition_value: Option<f64>,
    /// IRR of the equity flows (percent), when one exists
    pub levered_irr: Option<f64>,
    /// First year cumulative after-tax cash flow recovers the initial investment
    pub break_even_year: Option<u32>,
}

/// `numerator / denominator`, or 0 when the denominator is not positive
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Record for a holding-period year; years past the horizon reuse year 10
fn year_record(years: &[YearlyProjection], year: u32) -> &YearlyProjection {
    let index = (year.saturating_sub(1) as usize).min(years.len() - 1);
    &years[index]
}

/// Loan balance at exit: loan amount less principal paid through the
/// holding period, floored at zero. Each year past the projection pays the
/// last projected year's principal again.
pub fn exit_loan_balance(loan_amount: f64, years: &[YearlyProjection], holding_period: u32) -> f64 {
    let projected = (holding_period as usize).min(years.len());
    let mut paid: f64 = years[..projected].iter().map(|y| y.principal_payment).sum();
    if let Some(last) = years.last() {
        let extra_years = holding_period.saturating_sub(years.len() as u32);
        paid += f64::from(extra_years) * last.principal_payment;
    }
    (loan_amount - paid).max(0.0)
}

/// Compute the summary for a ten-year projection
pub fn summarize(
    params: &ProjectionParams,
    loan: &LoanTerms,
    years: &[YearlyProjection],
    config: &ProjectionConfig,
) -> SummaryMetrics {
    debug_assert_eq!(years.len(), PROJECTION_YEARS as usize);

    let holding = params.holding_period_years();
    if holding > PROJECTION_YEARS {
        warn!(
            "holding period of {} years exceeds the {}-year projection; year {} principal is reused for the remaining years",
            holding, PROJECTION_YEARS, PROJECTION_YEARS
        );
    }

    let acquisition = &params.acquisition;
    let purchase_price = acquisition.purchase_price;
    let initial_investment = acquisition.total_initial_investment();
    let annual_debt_service = loan.annual_debt_service();
    let year1 = &years[0];

    let exit_balance = exit_loan_balance(loan.loan_amount, years, holding);
    let projected_property_value =
        purchase_price * (1.0 + config.appreciation_rate).powf(f64::from(holding));
    let projected_equity = projected_property_value - exit_balance;

    let total_cash_flows: f64 = years.iter().map(|y| y.cash_flow_after_tax).sum();
    let total_return = total_cash_flows + projected_equity;

    let projected_irr = if initial_investment > 0.0 {
        let multiple = total_return / initial_investment;
        if multiple > 0.0 {
            (multiple.powf(1.0 / f64::from(holding)) - 1.0) * 100.0
        } else {
            // Nothing comes back: a total loss
            -100.0
        }
    } else {
        0.0
    };

    let computed = MetricValues {
        expense_ratio: ratio(year1.total_operating_expenses, year1.effective_gross_income) * 100.0,
        cap_rate: ratio(year1.net_operating_income, purchase_price) * 100.0,
        dscr: ratio(year1.net_operating_income, annual_debt_service),
        cash_on_cash_return: ratio(year1.cash_flow_after_tax, initial_investment) * 100.0,
        projected_equity,
        projected_irr,
        total_roi: ratio(total_return - initial_investment, initial_investment) * 100.0,
        net_operating_income: year1.net_operating_income,
        cash_flow_before_tax: year1.cash_flow_before_tax,
    };

    let effective = computed.with_overrides(&params.overrides);
    for ((name, computed_value), (_, effective_value)) in
        computed.named().into_iter().zip(effective.named())
    {
        if computed_value != effective_value {
            debug!(
                "{} overridden: computed {:.4}, using {:.4}",
                name, computed_value, effective_value
            );
        }
    }

    let exit_year = year_record(years, holding);
    let disposition_value = params
        .capital
        .disposition_cap_rate_pct
        .filter(|cap| *cap > 0.0)
        .map(|cap| exit_year.net_operating_income / (cap / 100.0));

    let amortized_loan_costs = if params.financing.amortization_years > 0 {
        acquisition.closing_costs() * config.loan_cost_share
            / f64::from(params.financing.amortization_years)
    } else {
        0.0
    };

    SummaryMetrics {
        computed,
        effective,
        holding_period_years: holding,
        purchase_price,
        down_payment: acquisition.down_payment(),
        closing_costs: acquisition.closing_costs(),
        loan_amount: loan.loan_amount,
        interest_rate_pct: params.financing.interest_rate_pct,
        monthly_payment: loan.monthly_payment,
        annual_debt_service,
        total_initial_investment: initial_investment,
        annual_capital_reserve: params.annual_capital_reserve(),
        amortized_loan_costs,
        exit_loan_balance: exit_balance,
        projected_property_value,
        disposition_value,
        levered_irr: levered_irr(years, holding, initial_investment, projected_equity),
        break_even_year: break_even_year(years, initial_investment),
    }
}

/// IRR of `[-initial, CFAT_1, ..., CFAT_H + equity]`, in percent
fn levered_irr(
    years: &[YearlyProjection],
    holding: u32,
    initial_investment: f64,
    projected_equity: f64,
) -> Option<f64> {
    if initial_investment <= 0.0 {
        return None;
    }
    let mut flows = Vec::with_capacity(holding as usize + 1);
    flows.push(-initial_investment);
    flows.extend((1..=holding).map(|year| year_record(years, year).cash_flow_after_tax));
    if let Some(last) = flows.last_mut() {
        *last += projected_equity;
    }
    irr::annual_irr(&flows).map(|rate| rate * 100.0)
}

fn break_even_year(years: &[YearlyProjection], initial_investment: f64) -> Option<u32> {
    let mut cumulative = -initial_investment;
    years.iter().find_map(|y| {
        cumulative += y.cash_flow_after_tax;
        (cumulative >= 0.0).then_some(y.year)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::fixtures::sample_params;
    use crate::projection::yearly::project_years;
    use approx::assert_relative_eq;

    fn summarize_params(params: &ProjectionParams) -> (Vec<YearlyProjection>, SummaryMetrics) {
        let config = ProjectionConfig::default();
        let loan = LoanTerms::new(
            params.acquisition.loan_amount(),
            params.financing.interest_rate_pct,
            params.financing.amortization_years,
            params.financing.structure,
        );
        let years = project_years(params, &loan, &config);
        let summary = summarize(params, &loan, &years, &config);
        (years, summary)
    }

    #[test]
    fn test_year_one_ratios() {
        let (years, summary) = summarize_params(&sample_params());
        let y1 = &years[0];
        let m = summary.computed;
        assert_relative_eq!(
            m.expense_ratio,
            y1.total_operating_expenses / y1.effective_gross_income * 100.0
        );
        assert_relative_eq!(m.cap_rate, y1.net_operating_income / 1_000_000.0 * 100.0);
        assert_relative_eq!(m.dscr, y1.net_operating_income / summary.annual_debt_service);
        assert_relative_eq!(m.cash_on_cash_return, y1.cash_flow_after_tax / 230_000.0 * 100.0);
        assert_eq!(m.net_operating_income, y1.net_operating_income);
        assert_eq!(m.cash_flow_before_tax, y1.cash_flow_before_tax);
        assert_eq!(summary.effective, summary.computed);
    }

    #[test]
    fn test_override_replaces_only_that_metric() {
        let mut params = sample_params();
        params.overrides.cap_rate = Some(7.5);
        params.overrides.projected_equity = Some(1.0);
        let (_, summary) = summarize_params(&params);

        assert_eq!(summary.effective.cap_rate, 7.5);
        assert_eq!(summary.effective.projected_equity, 1.0);
        assert_ne!(summary.computed.cap_rate, 7.5);
        assert_eq!(summary.effective.dscr, summary.computed.dscr);
        assert_eq!(summary.effective.projected_irr, summary.computed.projected_irr);
        assert_eq!(summary.effective.total_roi, summary.computed.total_roi);
    }

    #[test]
    fn test_zero_purchase_price_is_safe() {
        let mut params = sample_params();
        params.acquisition.purchase_price = 0.0;
        let (_, summary) = summarize_params(&params);
        let m = summary.computed;
        assert_eq!(m.cap_rate, 0.0);
        assert_eq!(m.cash_on_cash_return, 0.0);
        assert_eq!(m.projected_irr, 0.0);
        assert_eq!(m.total_roi, 0.0);
        assert_eq!(m.dscr, 0.0);
        assert!(m.expense_ratio.is_finite());
        assert_eq!(summary.levered_irr, None);
    }

    #[test]
    fn test_exit_balance_and_equity() {
        let mut params = sample_params();
        params.capital.holding_period_years = 5;
        let (years, summary) = summarize_params(&params);

        let paid: f64 = years[..5].iter().map(|y| y.principal_payment).sum();
        assert_relative_eq!(summary.exit_loan_balance, 800_000.0 - paid, epsilon = 1e-6);
        assert_relative_eq!(summary.exit_loan_balance, years[4].ending_loan_balance, epsilon = 1e-6);
        assert_relative_eq!(
            summary.projected_property_value,
            1_000_000.0 * 1.03_f64.powi(5),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            summary.computed.projected_equity,
            summary.projected_property_value - summary.exit_loan_balance,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_holding_beyond_ten_years_reuses_year_ten_principal() {
        let mut params = sample_params();
        params.capital.holding_period_years = 12;
        let (years, summary) = summarize_params(&params);

        let paid: f64 =
            years.iter().map(|y| y.principal_payment).sum::<f64>() + 2.0 * years[9].principal_payment;
        assert_relative_eq!(summary.exit_loan_balance, 800_000.0 - paid, epsilon = 1e-6);
        assert_eq!(summary.holding_period_years, 12);
    }

    #[test]
    fn test_huge_holding_period_is_bounded() {
        let mut params = sample_params();
        params.capital.holding_period_years = u32::MAX;
        let (years, summary) = summarize_params(&params);

        assert_eq!(summary.holding_period_years, crate::inputs::MAX_HOLDING_PERIOD_YEARS);
        assert!(summary.projected_property_value > 1_000_000.0);
        assert!(summary.projected_property_value.is_finite());
        assert!(summary.computed.projected_irr.is_finite());
        assert!(summary.levered_irr.map_or(true, f64::is_finite));

        let paid: f64 =
            years.iter().map(|y| y.principal_payment).sum::<f64>() + 40.0 * years[9].principal_payment;
        assert_relative_eq!(
            summary.exit_loan_balance,
            (800_000.0 - paid).max(0.0),
            epsilon = 1e-6
        );
        assert_eq!(exit_loan_balance(800_000.0, &years, u32::MAX), 0.0);
    }

    #[test]
    fn test_returns_use_full_series_cash_flow() {
        let (years, summary) = summarize_params(&sample_params());
        let total_cf: f64 = years.iter().map(|y| y.cash_flow_after_tax).sum();
        let total_return = total_cf + summary.computed.projected_equity;
        assert_relative_eq!(
            summary.computed.total_roi,
            (total_return - 230_000.0) / 230_000.0 * 100.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            summary.computed.projected_irr,
            ((total_return / 230_000.0).powf(0.1) - 1.0) * 100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_levered_irr_and_break_even() {
        let (_, summary) = summarize_params(&sample_params());
        let irr = summary.levered_irr.expect("levered IRR should exist");
        assert!(irr.is_finite());
        assert!(irr > -100.0);
        if let Some(year) = summary.break_even_year {
            assert!((1..=10).contains(&year));
        }
    }

    #[test]
    fn test_disposition_value() {
        let (years, summary) = summarize_params(&sample_params());
        let expected = years[9].net_operating_income / 0.065;
        assert_relative_eq!(summary.disposition_value.unwrap(), expected, epsilon = 1e-6);

        let mut params = sample_params();
        params.capital.disposition_cap_rate_pct = Some(0.0);
        let (_, summary) = summarize_params(&params);
        assert_eq!(summary.disposition_value, None);
    }

    #[test]
    fn test_amortized_loan_costs() {
        let (_, summary) = summarize_params(&sample_params());
        // 30k closing × 20% / 30 years
        assert_relative_eq!(summary.amortized_loan_costs, 200.0, epsilon = 1e-9);
    }
}
