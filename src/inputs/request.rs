//! Wire-format report request
//!
//! Field names follow the camelCase contract used by the offer analyzer
//! front end. Every numeric field is decoded leniently and coerced to a
//! documented default at conversion time, so one malformed field never
//! aborts the whole computation.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::lenient;
use super::params::*;

/// Raw report request as received from a form, a JSON file or a CSV row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    // Property address
    #[serde(default)]
    pub property_street: Option<String>,
    #[serde(default)]
    pub property_city: Option<String>,
    #[serde(default)]
    pub property_state: Option<String>,

    // Acquisition
    #[serde(default, deserialize_with = "lenient::number")]
    pub purchase_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub down_payment_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub closing_costs_percentage: Option<f64>,

    // Financing
    #[serde(default, deserialize_with = "lenient::number")]
    pub interest_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amortization_period_years: Option<f64>,
    #[serde(default)]
    pub loan_structure: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub interest_only_period_years: Option<f64>,

    // Income
    #[serde(default, deserialize_with = "lenient::number")]
    pub num_units: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_monthly_rent_per_unit: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub vacancy_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub annual_rental_growth_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub other_income_annual: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub income_reductions_annual: Option<f64>,

    // Itemized operating expenses (annual)
    #[serde(default, deserialize_with = "lenient::number")]
    pub property_taxes: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub insurance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub property_management_fee_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub maintenance_repairs_annual: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub utilities_annual: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub contract_services_annual: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub payroll_annual: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub marketing_annual: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub g_and_a_annual: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub other_expenses_annual: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub expense_growth_rate: Option<f64>,

    // Percentage mode
    #[serde(default, deserialize_with = "lenient::flag")]
    pub use_percentage_mode: Option<bool>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub operating_expense_percentage: Option<f64>,

    // Capital and exit
    #[serde(default, deserialize_with = "lenient::number")]
    pub capital_reserve_per_unit_annual: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub holding_period_years: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub disposition_cap_rate: Option<f64>,

    // Branding
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_phone: Option<String>,
    #[serde(default)]
    pub report_title: Option<String>,

    #[serde(default)]
    pub pre_calculated_metrics: Option<MetricOverrides>,

    /// Return the artifact in memory instead of saving it
    #[serde(default, deserialize_with = "lenient::flag")]
    pub return_blob: Option<bool>,
}

/// A fully coerced request: projection parameters plus presentation extras
#[derive(Debug, Clone, PartialEq)]
pub struct ReportInput {
    pub params: ProjectionParams,
    pub address: PropertyAddress,
    pub branding: ReportBranding,
    pub return_in_memory: bool,
}

fn money(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

fn percent_or(value: Option<f64>, default: f64) -> f64 {
    value.unwrap_or(default)
}

/// Whole-number count; negative or missing values fall back to `default`
fn count_or(field: &str, value: Option<f64>, default: u32) -> u32 {
    match value {
        Some(v) if v >= 0.0 => v.round().min(f64::from(u32::MAX)) as u32,
        Some(v) => {
            warn!("{} = {} is negative, using {}", field, v, default);
            default
        }
        None => default,
    }
}

impl ReportRequest {
    /// Coerce every field to a usable value and build the typed input
    pub fn into_input(self) -> ReportInput {
        let structure = match self.loan_structure.as_deref() {
            None => LoanStructure::default(),
            Some(raw) => LoanStructure::parse(raw).unwrap_or_else(|| {
                warn!("unknown loan structure {:?}, treating as amortizing", raw);
                LoanStructure::Amortizing
            }),
        };

        let use_percentage_mode = self.use_percentage_mode.unwrap_or(false);
        let model = if use_percentage_mode {
            ExpenseModel::Percentage {
                operating_expense_pct: percent_or(
                    self.operating_expense_percentage,
                    DEFAULT_OPERATING_EXPENSE_PCT,
                ),
            }
        } else {
            ExpenseModel::Itemized(ItemizedExpenses {
                property_taxes: money(self.property_taxes),
                insurance: money(self.insurance),
                maintenance_repairs: money(self.maintenance_repairs_annual),
                utilities: money(self.utilities_annual),
                contract_services: money(self.contract_services_annual),
                payroll: money(self.payroll_annual),
                marketing: money(self.marketing_annual),
                general_admin: money(self.g_and_a_annual),
                other: money(self.other_expenses_annual),
            })
        };

        let mut holding_period_years = count_or(
            "holdingPeriodYears",
            self.holding_period_years,
            DEFAULT_HOLDING_PERIOD_YEARS,
        );
        if holding_period_years == 0 {
            warn!(
                "holding period of 0 years, using {}",
                DEFAULT_HOLDING_PERIOD_YEARS
            );
            holding_period_years = DEFAULT_HOLDING_PERIOD_YEARS;
        } else if holding_period_years > MAX_HOLDING_PERIOD_YEARS {
            warn!(
                "holding period of {} years exceeds the {}-year maximum, clamping",
                holding_period_years, MAX_HOLDING_PERIOD_YEARS
            );
            holding_period_years = MAX_HOLDING_PERIOD_YEARS;
        }

        let params = ProjectionParams {
            acquisition: Acquisition {
                purchase_price: money(self.purchase_price),
                down_payment_pct: percent_or(self.down_payment_percentage, 0.0),
                closing_costs_pct: percent_or(self.closing_costs_percentage, 0.0),
            },
            financing: Financing {
                interest_rate_pct: percent_or(self.interest_rate, 0.0).max(0.0),
                amortization_years: count_or(
                    "amortizationPeriodYears",
                    self.amortization_period_years,
                    DEFAULT_AMORTIZATION_YEARS,
                ),
                structure,
                interest_only_years: count_or(
                    "interestOnlyPeriodYears",
                    self.interest_only_period_years,
                    DEFAULT_INTEREST_ONLY_YEARS,
                ),
            },
            income: Income {
                units: count_or("numUnits", self.num_units, 0),
                avg_monthly_rent_per_unit: money(self.avg_monthly_rent_per_unit),
                vacancy_rate_pct: percent_or(self.vacancy_rate, DEFAULT_VACANCY_RATE_PCT),
                rental_growth_pct: percent_or(self.annual_rental_growth_rate, 0.0),
                other_income_annual: money(self.other_income_annual),
                income_reductions_annual: money(self.income_reductions_annual),
            },
            expenses: Expenses {
                model,
                management_fee_pct: percent_or(self.property_management_fee_percentage, 0.0),
                growth_pct: percent_or(self.expense_growth_rate, 0.0),
            },
            capital: Capital {
                reserve_per_unit_annual: money(self.capital_reserve_per_unit_annual),
                holding_period_years,
                disposition_cap_rate_pct: self.disposition_cap_rate,
            },
            overrides: self.pre_calculated_metrics.unwrap_or_default(),
        };
        debug!(
            "coerced request: price={} units={} structure={:?} percentage_mode={}",
            params.acquisition.purchase_price,
            params.income.units,
            params.financing.structure,
            use_percentage_mode
        );

        ReportInput {
            params,
            address: PropertyAddress {
                street: self.property_street,
                city: self.property_city,
                state: self.property_state,
            },
            branding: ReportBranding {
                user_name: self.user_name,
                user_email: self.user_email,
                user_phone: self.user_phone,
                report_title: self.report_title,
            },
            return_in_memory: self.return_blob.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn coerce(json: &str) -> ReportInput {
        serde_json::from_str::<ReportRequest>(json).unwrap().into_input()
    }

    #[test]
    fn test_full_request_round_trips_into_params() {
        let input = coerce(
            r#"{
                "propertyStreet": "123 Main St",
                "purchasePrice": 1000000,
                "downPaymentPercentage": 20,
                "closingCostsPercentage": 3,
                "interestRate": 7,
                "amortizationPeriodYears": 30,
                "loanStructure": "amortizing",
                "numUnits": 10,
                "avgMonthlyRentPerUnit": 1200,
                "vacancyRate": 10,
                "annualRentalGrowthRate": 3,
                "propertyTaxes": 12000,
                "gAndAAnnual": 900,
                "propertyManagementFeePercentage": 6,
                "capitalReservePerUnitAnnual": 250,
                "holdingPeriodYears": 7,
                "dispositionCapRate": 6.5,
                "preCalculatedMetrics": { "capRate": 7.5, "debtServiceCoverageRatio": "1.4" },
                "returnBlob": true
            }"#,
        );

        let p = &input.params;
        assert_relative_eq!(p.acquisition.purchase_price, 1_000_000.0);
        assert_eq!(p.financing.amortization_years, 30);
        assert_eq!(p.income.units, 10);
        assert_eq!(p.capital.holding_period_years, 7);
        assert_eq!(p.capital.disposition_cap_rate_pct, Some(6.5));
        match p.expenses.model {
            ExpenseModel::Itemized(items) => {
                assert_relative_eq!(items.property_taxes, 12_000.0);
                assert_relative_eq!(items.general_admin, 900.0);
            }
            ExpenseModel::Percentage { .. } => panic!("expected itemized mode"),
        }
        assert_eq!(p.overrides.cap_rate, Some(7.5));
        assert_eq!(p.overrides.dscr, Some(1.4));
        assert!(input.return_in_memory);
        assert_eq!(input.address.street.as_deref(), Some("123 Main St"));
    }

    #[test]
    fn test_malformed_fields_degrade_to_defaults() {
        let input = coerce(
            r#"{
                "purchasePrice": "not a number",
                "vacancyRate": "??",
                "amortizationPeriodYears": null,
                "holdingPeriodYears": 0,
                "numUnits": -4,
                "loanStructure": "balloon"
            }"#,
        );

        let p = &input.params;
        assert_relative_eq!(p.acquisition.purchase_price, 0.0);
        assert_relative_eq!(p.income.vacancy_rate_pct, DEFAULT_VACANCY_RATE_PCT);
        assert_eq!(p.financing.amortization_years, DEFAULT_AMORTIZATION_YEARS);
        assert_eq!(p.financing.interest_only_years, DEFAULT_INTEREST_ONLY_YEARS);
        assert_eq!(p.capital.holding_period_years, DEFAULT_HOLDING_PERIOD_YEARS);
        assert_eq!(p.income.units, 0);
        assert_eq!(p.financing.structure, LoanStructure::Amortizing);
        assert!(!input.return_in_memory);
    }

    #[test]
    fn test_oversized_holding_period_is_clamped() {
        let input = coerce(r#"{ "purchasePrice": 1000000, "downPaymentPercentage": 20, "holdingPeriodYears": 1e12 }"#);
        assert_eq!(input.params.capital.holding_period_years, MAX_HOLDING_PERIOD_YEARS);

        let result = crate::projection::CashFlowProjector::default().project(&input.params);
        assert_eq!(result.summary.holding_period_years, MAX_HOLDING_PERIOD_YEARS);
        assert!(result.summary.projected_property_value.is_finite());
        assert!(result.summary.exit_loan_balance >= 0.0);
    }

    #[test]
    fn test_percentage_mode_uses_default_ratio() {
        let input = coerce(r#"{ "usePercentageMode": "true", "operatingExpensePercentage": "abc" }"#);
        assert_eq!(
            input.params.expenses.model,
            ExpenseModel::Percentage {
                operating_expense_pct: DEFAULT_OPERATING_EXPENSE_PCT
            }
        );
    }

    #[test]
    fn test_interest_only_structure() {
        let input = coerce(r#"{ "loanStructure": "interest-only", "interestOnlyPeriodYears": 5 }"#);
        assert_eq!(input.params.financing.structure, LoanStructure::InterestOnly);
        assert_eq!(input.params.financing.interest_only_years, 5);
    }
}
