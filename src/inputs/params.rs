//! Typed projection parameters
//!
//! These are the already-coerced values the engine works with. Wire input
//! arrives as a [`super::ReportRequest`] and is converted with
//! [`super::ReportRequest::into_input`].

use serde::{Deserialize, Serialize};

use super::lenient;

/// Vacancy rate used when the input is missing or unparseable (percent)
pub const DEFAULT_VACANCY_RATE_PCT: f64 = 10.0;

/// Blended operating expense ratio used in percentage mode when unparseable (percent of EGI)
pub const DEFAULT_OPERATING_EXPENSE_PCT: f64 = 45.0;

/// Interest-only period used when none is supplied
pub const DEFAULT_INTEREST_ONLY_YEARS: u32 = 10;

/// Amortization term used when the input is missing or unparseable
pub const DEFAULT_AMORTIZATION_YEARS: u32 = 30;

/// Holding period used when the input is missing, unparseable or zero
pub const DEFAULT_HOLDING_PERIOD_YEARS: u32 = 10;

/// Longest holding period accepted; longer inputs are clamped to it
pub const MAX_HOLDING_PERIOD_YEARS: u32 = 50;

/// Purchase terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Acquisition {
    pub purchase_price: f64,
    /// Down payment as a percentage of purchase price
    pub down_payment_pct: f64,
    /// Closing costs as a percentage of purchase price
    pub closing_costs_pct: f64,
}

impl Acquisition {
    pub fn down_payment(&self) -> f64 {
        self.purchase_price * (self.down_payment_pct / 100.0)
    }

    pub fn closing_costs(&self) -> f64 {
        self.purchase_price * (self.closing_costs_pct / 100.0)
    }

    pub fn loan_amount(&self) -> f64 {
        self.purchase_price - self.down_payment()
    }

    /// Cash the buyer brings to closing (down payment plus closing costs)
    pub fn total_initial_investment(&self) -> f64 {
        self.down_payment() + self.closing_costs()
    }
}

/// Repayment structure of the first-lien loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanStructure {
    /// Fixed payment covering interest and principal
    #[default]
    Amortizing,
    /// Payment covers interest only; principal is never reduced by scheduled payments
    InterestOnly,
}

impl LoanStructure {
    /// Parse the wire spelling (`amortizing` / `interest-only`), case-insensitive
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "amortizing" | "amortising" => Some(LoanStructure::Amortizing),
            "interest-only" | "interest_only" | "interestonly" | "io" => {
                Some(LoanStructure::InterestOnly)
            }
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStructure::Amortizing => "Amortizing",
            LoanStructure::InterestOnly => "Interest-Only",
        }
    }
}

/// Loan terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Financing {
    /// Annual interest rate in percent (7.0 = 7%)
    pub interest_rate_pct: f64,
    pub amortization_years: u32,
    pub structure: LoanStructure,
    /// Length of the interest-only period. Informational for the report;
    /// an interest-only loan never amortizes inside the projection horizon.
    pub interest_only_years: u32,
}

/// Rental and ancillary income
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub units: u32,
    pub avg_monthly_rent_per_unit: f64,
    pub vacancy_rate_pct: f64,
    pub rental_growth_pct: f64,
    pub other_income_annual: f64,
    pub income_reductions_annual: f64,
}

impl Income {
    /// Year-1 gross potential rent
    pub fn gross_potential_rent(&self) -> f64 {
        f64::from(self.units) * self.avg_monthly_rent_per_unit * 12.0
    }
}

/// The nine itemized annual operating expense figures
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemizedExpenses {
    pub property_taxes: f64,
    pub insurance: f64,
    pub maintenance_repairs: f64,
    pub utilities: f64,
    pub contract_services: f64,
    pub payroll: f64,
    pub marketing: f64,
    pub general_admin: f64,
    pub other: f64,
}

impl ItemizedExpenses {
    /// Every line multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            property_taxes: self.property_taxes * factor,
            insurance: self.insurance * factor,
            maintenance_repairs: self.maintenance_repairs * factor,
            utilities: self.utilities * factor,
            contract_services: self.contract_services * factor,
            payroll: self.payroll * factor,
            marketing: self.marketing * factor,
            general_admin: self.general_admin * factor,
            other: self.other * factor,
        }
    }

    pub fn total(&self) -> f64 {
        self.property_taxes
            + self.insurance
            + self.maintenance_repairs
            + self.utilities
            + self.contract_services
            + self.payroll
            + self.marketing
            + self.general_admin
            + self.other
    }
}

/// How operating expenses are modeled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExpenseModel {
    /// Nine itemized lines plus a management fee on EGI
    Itemized(ItemizedExpenses),
    /// A single blended percentage of EGI covering every line, management included
    Percentage { operating_expense_pct: f64 },
}

/// Operating expense assumptions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Expenses {
    pub model: ExpenseModel,
    /// Property management fee as a percentage of EGI (itemized mode only)
    pub management_fee_pct: f64,
    /// Annual growth applied to every expense line
    pub growth_pct: f64,
}

/// Capital reserves and exit assumptions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capital {
    pub reserve_per_unit_annual: f64,
    pub holding_period_years: u32,
    /// Exit cap rate in percent. Only feeds the informational disposition value.
    pub disposition_cap_rate_pct: Option<f64>,
}

/// Pre-calculated metrics that replace the computed value for that metric only.
///
/// Percent-valued metrics are in percent (7.5 = 7.5%), DSCR is a ratio and the
/// rest are dollar amounts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricOverrides {
    #[serde(default, deserialize_with = "lenient::number")]
    pub cash_on_cash_return: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cap_rate: Option<f64>,
    #[serde(default, rename = "debtServiceCoverageRatio", deserialize_with = "lenient::number")]
    pub dscr: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub expense_ratio: Option<f64>,
    #[serde(default, rename = "projectedIRR", deserialize_with = "lenient::number")]
    pub projected_irr: Option<f64>,
    #[serde(default, rename = "totalROI", deserialize_with = "lenient::number")]
    pub total_roi: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub projected_equity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub net_operating_income: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cash_flow_before_tax: Option<f64>,
}

impl MetricOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Everything one projection run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub acquisition: Acquisition,
    pub financing: Financing,
    pub income: Income,
    pub expenses: Expenses,
    pub capital: Capital,
    pub overrides: MetricOverrides,
}

impl ProjectionParams {
    /// Holding period the summary step consults, within `1..=MAX_HOLDING_PERIOD_YEARS`
    pub fn holding_period_years(&self) -> u32 {
        self.capital
            .holding_period_years
            .clamp(1, MAX_HOLDING_PERIOD_YEARS)
    }

    /// Annual capital reserve contribution across all units
    pub fn annual_capital_reserve(&self) -> f64 {
        self.capital.reserve_per_unit_annual * f64::from(self.income.units)
    }
}

/// Optional street address printed under the report title
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl PropertyAddress {
    /// Non-empty parts joined with ", ", or None when nothing was given
    pub fn display_line(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.street, &self.city, &self.state]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Optional contact details and title printed on the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportBranding {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub report_title: Option<String>,
}
