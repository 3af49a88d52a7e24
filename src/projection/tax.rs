//! Fixed tax model: flat combined marginal rate and straight-line depreciation

use serde::{Deserialize, Serialize};

/// Residential rental recovery period in years
pub const RESIDENTIAL_DEPRECIATION_YEARS: f64 = 27.5;

/// Marginal rates applied to taxable rental income (decimals)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxRates {
    pub federal: f64,
    pub state: f64,
    /// Net investment income (Medicare) surtax
    pub medicare: f64,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            federal: 0.24,
            state: 0.06,
            medicare: 0.038,
        }
    }
}

impl TaxRates {
    pub fn combined(&self) -> f64 {
        self.federal + self.state + self.medicare
    }

    pub fn liability(&self, taxable_income: f64) -> f64 {
        taxable_income * self.combined()
    }
}

/// Annual straight-line depreciation on the full purchase price.
///
/// No land carve-out: land value is not available at report time.
pub fn annual_depreciation(purchase_price: f64, recovery_years: f64) -> f64 {
    if recovery_years <= 0.0 {
        return 0.0;
    }
    purchase_price / recovery_years
}

/// Taxable income floored at zero; losses are not carried forward
pub fn taxable_income(noi: f64, interest_deduction: f64, depreciation: f64) -> f64 {
    (noi - interest_deduction - depreciation).max(0.0)
}
