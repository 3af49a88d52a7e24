//! First-lien loan schedule
//!
//! The payment is fixed at origination. Each projection year is simulated
//! month by month so the interest/principal split used for the tax
//! deduction is exact rather than a closed-form approximation.

use serde::{Deserialize, Serialize};

use crate::inputs::LoanStructure;

/// Fixed terms of the loan derived at origination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub loan_amount: f64,
    /// Annual rate as a decimal (0.07 for 7%)
    pub annual_rate: f64,
    pub monthly_rate: f64,
    /// Number of scheduled payments (amortization years × 12)
    pub payment_count: u32,
    pub structure: LoanStructure,
    pub monthly_payment: f64,
}

/// Remaining balance carried between projection years
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanState {
    pub remaining_balance: f64,
}

/// Interest and principal paid during one projection year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct YearSplit {
    pub interest: f64,
    pub principal: f64,
    /// Balance after the year's last payment
    pub ending_balance: f64,
}

/// Standard fixed-payment annuity: P * r(1+r)^n / ((1+r)^n - 1)
pub fn amortizing_payment(principal: f64, monthly_rate: f64, payment_count: u32) -> f64 {
    if payment_count == 0 {
        return 0.0;
    }
    if monthly_rate == 0.0 {
        // Interest-free: straight-line amortization
        return principal / f64::from(payment_count);
    }
    let compound = (1.0 + monthly_rate).powf(f64::from(payment_count));
    if !compound.is_finite() {
        // Term long enough that the payment converges to interest alone
        return principal * monthly_rate;
    }
    principal * (monthly_rate * compound) / (compound - 1.0)
}

impl LoanTerms {
    /// Derive loan terms from the loan amount and the rate in percent
    pub fn new(
        loan_amount: f64,
        interest_rate_pct: f64,
        amortization_years: u32,
        structure: LoanStructure,
    ) -> Self {
        let annual_rate = interest_rate_pct / 100.0;
        let monthly_rate = annual_rate / 12.0;
        let payment_count = amortization_years.saturating_mul(12);

        let monthly_payment = match structure {
            LoanStructure::InterestOnly => loan_amount * monthly_rate,
            LoanStructure::Amortizing => amortizing_payment(loan_amount, monthly_rate, payment_count),
        };

        Self {
            loan_amount,
            annual_rate,
            monthly_rate,
            payment_count,
            structure,
            monthly_payment,
        }
    }

    pub fn annual_debt_service(&self) -> f64 {
        self.monthly_payment * 12.0
    }

    /// State at origination
    pub fn initial_state(&self) -> LoanState {
        LoanState {
            remaining_balance: self.loan_amount,
        }
    }

    /// Run twelve monthly payments from `state` and return the year's split
    /// along with the state for the following year.
    pub fn advance_year(&self, state: LoanState) -> (YearSplit, LoanState) {
        match self.structure {
            LoanStructure::InterestOnly => {
                let split = YearSplit {
                    interest: state.remaining_balance * self.annual_rate,
                    principal: 0.0,
                    ending_balance: state.remaining_balance,
                };
                (split, state)
            }
            LoanStructure::Amortizing => self.advance_amortizing_year(state),
        }
    }

    fn advance_amortizing_year(&self, state: LoanState) -> (YearSplit, LoanState) {
        // No scheduled payment (zero term): nothing is paid and nothing accrues
        if self.monthly_payment <= 0.0 {
            let split = YearSplit {
                ending_balance: state.remaining_balance,
                ..YearSplit::default()
            };
            return (split, state);
        }

        let mut balance = state.remaining_balance.max(0.0);
        let mut interest_paid = 0.0;
        let mut principal_paid = 0.0;

        for _month in 1..=12 {
            if balance <= 0.0 {
                break;
            }
            let interest = balance * self.monthly_rate;
            // Final payment is capped at what is still owed
            let principal = (self.monthly_payment - interest).min(balance);

            interest_paid += interest;
            principal_paid += principal;
            balance = (balance - principal).max(0.0);
        }

        let split = YearSplit {
            interest: interest_paid,
            principal: principal_paid,
            ending_balance: balance,
        };
        (
            split,
            LoanState {
                remaining_balance: balance,
            },
        )
    }

    /// Year-by-year splits for the first `years` years, threading the balance
    /// state explicitly from one year to the next.
    pub fn schedule(&self, years: u32) -> Vec<YearSplit> {
        let (splits, _) = (0..years).fold(
            (Vec::with_capacity(years as usize), self.initial_state()),
            |(mut acc, state), _| {
                let (split, next) = self.advance_year(state);
                acc.push(split);
                (acc, next)
            },
        );
        splits
    }
}
