//! Internal rate of return on an equity cash flow series
//!
//! Newton-Raphson with a bisection fallback. Used for the levered IRR that
//! accompanies the annualized-return figure on the report.

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;
const MIN_RATE: f64 = -0.99;
const MAX_RATE: f64 = 10.0;

/// Annual IRR of yearly flows.
///
/// `cashflows[0]` is the initial (usually negative) flow. Returns `None` when
/// the series has no sign change or no root could be bracketed.
pub fn annual_irr(cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    if cashflows.iter().all(|cf| cf.abs() < 1e-10) {
        return Some(0.0);
    }

    // An IRR only exists when the series changes sign
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return None;
    }

    let mut rate = 0.10;
    for _ in 0..MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if dnpv.abs() < 1e-20 {
            return bisection(cashflows);
        }

        let next = (rate - npv / dnpv).clamp(MIN_RATE, MAX_RATE);
        if (next - rate).abs() < TOLERANCE {
            return Some(next);
        }
        rate = next;
    }

    bisection(cashflows)
}

/// NPV(r) = sum CF_t / (1+r)^t and d(NPV)/dr
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        npv += cf / (1.0 + rate).powi(t as i32);
        if t > 0 {
            dnpv -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (npv, dnpv)
}

fn npv_at(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

fn bisection(cashflows: &[f64]) -> Option<f64> {
    let mut low = MIN_RATE;
    let mut high = MAX_RATE;
    let mut npv_low = npv_at(cashflows, low);

    if npv_low * npv_at(cashflows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at(cashflows, mid);

        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}
