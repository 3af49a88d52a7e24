//! Display formatting for report values

/// Whole dollars, absolute value, thousands separators: `$1,234`.
/// Non-finite input renders as `$0`.
pub fn currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }
    format!("${}", group_thousands(amount.abs().round() as u64))
}

/// One decimal place: `7.5%`
pub fn percent(value: f64) -> String {
    if !value.is_finite() {
        return "0.0%".to_string();
    }
    format!("{:.1}%", value)
}

/// Two decimal places, used for DSCR
pub fn ratio(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_string();
    }
    format!("{:.2}", value)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(currency(0.0), "$0");
        assert_eq!(currency(999.49), "$999");
        assert_eq!(currency(1_234.5), "$1,235");
        assert_eq!(currency(-63_869.04), "$63,869");
        assert_eq!(currency(1_000_000.0), "$1,000,000");
        assert_eq!(currency(f64::NAN), "$0");
    }

    #[test]
    fn test_percent_and_ratio() {
        assert_eq!(percent(7.5), "7.5%");
        assert_eq!(percent(-12.345), "-12.3%");
        assert_eq!(percent(f64::INFINITY), "0.0%");
        assert_eq!(ratio(1.2345), "1.23");
    }
}
