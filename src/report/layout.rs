//! Canonical report layout shared by every output format
//!
//! All numbers come straight from the projection result; nothing here
//! recomputes a metric. Row values are signed (deductions negative) and the
//! renderers decide how to display them.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::format::{currency, percent, ratio};
use crate::inputs::{PropertyAddress, ReportBranding};
use crate::projection::{ExpenseLine, ProjectionResult, YearlyProjection};

pub const DEFAULT_REPORT_TITLE: &str = "10-Year After Tax Cash Flow Analysis";
pub const REPORT_SUBTITLE: &str = "Investment Property Analysis";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowStyle {
    pub bold: bool,
    pub underline: bool,
    pub blank_after: bool,
}

const PLAIN: RowStyle = RowStyle {
    bold: false,
    underline: false,
    blank_after: false,
};
const UNDERLINED: RowStyle = RowStyle {
    bold: false,
    underline: true,
    blank_after: false,
};
const TOTAL: RowStyle = RowStyle {
    bold: true,
    underline: false,
    blank_after: true,
};

/// One line item with a value per projection year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub label: String,
    pub values: Vec<f64>,
    pub style: RowStyle,
}

/// Label/value pair inside a summary box
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub label: String,
    pub value: String,
    pub emphasis: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearColumn {
    pub year: u32,
    pub calendar_year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLayout {
    pub title: String,
    pub subtitle: String,
    pub fiscal_year: String,
    pub property_line: Option<String>,
    pub prepared_by: Vec<String>,
    pub columns: Vec<YearColumn>,
    pub investment_summary: Vec<SummaryLine>,
    pub key_metrics: Vec<SummaryLine>,
    pub exit_summary: Vec<SummaryLine>,
    pub rows: Vec<ReportRow>,
}

fn line(label: impl Into<String>, value: String) -> SummaryLine {
    SummaryLine {
        label: label.into(),
        value,
        emphasis: false,
    }
}

fn emphasized(label: impl Into<String>, value: String) -> SummaryLine {
    SummaryLine {
        label: label.into(),
        value,
        emphasis: true,
    }
}

struct RowBuilder<'a> {
    years: &'a [YearlyProjection],
    rows: Vec<ReportRow>,
}

impl<'a> RowBuilder<'a> {
    fn push(&mut self, label: impl Into<String>, style: RowStyle, value: impl Fn(&YearlyProjection) -> f64) {
        self.rows.push(ReportRow {
            label: label.into(),
            values: self.years.iter().map(value).collect(),
            style,
        });
    }
}

impl ReportLayout {
    pub fn build(
        result: &ProjectionResult,
        address: &PropertyAddress,
        branding: &ReportBranding,
        report_date: NaiveDate,
    ) -> Self {
        let summary = &result.summary;
        let holding = summary.holding_period_years;

        let title = branding
            .report_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_REPORT_TITLE)
            .to_string();

        let prepared_by = [&branding.user_name, &branding.user_email, &branding.user_phone]
            .into_iter()
            .filter_map(|field| field.as_deref().map(str::trim))
            .filter(|field| !field.is_empty())
            .map(str::to_string)
            .collect();

        let columns = result
            .years
            .iter()
            .map(|y| YearColumn {
                year: y.year,
                calendar_year: report_date.year() + y.year as i32 - 1,
            })
            .collect();

        let investment_summary = vec![
            line("Purchase Price", currency(summary.purchase_price)),
            line(
                format!(
                    "Down Payment ({})",
                    percent(result.params.acquisition.down_payment_pct)
                ),
                currency(summary.down_payment),
            ),
            line("Acquisition Costs", currency(summary.closing_costs)),
            line("Loan Amount", currency(summary.loan_amount)),
            line("Interest Rate", percent(summary.interest_rate_pct)),
            line("Monthly Payment", currency(summary.monthly_payment)),
            emphasized("Total Initial Investment", currency(summary.total_initial_investment)),
        ];

        let m = &summary.effective;
        let key_metrics = vec![
            line("Expense Ratio (Year 1)", percent(m.expense_ratio)),
            line("Cap Rate (Year 1)", percent(m.cap_rate)),
            line("Debt Service Coverage Ratio", ratio(m.dscr)),
            line("Cash-on-Cash Return (Year 1)", percent(m.cash_on_cash_return)),
            line(format!("Annualized Return ({} Year)", holding), percent(m.projected_irr)),
            line(format!("Total ROI ({} Year)", holding), percent(m.total_roi)),
            emphasized(format!("Projected Equity (Year {})", holding), currency(m.projected_equity)),
        ];

        let mut exit_summary = vec![
            line(
                format!("Property Value (Year {})", holding),
                currency(summary.projected_property_value),
            ),
            line("Loan Balance at Exit", currency(summary.exit_loan_balance)),
            line(
                "Levered IRR",
                summary.levered_irr.map(percent).unwrap_or_else(|| "n/a".into()),
            ),
            line(
                "Break-even Year",
                summary
                    .break_even_year
                    .map(|y| format!("Year {}", y))
                    .unwrap_or_else(|| "Beyond Year 10".into()),
            ),
        ];
        if let Some(value) = summary.disposition_value {
            exit_summary.push(line("Disposition Value", currency(value)));
        }

        Self {
            title,
            subtitle: REPORT_SUBTITLE.to_string(),
            fiscal_year: format!("Fiscal Year Beginning {}", report_date.format("%B %Y")),
            property_line: address.display_line(),
            prepared_by,
            columns,
            investment_summary,
            key_metrics,
            exit_summary,
            rows: Self::rows(result),
        }
    }

    fn rows(result: &ProjectionResult) -> Vec<ReportRow> {
        let summary = &result.summary;
        let rates = result.config.tax_rates;
        let loan_costs = summary.amortized_loan_costs;
        let reserves = summary.annual_capital_reserve;

        let mut b = RowBuilder {
            years: &result.years,
            rows: Vec::with_capacity(36),
        };

        b.push("RENTAL INCOME", PLAIN, |y| y.gross_rental_income);
        b.push("Vacancy / Credit Loss", UNDERLINED, |y| -y.vacancy_credit_loss);
        b.push("EFFECTIVE RENTAL INCOME", TOTAL, |y| y.effective_rental_income());
        b.push("Other Income", UNDERLINED, |y| y.other_income);
        b.push("GROSS OPERATING INCOME", TOTAL, |y| y.effective_gross_income);

        for (i, expense) in ExpenseLine::ALL.iter().enumerate() {
            let style = if i + 1 == ExpenseLine::ALL.len() { UNDERLINED } else { PLAIN };
            b.push(expense.label(), style, |y| -y.expenses.line(*expense));
        }
        b.push("TOTAL OPERATING EXPENSES", TOTAL, |y| -y.total_operating_expenses);
        b.push("NET OPERATING INCOME", TOTAL, |y| y.net_operating_income);

        b.push("Depreciation", PLAIN, |y| -y.depreciation);
        b.push("1st Lien Interest Deduction", PLAIN, |y| -y.interest_deduction);
        b.push("Amortized Loan Costs", UNDERLINED, |_| -loan_costs);
        b.push("TOTAL TAX DEDUCTIONS", TOTAL, |y| {
            -(y.depreciation + y.interest_deduction + loan_costs)
        });
        b.push("TAXABLE INCOME", TOTAL, |y| y.taxable_income);
        b.push(
            format!("Federal Marginal Tax Rate {}", percent(rates.federal * 100.0)),
            PLAIN,
            |y| -y.taxable_income * rates.federal,
        );
        b.push(
            format!("Local Marginal Tax Rate {}", percent(rates.state * 100.0)),
            PLAIN,
            |y| -y.taxable_income * rates.state,
        );
        b.push(
            format!("Medicare Surtax {}", percent(rates.medicare * 100.0)),
            UNDERLINED,
            |y| -y.taxable_income * rates.medicare,
        );
        b.push("TAX LIABILITY", TOTAL, |y| y.tax_liability);

        b.push("NET OPERATING INCOME", TOTAL, |y| y.net_operating_income);
        b.push("Capital Expenses / Replacement Reserves", PLAIN, |_| -reserves);
        b.push("Annual Debt Service 1st Lien", UNDERLINED, |y| -y.debt_service);
        b.push("CASH FLOW BEFORE TAXES", TOTAL, |y| y.cash_flow_before_tax);
        b.push("Tax Liability", UNDERLINED, |y| -y.tax_liability);
        b.push("CASH FLOW AFTER TAXES", TOTAL, |y| y.cash_flow_after_tax);

        b.rows
    }

    pub fn row(&self, label: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}
