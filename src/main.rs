//! Rental Cash Flow CLI
//!
//! Command-line interface for running projections and generating reports

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use rental_cashflow::branding::{JsonProfileFile, ProfileProvider, StaticProfile};
use rental_cashflow::inputs::{load_request, load_requests_csv};
use rental_cashflow::report::format::{currency, percent, ratio};
use rental_cashflow::{
    CashFlowProjector, OutputMode, ProjectionResult, ReportFormat, ReportGenerator, ReportOptions,
    ScenarioRunner, SweepVariable,
};

#[derive(Parser)]
#[command(
    name = "cashflow",
    version,
    about = "Ten-year after-tax cash flow analysis for rental property acquisitions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the ten-year investment analysis report
    Report {
        /// Report request (JSON)
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value = "html")]
        format: FormatArg,
        /// Directory the report is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Write the report to stdout instead of a file
        #[arg(long)]
        stdout: bool,
        /// Business profile (JSON) for report branding
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Report date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print the yearly projection and summary metrics
    Project {
        #[arg(long)]
        input: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Interest rate sensitivity for one property
    Sweep {
        #[arg(long)]
        input: PathBuf,
        /// Interest rates in percent, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        rates: Vec<f64>,
    },
    /// Project every property in a CSV file (one request per row)
    Batch {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Html,
    Csv,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Html => ReportFormat::Html,
            FormatArg::Csv => ReportFormat::Csv,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Report {
            input,
            format,
            out_dir,
            stdout,
            profile,
            date,
        } => run_report(input, format.into(), out_dir, stdout, profile, date).await,
        Commands::Project { input, json } => run_project(input, json),
        Commands::Sweep { input, rates } => run_sweep(input, &rates),
        Commands::Batch { input } => run_batch(input),
    }
}

async fn run_report(
    input: PathBuf,
    format: ReportFormat,
    out_dir: PathBuf,
    stdout: bool,
    profile: Option<PathBuf>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let request = load_request(&input)
        .with_context(|| format!("loading report request {}", input.display()))?;
    let report_input = request.into_input();

    let profiles: Arc<dyn ProfileProvider> = match profile {
        Some(path) => Arc::new(JsonProfileFile::new(path)),
        None => Arc::new(StaticProfile::default()),
    };
    let generator = ReportGenerator::new(CashFlowProjector::default(), profiles);

    let options = ReportOptions {
        format,
        output: if stdout {
            OutputMode::InMemory
        } else {
            OutputMode::Save { dir: out_dir }
        },
        report_date: date,
    };

    let artifact = generator
        .generate(&report_input, &options)
        .await
        .context("generating report")?;

    match artifact.saved_to {
        Some(path) => println!("Report written to: {}", path.display()),
        None => {
            use std::io::Write;
            std::io::stdout()
                .write_all(&artifact.bytes)
                .context("writing report to stdout")?;
        }
    }
    Ok(())
}

fn run_project(input: PathBuf, json: bool) -> Result<()> {
    let request = load_request(&input)
        .with_context(|| format!("loading report request {}", input.display()))?;
    let params = request.into_input().params;
    let result = CashFlowProjector::default().project(&params);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_projection(&result);
    }
    Ok(())
}

fn print_projection(result: &ProjectionResult) {
    println!(
        "{:>4} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Year", "EGI", "OpEx", "NOI", "Debt Svc", "CFBT", "Tax", "CFAT"
    );
    println!("{}", "-".repeat(96));
    for y in &result.years {
        println!(
            "{:>4} {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>12.0}",
            y.year,
            y.effective_gross_income,
            y.total_operating_expenses,
            y.net_operating_income,
            y.debt_service,
            y.cash_flow_before_tax,
            y.tax_liability,
            y.cash_flow_after_tax,
        );
    }

    let s = &result.summary;
    let m = &s.effective;
    println!("\nSummary:");
    println!("  Total Initial Investment: {}", currency(s.total_initial_investment));
    println!("  Monthly Payment:          {}", currency(s.monthly_payment));
    println!("  Expense Ratio (Year 1):   {}", percent(m.expense_ratio));
    println!("  Cap Rate (Year 1):        {}", percent(m.cap_rate));
    println!("  DSCR:                     {}", ratio(m.dscr));
    println!("  Cash-on-Cash (Year 1):    {}", percent(m.cash_on_cash_return));
    println!("  Annualized Return:        {}", percent(m.projected_irr));
    println!("  Total ROI:                {}", percent(m.total_roi));
    println!("  Projected Equity:         {}", currency(m.projected_equity));
    if let Some(irr) = s.levered_irr {
        println!("  Levered IRR:              {}", percent(irr));
    }
}

fn run_sweep(input: PathBuf, rates: &[f64]) -> Result<()> {
    if rates.is_empty() {
        bail!("at least one interest rate is required");
    }
    let request = load_request(&input)
        .with_context(|| format!("loading report request {}", input.display()))?;
    let params = request.into_input().params;

    let start = Instant::now();
    let points = ScenarioRunner::new().sweep(&params, SweepVariable::InterestRate, rates);
    info!("swept {} rates in {:?}", points.len(), start.elapsed());

    println!(
        "{:>8} {:>12} {:>8} {:>10} {:>10} {:>14}",
        "Rate", "Payment", "DSCR", "CoC", "Ann. Ret", "Equity"
    );
    for point in &points {
        let s = &point.result.summary;
        println!(
            "{:>8} {:>12} {:>8} {:>10} {:>10} {:>14}",
            percent(point.value),
            currency(s.monthly_payment),
            ratio(s.effective.dscr),
            percent(s.effective.cash_on_cash_return),
            percent(s.effective.projected_irr),
            currency(s.effective.projected_equity),
        );
    }
    Ok(())
}

fn run_batch(input: PathBuf) -> Result<()> {
    let start = Instant::now();
    let requests = load_requests_csv(&input)
        .with_context(|| format!("loading batch {}", input.display()))?;
    let batch: Vec<_> = requests.into_iter().map(|r| r.into_input().params).collect();
    println!("Loaded {} properties in {:?}", batch.len(), start.elapsed());

    let results = ScenarioRunner::new().run_batch(&batch);
    println!("Projected {} properties in {:?}\n", results.len(), start.elapsed());

    println!(
        "{:>4} {:>14} {:>12} {:>8} {:>8} {:>10} {:>14}",
        "Row", "Price", "NOI", "Cap", "DSCR", "Ann. Ret", "Equity"
    );
    for (i, result) in results.iter().enumerate() {
        let s = &result.summary;
        println!(
            "{:>4} {:>14} {:>12} {:>8} {:>8} {:>10} {:>14}",
            i + 1,
            currency(s.purchase_price),
            currency(s.effective.net_operating_income),
            percent(s.effective.cap_rate),
            ratio(s.effective.dscr),
            percent(s.effective.projected_irr),
            currency(s.effective.projected_equity),
        );
    }
    Ok(())
}
