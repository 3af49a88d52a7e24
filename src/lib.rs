//! Rental Cash Flow - ten-year after-tax projection and reporting engine for
//! multifamily acquisitions
//!
//! This library provides:
//! - Loan amortization (amortizing and interest-only)
//! - Ten-year income, expense, debt service and tax projection
//! - Investment summary metrics with per-metric overrides
//! - HTML / CSV / JSON report rendering with business branding
//! - Parallel batch and sensitivity runs

pub mod branding;
pub mod error;
pub mod inputs;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use error::{ProjectorError, Result};
pub use inputs::{ProjectionParams, ReportInput, ReportRequest};
pub use projection::{CashFlowProjector, ProjectionConfig, ProjectionResult, SummaryMetrics};
pub use report::{OutputMode, ReportArtifact, ReportFormat, ReportGenerator, ReportOptions};
pub use scenario::{ScenarioRunner, SweepVariable};
