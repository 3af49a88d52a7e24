//! Report generation: layout, rendering and delivery of the ten-year analysis

mod artifact;
mod csv_out;
pub mod format;
mod html;
mod layout;

pub use artifact::{
    artifact_file_name, OutputMode, ReportArtifact, ReportFormat, ReportOptions, ARTIFACT_STEM,
};
pub use csv_out::render_csv;
pub use html::render_html;
pub use layout::{
    ReportLayout, ReportRow, RowStyle, SummaryLine, YearColumn, DEFAULT_REPORT_TITLE,
    REPORT_SUBTITLE,
};

use chrono::{Local, NaiveDate};
use log::info;
use serde::Serialize;
use std::sync::Arc;

use crate::branding::{resolve_masthead, Masthead, ProfileProvider, StaticProfile};
use crate::error::{ProjectorError, Result};
use crate::inputs::ReportInput;
use crate::projection::{CashFlowProjector, ProjectionResult, SummaryMetrics, YearlyProjection};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_on: NaiveDate,
    business_name: &'a str,
    layout: &'a ReportLayout,
    summary: &'a SummaryMetrics,
    years: &'a [YearlyProjection],
}

/// Render a computed projection into `format`
pub fn render(
    result: &ProjectionResult,
    input: &ReportInput,
    masthead: &Masthead,
    format: ReportFormat,
    report_date: NaiveDate,
) -> Result<Vec<u8>> {
    let layout = ReportLayout::build(result, &input.address, &input.branding, report_date);
    match format {
        ReportFormat::Html => Ok(render_html(&layout, masthead)?.into_bytes()),
        ReportFormat::Csv => render_csv(&layout),
        ReportFormat::Json => {
            let doc = JsonReport {
                generated_on: report_date,
                business_name: masthead.business_name(),
                layout: &layout,
                summary: &result.summary,
                years: &result.years,
            };
            Ok(serde_json::to_vec_pretty(&doc)?)
        }
    }
}

/// Projects, brands and renders reports. Each call is independent; a single
/// generator may serve concurrent requests.
#[derive(Clone)]
pub struct ReportGenerator {
    projector: CashFlowProjector,
    profiles: Arc<dyn ProfileProvider>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(CashFlowProjector::default(), Arc::new(StaticProfile::default()))
    }
}

impl ReportGenerator {
    pub fn new(projector: CashFlowProjector, profiles: Arc<dyn ProfileProvider>) -> Self {
        Self {
            projector,
            profiles,
        }
    }

    /// Generate one report. A request flagged for in-memory return is never
    /// written to disk, whatever `options.output` says.
    pub async fn generate(
        &self,
        input: &ReportInput,
        options: &ReportOptions,
    ) -> Result<ReportArtifact> {
        let report_date = options
            .report_date
            .unwrap_or_else(|| Local::now().date_naive());

        let result = self.projector.project(&input.params);
        let masthead = resolve_masthead(self.profiles.as_ref()).await;
        let bytes = render(&result, input, &masthead, options.format, report_date)?;
        let file_name = artifact_file_name(options.format, report_date);

        let output = if input.return_in_memory {
            &OutputMode::InMemory
        } else {
            &options.output
        };

        let saved_to = match output {
            OutputMode::InMemory => None,
            OutputMode::Save { dir } => {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|source| ProjectorError::Write {
                        path: dir.clone(),
                        source,
                    })?;
                let path = dir.join(&file_name);
                tokio::fs::write(&path, &bytes)
                    .await
                    .map_err(|source| ProjectorError::Write {
                        path: path.clone(),
                        source,
                    })?;
                info!("wrote {} ({} bytes)", path.display(), bytes.len());
                Some(path)
            }
        };

        Ok(ReportArtifact {
            file_name,
            format: options.format,
            bytes,
            saved_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branding::BusinessProfile;
    use crate::inputs::fixtures::sample_params;
    use crate::inputs::{PropertyAddress, ReportBranding};
    use tempfile::TempDir;

    fn input(return_in_memory: bool) -> ReportInput {
        ReportInput {
            params: sample_params(),
            address: PropertyAddress::default(),
            branding: ReportBranding::default(),
            return_in_memory,
        }
    }

    fn date() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2026, 10, 15)
    }

    #[tokio::test]
    async fn test_save_mode_writes_file() {
        let dir = TempDir::new().unwrap();
        let options = ReportOptions {
            format: ReportFormat::Html,
            output: OutputMode::Save {
                dir: dir.path().join("reports"),
            },
            report_date: date(),
        };
        let artifact = ReportGenerator::default()
            .generate(&input(false), &options)
            .await
            .unwrap();

        assert_eq!(artifact.file_name, "10-Year-Investment-Analysis-2026-10-15.html");
        let path = artifact.saved_to.expect("artifact should be saved");
        assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
    }

    #[tokio::test]
    async fn test_in_memory_flag_wins() {
        let dir = TempDir::new().unwrap();
        let options = ReportOptions {
            format: ReportFormat::Csv,
            output: OutputMode::Save {
                dir: dir.path().to_path_buf(),
            },
            report_date: date(),
        };
        let artifact = ReportGenerator::default()
            .generate(&input(true), &options)
            .await
            .unwrap();

        assert!(artifact.saved_to.is_none());
        assert!(!artifact.bytes.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_json_matches_summary() {
        let profiles = Arc::new(StaticProfile::new(BusinessProfile {
            business_name: Some("Summit Realty".into()),
            logo: None,
        }));
        let generator = ReportGenerator::new(CashFlowProjector::default(), profiles);
        let options = ReportOptions {
            format: ReportFormat::Json,
            output: OutputMode::InMemory,
            report_date: date(),
        };
        let artifact = generator.generate(&input(false), &options).await.unwrap();

        let doc: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
        assert_eq!(doc["business_name"], "Summit Realty");
        assert_eq!(doc["generated_on"], "2026-10-15");
        assert_eq!(doc["years"].as_array().unwrap().len(), 10);

        let expected = CashFlowProjector::default().project(&sample_params()).summary;
        assert_eq!(
            doc["summary"]["effective"]["cap_rate"].as_f64().unwrap(),
            expected.effective.cap_rate
        );
    }
}
