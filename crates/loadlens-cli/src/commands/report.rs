use super::breakdown::analyzer;
use super::load_log;
use super::series::SeriesView;
use crate::OutputFormat;
use anyhow::Result;
use loadlens_core::analysis::DashboardReport;
use std::path::Path;

/// Every derived view for a results file
pub fn build_report(file: &Path, top: usize, collapse: Vec<String>) -> Result<DashboardReport> {
    let log = load_log(file)?;
    let report = DashboardReport::build(&log, &analyzer(top, collapse))?;
    Ok(report)
}

pub fn execute(file: &Path, top: usize, collapse: Vec<String>, format: OutputFormat) -> Result<()> {
    tracing::info!("Building full report for: {}", file.display());

    let report = build_report(file, top, collapse)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    super::summary::render(&report.overview, file, format)?;
    super::series::render(
        &SeriesView {
            rows: report.series,
            highlighted: None,
        },
        format,
    )?;
    super::breakdown::render(&report.breakdowns, format)?;

    Ok(())
}
