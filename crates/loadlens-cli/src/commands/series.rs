use crate::OutputFormat;
use anyhow::Result;
use loadlens_core::Dashboard;
use loadlens_core::analysis::TimeSeriesRow;
use std::path::Path;

/// Time-series rows plus the row under the shared cursor
#[derive(Debug, Clone, serde::Serialize)]
pub struct SeriesView {
    pub rows: Vec<TimeSeriesRow>,
    pub highlighted: Option<usize>,
}

impl SeriesView {
    /// Keep the first `limit` rows plus the highlighted row when it falls past them
    pub fn limit(&mut self, limit: usize) {
        if self.rows.len() <= limit {
            return;
        }

        let kept = self
            .highlighted
            .filter(|&idx| idx >= limit)
            .and_then(|idx| self.rows.iter().find(|r| r.index == idx).cloned());

        self.rows.truncate(limit);
        if let Some(row) = kept {
            tracing::debug!("Keeping highlighted row {} past limit {}", row.index, limit);
            self.rows.push(row);
        }
    }
}

pub fn build_view(file: &Path, highlight: Option<usize>) -> Result<SeriesView> {
    let mut dashboard = Dashboard::new();
    dashboard.load_file(file)?;

    if let Some(index) = highlight {
        dashboard.highlight(index)?;
    }

    Ok(SeriesView {
        rows: dashboard.series().to_vec(),
        highlighted: dashboard.highlighted_index(),
    })
}

pub fn execute(
    file: &Path,
    highlight: Option<usize>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Building time series for: {}", file.display());

    let mut view = build_view(file, highlight)?;
    if let Some(limit) = limit {
        view.limit(limit);
    }

    render(&view, format)
}

pub(crate) fn render(view: &SeriesView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => output_json(view)?,
        OutputFormat::Table => output_table(view)?,
        OutputFormat::Pretty => output_pretty(view)?,
    }

    Ok(())
}

fn output_pretty(view: &SeriesView) -> Result<()> {
    use console::style;

    println!("\n{}", style("Time Series").bold().cyan());
    println!("{}", style("===========").cyan());

    if view.rows.is_empty() {
        println!("  {}", style("No intervals in results file").dim());
        println!();
        return Ok(());
    }

    println!(
        "\n  {:>3}  {:<8}  {:>9}  {:>6}  {:>8}  {:>9}  {:>9}  {:>6}",
        "#", "Time", "Req/s", "VUs", "Active", "P95 ms", "P99 ms", "Errors"
    );

    for row in &view.rows {
        let line = format!(
            "  {:>3}  {:<8}  {:>9.2}  {:>6}  {:>8}  {:>9.1}  {:>9.1}  {:>6}",
            row.index,
            row.time,
            row.request_rate,
            row.concurrent_users,
            row.vusers_active,
            row.response_time.p95,
            row.response_time.p99,
            row.errors
        );

        if view.highlighted == Some(row.index) {
            println!("{}", style(line).reverse());
        } else {
            println!("{}", line);
        }
    }

    if let Some(row) = view
        .highlighted
        .and_then(|idx| view.rows.iter().find(|r| r.index == idx))
    {
        println!("\n{}", style(format!("Row {} at {}", row.index, row.time)).bold());
        println!(
            "  Response Time: p50 {:.1} / p95 {:.1} / p99 {:.1} ms",
            row.response_time.p50, row.response_time.p95, row.response_time.p99
        );
        println!(
            "  FCP:           p50 {:.1} / p95 {:.1} / p99 {:.1} ms",
            row.fcp.p50, row.fcp.p95, row.fcp.p99
        );
        println!(
            "  LCP:           p50 {:.1} / p95 {:.1} / p99 {:.1} ms",
            row.lcp.p50, row.lcp.p95, row.lcp.p99
        );
        println!(
            "  Session:       mean {:.1} / p95 {:.1} / p99 {:.1} ms",
            row.session_length.mean, row.session_length.p95, row.session_length.p99
        );
        println!(
            "  VUs:           {} created, {} completed, {} failed",
            row.vusers_created, row.vusers_completed, row.vusers_failed
        );
    }

    println!();
    Ok(())
}

fn output_json(view: &SeriesView) -> Result<()> {
    let json = serde_json::to_string_pretty(view)?;
    println!("{}", json);
    Ok(())
}

fn output_table(view: &SeriesView) -> Result<()> {
    println!(
        "Index,Time,Request Rate,Created,Active,Completed,Failed,Concurrent,P50,P95,P99,FCP P95,LCP P95,Session Mean,Errors"
    );

    for row in &view.rows {
        println!(
            "{},{},{:.2},{},{},{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{}",
            row.index,
            row.time,
            row.request_rate,
            row.vusers_created,
            row.vusers_active,
            row.vusers_completed,
            row.vusers_failed,
            row.concurrent_users,
            row.response_time.p50,
            row.response_time.p95,
            row.response_time.p99,
            row.fcp.p95,
            row.lcp.p95,
            row.session_length.mean,
            row.errors
        );
    }

    Ok(())
}
