use super::load_log;
use crate::OutputFormat;
use anyhow::Result;
use loadlens_core::analysis::{
    Analyzer, BreakdownAnalyzer, BreakdownRow, Breakdowns, PathCollapser,
};
use std::path::Path;

/// Build the breakdown analyzer from CLI options.
///
/// An empty collapse list keeps the default `/chat/` grouping.
pub fn analyzer(top: usize, collapse: Vec<String>) -> BreakdownAnalyzer {
    let collapser = if collapse.is_empty() {
        PathCollapser::default()
    } else {
        PathCollapser::new(
            collapse
                .iter()
                .flat_map(|p| p.split(',').map(|s| s.trim().to_string()))
                .filter(|p| !p.is_empty())
                .map(|p| if p.ends_with('/') { p } else { format!("{}/", p) })
                .collect(),
        )
    };

    BreakdownAnalyzer::new(top, collapser)
}

pub fn reduce(file: &Path, top: usize, collapse: Vec<String>) -> Result<Breakdowns> {
    tracing::debug!("Reducing breakdowns for: {}", file.display());

    let log = load_log(file)?;
    let breakdowns = analyzer(top, collapse).analyze(&log)?;

    Ok(breakdowns)
}

pub fn execute(file: &Path, top: usize, collapse: Vec<String>, format: OutputFormat) -> Result<()> {
    let breakdowns = reduce(file, top, collapse)?;
    render(&breakdowns, format)
}

pub(crate) fn render(breakdowns: &Breakdowns, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => output_json(breakdowns)?,
        OutputFormat::Table => output_table(breakdowns)?,
        OutputFormat::Pretty => output_pretty(breakdowns)?,
    }

    Ok(())
}

fn print_rows(title: &str, rows: &[BreakdownRow]) {
    use console::style;

    println!("\n{}", style(title).bold());
    if rows.is_empty() {
        println!("  {}", style("No data").dim());
        return;
    }

    let width = rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
    for row in rows {
        println!("  {:<width$}  {}", row.label, style(row.count).yellow(), width = width);
    }
}

fn output_pretty(breakdowns: &Breakdowns) -> Result<()> {
    use console::style;

    println!("\n{}", style("Breakdowns").bold().cyan());
    println!("{}", style("==========").cyan());

    print_rows("Endpoints", &breakdowns.endpoints);
    print_rows("Status Codes", &breakdowns.status_codes);
    print_rows("Top Flows", &breakdowns.top_flows);
    print_rows("Errors", &breakdowns.error_categories);

    println!("\n{}", style("Endpoint Latency").bold());
    if breakdowns.endpoint_latency.is_empty() {
        println!("  {}", style("No data").dim());
    } else {
        for row in &breakdowns.endpoint_latency {
            println!(
                "  {} - {:.1} ms mean over {} samples",
                row.path, row.mean, row.count
            );
        }
    }

    println!("\n{}", style("Response Time Distribution").bold());
    if breakdowns.response_time_buckets.is_empty() {
        println!("  {}", style("No data").dim());
    } else {
        for bucket in &breakdowns.response_time_buckets {
            println!("  {:<8} {:.1}", bucket.label, bucket.value);
        }
    }

    println!();
    Ok(())
}

fn output_json(breakdowns: &Breakdowns) -> Result<()> {
    let json = serde_json::to_string_pretty(breakdowns)?;
    println!("{}", json);
    Ok(())
}

fn output_table(breakdowns: &Breakdowns) -> Result<()> {
    println!("Table,Label,Value");

    let counted = [
        ("endpoint", &breakdowns.endpoints),
        ("status", &breakdowns.status_codes),
        ("flow", &breakdowns.top_flows),
        ("error", &breakdowns.error_categories),
    ];
    for (table, rows) in counted {
        for row in rows {
            println!("{},{},{}", table, quoted(&row.label), row.count);
        }
    }

    for row in &breakdowns.endpoint_latency {
        println!("latency,{},{:.2}", quoted(&row.path), row.mean);
    }

    for bucket in &breakdowns.response_time_buckets {
        println!("bucket,{},{:.2}", quoted(&bucket.label), bucket.value);
    }

    Ok(())
}

/// CSV field with embedded quotes doubled
fn quoted(label: &str) -> String {
    format!("\"{}\"", label.replace('"', "\"\""))
}
