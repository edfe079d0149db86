use super::{file_name, load_log, ms};
use crate::OutputFormat;
use anyhow::Result;
use loadlens_core::analysis::{Analyzer, Overview, OverviewAnalyzer, Rating};
use std::path::Path;

/// Summary cards for a results file
pub fn summarize(file: &Path) -> Result<Overview> {
    tracing::debug!("Summarizing results file: {}", file.display());

    let log = load_log(file)?;
    let overview = OverviewAnalyzer.analyze(&log)?;

    Ok(overview)
}

pub fn execute(file: &Path, format: OutputFormat) -> Result<()> {
    let overview = summarize(file)?;
    render(&overview, file, format)
}

pub(crate) fn render(overview: &Overview, file: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => output_json(overview)?,
        OutputFormat::Table => output_table(overview)?,
        OutputFormat::Pretty => output_pretty(overview, file)?,
    }

    Ok(())
}

/// Format a duration in seconds for display
pub(crate) fn format_duration(seconds: f64) -> String {
    let secs = seconds.round() as u64;
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

pub(crate) fn styled_rating(rating: Rating) -> console::StyledObject<&'static str> {
    use console::style;

    match rating {
        Rating::Satisfied => style(rating.as_str()).green(),
        Rating::Tolerated => style(rating.as_str()).yellow(),
        Rating::Frustrated => style(rating.as_str()).red(),
    }
}

pub(crate) fn styled_verdict(pass: bool) -> console::StyledObject<&'static str> {
    use console::style;

    if pass {
        style("PASS").green().bold()
    } else {
        style("FAIL").red().bold()
    }
}

fn output_pretty(overview: &Overview, file: &Path) -> Result<()> {
    use console::style;

    println!(
        "\n{}",
        style(format!("Load Test Summary: {}", file_name(file)))
            .bold()
            .cyan()
    );
    println!();

    println!("{}", style("Run").bold());
    if let Some(ref id) = overview.test_id {
        println!("  Test ID:      {}", id);
    }
    println!("  Type:         {}", overview.run_kind.as_str());
    println!(
        "  Duration:     {} ({} intervals)",
        format_duration(overview.duration_seconds),
        overview.intervals
    );
    if let Some(ref region) = overview.region {
        println!("  Region:       {}", region);
    }
    if let Some(ref cluster) = overview.cluster {
        println!("  Cluster:      {}", cluster);
    }
    if let Some(ref version) = overview.tool_version {
        println!("  Tool Version: {}", version);
    }
    if !overview.tags.is_empty() {
        println!("  Tags:         {}", overview.tags.join(", "));
    }

    println!("\n{}", style("Traffic").bold());
    println!(
        "  Requests:     {}",
        style(overview.total_requests).yellow()
    );
    println!("  Avg Rate:     {:.2} req/s", overview.average_request_rate);
    println!(
        "  Errors:       {}",
        if overview.total_errors > 0 {
            style(overview.total_errors).red()
        } else {
            style(overview.total_errors).green()
        }
    );

    println!("\n{}", style("Virtual Users").bold());
    println!("  Created:      {}", overview.vusers_created);
    println!("  Completed:    {}", overview.vusers_completed);
    println!("  Failed:       {}", overview.vusers_failed);

    println!("\n{}", style("Response Time").bold());
    println!("  Mean:         {}", ms(overview.response_time.mean));
    println!("  P50:          {}", ms(overview.response_time.p50));
    println!("  P95:          {}", ms(overview.response_time.p95));
    println!("  P99:          {}", ms(overview.response_time.p99));
    println!("  Max:          {}", ms(overview.response_time.max));

    println!("\n{}", style("Score").bold());
    println!(
        "  Apdex:        {} (threshold {})",
        styled_rating(overview.score.apdex),
        ms(overview.score.policy.apdex_threshold)
    );
    println!(
        "  Verdict:      {} (p99 < {})",
        styled_verdict(overview.score.pass),
        ms(overview.score.policy.pass_threshold)
    );

    println!();
    Ok(())
}

fn output_json(overview: &Overview) -> Result<()> {
    let json_str = serde_json::to_string_pretty(overview)?;
    println!("{}", json_str);
    Ok(())
}

fn output_table(overview: &Overview) -> Result<()> {
    println!("Metric,Value");
    if let Some(ref id) = overview.test_id {
        println!("Test ID,{}", id);
    }
    println!("Run Type,{}", overview.run_kind.as_str());
    println!("Intervals,{}", overview.intervals);
    println!("Duration (s),{:.0}", overview.duration_seconds);
    println!("Total Requests,{}", overview.total_requests);
    println!("Average Rate (req/s),{:.2}", overview.average_request_rate);
    println!("Total Errors,{}", overview.total_errors);
    println!("VUs Created,{}", overview.vusers_created);
    println!("VUs Completed,{}", overview.vusers_completed);
    println!("VUs Failed,{}", overview.vusers_failed);
    println!("Mean (ms),{:.2}", overview.response_time.mean);
    println!("P50 (ms),{:.2}", overview.response_time.p50);
    println!("P95 (ms),{:.2}", overview.response_time.p95);
    println!("P99 (ms),{:.2}", overview.response_time.p99);
    println!("Max (ms),{:.2}", overview.response_time.max);
    println!("Apdex,{}", overview.score.apdex.as_str());
    println!(
        "Verdict,{}",
        if overview.score.pass { "PASS" } else { "FAIL" }
    );

    Ok(())
}
