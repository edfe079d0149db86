use super::load_log;
use super::summary::{styled_rating, styled_verdict};
use crate::OutputFormat;
use anyhow::Result;
use loadlens_core::analysis::{RunKind, Score, score_log};
use std::path::Path;

#[derive(Debug, Clone, serde::Serialize)]
pub struct ScoreReport {
    pub run_kind: RunKind,
    #[serde(flatten)]
    pub score: Score,
}

pub fn evaluate(file: &Path) -> Result<ScoreReport> {
    let log = load_log(file)?;
    let run_kind = RunKind::classify(&log);

    Ok(ScoreReport {
        run_kind,
        score: score_log(&log, run_kind),
    })
}

/// Print the score and return whether the run passed
pub fn execute(file: &Path, format: OutputFormat) -> Result<bool> {
    tracing::info!("Scoring results file: {}", file.display());

    let report = evaluate(file)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            println!("Metric,Value");
            println!("Run Type,{}", report.run_kind.as_str());
            println!("P95 (ms),{:.2}", report.score.p95);
            println!("P99 (ms),{:.2}", report.score.p99);
            println!("Apdex Threshold (ms),{:.0}", report.score.policy.apdex_threshold);
            println!("Pass Threshold (ms),{:.0}", report.score.policy.pass_threshold);
            println!("Apdex,{}", report.score.apdex.as_str());
            println!("Verdict,{}", if report.score.pass { "PASS" } else { "FAIL" });
        }
        OutputFormat::Pretty => {
            println!(
                "Apdex: {} | Verdict: {} | p95 {:.1} ms (< {:.0}) | p99 {:.1} ms (< {:.0})",
                styled_rating(report.score.apdex),
                styled_verdict(report.score.pass),
                report.score.p95,
                report.score.policy.apdex_threshold,
                report.score.p99,
                report.score.policy.pass_threshold
            );
        }
    }

    Ok(report.score.pass)
}
