use super::latency::response_time;
use super::scoring::{Score, score_log};
use super::series::{error_total, requests_key};
use super::{Analyzer, RunKind};
use crate::Result;
use crate::report::metrics::{HTTP_REQUEST_RATE, VUSERS_COMPLETED, VUSERS_CREATED, VUSERS_FAILED};
use crate::report::{Percentile, ResultLog};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseTimeCard {
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub max: f64,
}

/// Headline numbers for a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    pub test_id: Option<String>,
    pub run_kind: RunKind,
    pub tags: Vec<String>,
    pub region: Option<String>,
    pub cluster: Option<String>,
    pub tool_version: Option<String>,
    pub intervals: usize,
    pub total_requests: u64,
    pub total_errors: u64,
    pub vusers_created: u64,
    pub vusers_completed: u64,
    pub vusers_failed: u64,
    pub duration_seconds: f64,
    pub average_request_rate: f64,
    pub response_time: ResponseTimeCard,
    pub score: Score,
}

pub struct OverviewAnalyzer;

impl Analyzer for OverviewAnalyzer {
    type Output = Overview;

    fn analyze(&self, log: &ResultLog) -> Result<Self::Output> {
        tracing::debug!("Analyzing results overview");

        let kind = RunKind::classify(log);
        let aggregate = &log.aggregate;

        let total_requests = aggregate.counter(requests_key(kind));
        let duration_seconds = run_duration_seconds(log);

        let precomputed_rate = aggregate.rate(HTTP_REQUEST_RATE);
        let average_request_rate = if precomputed_rate != 0.0 {
            precomputed_rate
        } else if duration_seconds > 0.0 {
            total_requests as f64 / duration_seconds
        } else {
            0.0
        };

        let metadata = log.metadata.clone().unwrap_or_default();

        let overview = Overview {
            test_id: log.test_id.clone(),
            run_kind: kind,
            tags: metadata
                .tags
                .iter()
                .map(|t| format!("{}:{}", t.name, t.value))
                .collect(),
            region: metadata.region.clone(),
            cluster: metadata.cluster.clone(),
            tool_version: metadata.tool_version(),
            intervals: log.intermediate.len(),
            total_requests,
            total_errors: error_total(aggregate),
            vusers_created: aggregate.counter(VUSERS_CREATED),
            vusers_completed: aggregate.counter(VUSERS_COMPLETED),
            vusers_failed: aggregate.counter(VUSERS_FAILED),
            duration_seconds,
            average_request_rate,
            response_time: ResponseTimeCard {
                mean: response_time(aggregate, kind, Percentile::Mean),
                p50: response_time(aggregate, kind, Percentile::P50),
                p95: response_time(aggregate, kind, Percentile::P95),
                p99: response_time(aggregate, kind, Percentile::P99),
                max: response_time(aggregate, kind, Percentile::Max),
            },
            score: score_log(log, kind),
        };

        tracing::info!(
            "Overview complete: {} requests over {:.0}s, {} errors",
            overview.total_requests,
            overview.duration_seconds,
            overview.total_errors
        );

        Ok(overview)
    }
}

/// Seconds from the first interval's start to the last interval's end.
///
/// Falls back to the aggregate's own bounds when there are no interval
/// timestamps. Zero when no bound exists at all, otherwise floored at one.
fn run_duration_seconds(log: &ResultLog) -> f64 {
    let start = log
        .intermediate
        .iter()
        .find_map(|e| e.first_counter_at)
        .or(log.aggregate.first_counter_at);
    let end = log
        .intermediate
        .iter()
        .rev()
        .find_map(|e| e.last_counter_at)
        .or(log.aggregate.last_counter_at);

    match (start, end) {
        (Some(start), Some(end)) => ((end - start) as f64 / 1000.0).max(1.0),
        (Some(_), None) | (None, Some(_)) => 1.0,
        (None, None) => 0.0,
    }
}
