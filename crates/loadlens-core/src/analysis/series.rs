use super::latency::{response_time, weighted_page_percentile};
use super::{Analyzer, RunKind};
use crate::Result;
use crate::report::metrics::{
    BROWSER_HTTP_REQUESTS, HTTP_REQUEST_RATE, HTTP_REQUESTS, VUSERS_ACTIVE, VUSERS_COMPLETED,
    VUSERS_CREATED, VUSERS_FAILED, VUSERS_SESSION_LENGTH,
};
use crate::report::{CounterMetric, LogEntry, PageMetric, Percentile, ResultLog};
use serde::{Deserialize, Serialize};

/// p50/p95/p99 triple in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyPercentiles {
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionLength {
    pub mean: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Derived values for one interval record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRow {
    pub index: usize,
    pub timestamp_ms: i64,
    pub time: String,
    pub request_rate: f64,
    pub vusers_created: u64,
    pub vusers_active: u64,
    pub vusers_completed: u64,
    pub vusers_failed: u64,
    pub concurrent_users: u64,
    pub response_time: LatencyPercentiles,
    pub fcp: LatencyPercentiles,
    pub lcp: LatencyPercentiles,
    pub session_length: SessionLength,
    pub errors: u64,
}

/// Build one row per interval, in input order
pub fn build_series(log: &ResultLog, kind: RunKind) -> Vec<TimeSeriesRow> {
    let mut cumulative_created = 0u64;
    let mut cumulative_completed = 0u64;
    let mut cumulative_failed = 0u64;

    log.intermediate
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let vusers_created = entry.counter(VUSERS_CREATED);
            let vusers_completed = entry.counter(VUSERS_COMPLETED);
            let vusers_failed = entry.counter(VUSERS_FAILED);

            cumulative_created = cumulative_created.saturating_add(vusers_created);
            cumulative_completed = cumulative_completed.saturating_add(vusers_completed);
            cumulative_failed = cumulative_failed.saturating_add(vusers_failed);

            let concurrent_users = cumulative_created
                .saturating_sub(cumulative_completed)
                .saturating_sub(cumulative_failed);

            let timestamp_ms = entry.first_counter_at.unwrap_or(0);

            TimeSeriesRow {
                index,
                timestamp_ms,
                time: format_time(entry.first_counter_at),
                request_rate: request_rate(entry, kind),
                vusers_created,
                vusers_active: entry.counter(VUSERS_ACTIVE),
                vusers_completed,
                vusers_failed,
                concurrent_users,
                response_time: LatencyPercentiles {
                    p50: response_time(entry, kind, Percentile::P50),
                    p95: response_time(entry, kind, Percentile::P95),
                    p99: response_time(entry, kind, Percentile::P99),
                },
                fcp: page_percentiles(entry, kind, PageMetric::Fcp),
                lcp: page_percentiles(entry, kind, PageMetric::Lcp),
                session_length: SessionLength {
                    mean: entry.percentile(VUSERS_SESSION_LENGTH, Percentile::Mean),
                    p95: entry.percentile(VUSERS_SESSION_LENGTH, Percentile::P95),
                    p99: entry.percentile(VUSERS_SESSION_LENGTH, Percentile::P99),
                },
                errors: error_total(entry),
            }
        })
        .collect()
}

/// Requests per second for one interval.
///
/// Uses the precomputed `http.request_rate` when it is present and nonzero,
/// otherwise divides the kind's request counter by the window length.
pub fn request_rate(entry: &LogEntry, kind: RunKind) -> f64 {
    let precomputed = entry.rate(HTTP_REQUEST_RATE);
    if precomputed != 0.0 {
        return precomputed;
    }

    entry.counter(requests_key(kind)) as f64 / entry.period_seconds()
}

/// Counter holding the request total for a run kind
pub fn requests_key(kind: RunKind) -> &'static str {
    match kind {
        RunKind::Browser => BROWSER_HTTP_REQUESTS,
        RunKind::Protocol => HTTP_REQUESTS,
    }
}

/// Sum of every `errors.*` counter
pub fn error_total(entry: &LogEntry) -> u64 {
    entry
        .counters
        .iter()
        .filter(|(key, _)| matches!(CounterMetric::parse(key), CounterMetric::Error(_)))
        .fold(0u64, |total, (_, count)| total.saturating_add(*count))
}

fn page_percentiles(entry: &LogEntry, kind: RunKind, metric: PageMetric) -> LatencyPercentiles {
    if !kind.is_browser() {
        return LatencyPercentiles::default();
    }

    LatencyPercentiles {
        p50: weighted_page_percentile(entry, metric, Percentile::P50),
        p95: weighted_page_percentile(entry, metric, Percentile::P95),
        p99: weighted_page_percentile(entry, metric, Percentile::P99),
    }
}

fn format_time(timestamp_ms: Option<i64>) -> String {
    timestamp_ms
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

pub struct SeriesAnalyzer {
    kind: Option<RunKind>,
}

impl SeriesAnalyzer {
    /// Analyzer that classifies each log itself
    pub fn new() -> Self {
        Self { kind: None }
    }

    /// Analyzer with a classification decided by the caller
    pub fn with_kind(kind: RunKind) -> Self {
        Self { kind: Some(kind) }
    }
}

impl Default for SeriesAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for SeriesAnalyzer {
    type Output = Vec<TimeSeriesRow>;

    fn analyze(&self, log: &ResultLog) -> Result<Self::Output> {
        tracing::debug!("Building time series from {} intervals", log.intermediate.len());

        let kind = self.kind.unwrap_or_else(|| RunKind::classify(log));
        let rows = build_series(log, kind);

        tracing::info!("Time series complete: {} rows", rows.len());

        Ok(rows)
    }
}
