use super::latency::{page_family_max, weighted_page_percentile};
use super::{Analyzer, RunKind};
use crate::Result;
use crate::report::metrics::HTTP_RESPONSE_TIME;
use crate::report::{CounterMetric, LogEntry, PageMetric, Percentile, ResultLog, SummaryMetric};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

pub const DEFAULT_TOP_FLOWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub label: String,
    pub count: u64,
}

/// Request-weighted mean latency for one (collapsed) page path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointLatency {
    pub path: String,
    pub count: u64,
    pub mean: f64,
}

/// One bar of a response-time distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub value: f64,
}

/// All breakdown tables for a results file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breakdowns {
    pub endpoints: Vec<BreakdownRow>,
    pub status_codes: Vec<BreakdownRow>,
    pub top_flows: Vec<BreakdownRow>,
    pub error_categories: Vec<BreakdownRow>,
    pub endpoint_latency: Vec<EndpointLatency>,
    pub response_time_buckets: Vec<Bucket>,
}

/// Groups per-resource paths such as `/chat/abc123` under one label
#[derive(Debug, Clone)]
pub struct PathCollapser {
    prefixes: Vec<String>,
}

impl PathCollapser {
    /// Build from path prefixes; each should end with `/`
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    /// Collapse `path` into `<prefix>[id]` when it starts with a known prefix
    pub fn collapse(&self, path: &str) -> String {
        self.prefixes
            .iter()
            .find(|prefix| path.starts_with(prefix.as_str()))
            .map(|prefix| format!("{}[id]", prefix))
            .unwrap_or_else(|| path.to_string())
    }
}

impl Default for PathCollapser {
    fn default() -> Self {
        Self::new(vec!["/chat/".to_string()])
    }
}

/// Requests per endpoint.
///
/// Protocol runs use `http.requests.<endpoint>` (without the `total` roll-up);
/// browser runs use `browser.page.codes.<label>`.
pub fn endpoints(entry: &LogEntry, kind: RunKind) -> Vec<BreakdownRow> {
    collect_rows(entry, |metric| match (kind, metric) {
        (RunKind::Protocol, CounterMetric::HttpRequestsByEndpoint(label)) => Some(label),
        (RunKind::Browser, CounterMetric::BrowserPageCode(label)) => Some(label),
        _ => None,
    })
}

/// Responses per status code across the HTTP and browser namespaces
pub fn status_codes(entry: &LogEntry) -> Vec<BreakdownRow> {
    let mut codes: BTreeMap<&str, u64> = BTreeMap::new();

    for (key, count) in &entry.counters {
        if let CounterMetric::HttpCode(code) | CounterMetric::BrowserPageCode(code) =
            CounterMetric::parse(key)
        {
            let total = codes.entry(code).or_insert(0);
            *total = total.saturating_add(*count);
        }
    }

    codes
        .into_iter()
        .map(|(code, count)| BreakdownRow {
            label: code.to_string(),
            count,
        })
        .collect()
}

/// Most-used scenario flows, descending by virtual users created
pub fn top_flows(entry: &LogEntry, limit: usize) -> Vec<BreakdownRow> {
    let mut rows = collect_rows(entry, |metric| match metric {
        CounterMetric::VusersCreatedByName(flow) => Some(flow),
        _ => None,
    });

    // Stable sort keeps key order among equal counts
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows.truncate(limit);
    rows
}

/// Errors per category, descending by count
pub fn error_categories(entry: &LogEntry) -> Vec<BreakdownRow> {
    let mut rows = collect_rows(entry, |metric| match metric {
        CounterMetric::Error(category) => Some(category),
        _ => None,
    });

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Mean page latency per URL path.
///
/// Every page-metric summary whose target is an absolute URL contributes its
/// `mean`, weighted by `count`, to the collapsed path of that URL. Targets
/// that fail to parse are skipped.
pub fn endpoint_latency(entry: &LogEntry, collapser: &PathCollapser) -> Vec<EndpointLatency> {
    let mut by_path: BTreeMap<String, (u64, f64)> = BTreeMap::new();

    for (key, stats) in &entry.summaries {
        let SummaryMetric::Page { target, .. } = SummaryMetric::parse(key) else {
            continue;
        };

        if !stats.has_data() {
            continue;
        }

        let url = match Url::parse(target) {
            Ok(url) if url.has_host() => url,
            Ok(_) => {
                tracing::debug!("Skipping summary {} without a host", key);
                continue;
            }
            Err(e) => {
                tracing::debug!("Skipping summary {} with unparseable URL: {}", key, e);
                continue;
            }
        };

        let path = collapser.collapse(url.path());
        let (count, mean) = by_path.entry(path).or_insert((0, 0.0));

        let combined = count.saturating_add(stats.count);
        *mean = (*mean * *count as f64 + stats.mean * stats.count as f64) / combined as f64;
        *count = combined;
    }

    by_path
        .into_iter()
        .map(|(path, (count, mean))| EndpointLatency { path, count, mean })
        .collect()
}

/// Response-time distribution buckets.
///
/// Browser runs chart the FCP family's percentiles; protocol runs chart the
/// `http.response_time` histogram using its own keys as labels.
pub fn response_time_buckets(entry: &LogEntry, kind: RunKind) -> Vec<Bucket> {
    match kind {
        RunKind::Browser => browser_buckets(entry),
        RunKind::Protocol => protocol_buckets(entry),
    }
}

fn browser_buckets(entry: &LogEntry) -> Vec<Bucket> {
    let has_fcp = entry.summaries.iter().any(|(key, stats)| {
        stats.has_data()
            && matches!(
                SummaryMetric::parse(key),
                SummaryMetric::Page {
                    metric: PageMetric::Fcp,
                    ..
                }
            )
    });

    if !has_fcp {
        return Vec::new();
    }

    let mut buckets: Vec<Bucket> = [
        Percentile::P50,
        Percentile::P75,
        Percentile::P90,
        Percentile::P95,
        Percentile::P99,
    ]
    .iter()
    .map(|p| Bucket {
        label: p.label().to_string(),
        value: weighted_page_percentile(entry, PageMetric::Fcp, *p),
    })
    .collect();

    buckets.push(Bucket {
        label: Percentile::Max.label().to_string(),
        value: page_family_max(entry, PageMetric::Fcp),
    });

    buckets
}

/// Display order for well-known histogram keys; unknown keys follow
const HISTOGRAM_KEY_ORDER: &[&str] = &[
    "min", "p50", "median", "p75", "p90", "p95", "p99", "p999", "max", "mean", "count",
];

fn protocol_buckets(entry: &LogEntry) -> Vec<Bucket> {
    let Some(histogram) = entry.histograms.get(HTTP_RESPONSE_TIME) else {
        return Vec::new();
    };

    let rank = |key: &str| {
        HISTOGRAM_KEY_ORDER
            .iter()
            .position(|known| *known == key)
            .unwrap_or(HISTOGRAM_KEY_ORDER.len())
    };

    let mut buckets: Vec<Bucket> = histogram
        .iter()
        .map(|(label, value)| Bucket {
            label: label.clone(),
            value: *value,
        })
        .collect();

    // BTreeMap input is key-ordered, stable sort keeps that for unknown keys
    buckets.sort_by_key(|b| rank(&b.label));
    buckets
}

fn collect_rows<'a, F>(entry: &'a LogEntry, select: F) -> Vec<BreakdownRow>
where
    F: Fn(CounterMetric<'a>) -> Option<&'a str>,
{
    entry
        .counters
        .iter()
        .filter_map(|(key, count)| {
            select(CounterMetric::parse(key)).map(|label| BreakdownRow {
                label: label.to_string(),
                count: *count,
            })
        })
        .collect()
}

pub struct BreakdownAnalyzer {
    top_n: usize,
    collapser: PathCollapser,
}

impl BreakdownAnalyzer {
    pub fn new(top_n: usize, collapser: PathCollapser) -> Self {
        Self { top_n, collapser }
    }
}

impl Default for BreakdownAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_FLOWS, PathCollapser::default())
    }
}

impl Analyzer for BreakdownAnalyzer {
    type Output = Breakdowns;

    fn analyze(&self, log: &ResultLog) -> Result<Self::Output> {
        tracing::debug!("Reducing aggregate record into breakdown tables");

        let kind = RunKind::classify(log);
        let entry = &log.aggregate;

        let breakdowns = Breakdowns {
            endpoints: endpoints(entry, kind),
            status_codes: status_codes(entry),
            top_flows: top_flows(entry, self.top_n),
            error_categories: error_categories(entry),
            endpoint_latency: endpoint_latency(entry, &self.collapser),
            response_time_buckets: response_time_buckets(entry, kind),
        };

        tracing::info!(
            "Breakdown analysis complete: {} endpoints, {} status codes, {} flows",
            breakdowns.endpoints.len(),
            breakdowns.status_codes.len(),
            breakdowns.top_flows.len()
        );

        Ok(breakdowns)
    }
}
