//! Metric name vocabulary.
//!
//! Results files use dot-namespaced keys (`http.codes.200`,
//! `vusers.created_by_name.checkout`, `browser.page.FCP.https://...`). Every
//! key is parsed into one of the known families here, with an `Other`
//! pass-through for anything unrecognised, so the analyzers match on variants
//! instead of testing string prefixes.

use super::types::SummaryStats;
use serde::{Deserialize, Serialize};

pub const BROWSER_NAMESPACE: &str = "browser.";

pub const HTTP_REQUESTS: &str = "http.requests";
pub const HTTP_REQUESTS_TOTAL: &str = "http.requests.total";
pub const HTTP_REQUEST_RATE: &str = "http.request_rate";
pub const HTTP_RESPONSE_TIME: &str = "http.response_time";
pub const BROWSER_HTTP_REQUESTS: &str = "browser.http_requests";
pub const VUSERS_CREATED: &str = "vusers.created";
pub const VUSERS_ACTIVE: &str = "vusers.active";
pub const VUSERS_COMPLETED: &str = "vusers.completed";
pub const VUSERS_FAILED: &str = "vusers.failed";
pub const VUSERS_SESSION_LENGTH: &str = "vusers.session_length";

const HTTP_REQUESTS_PREFIX: &str = "http.requests.";
const HTTP_CODES_PREFIX: &str = "http.codes.";
const BROWSER_PAGE_CODES_PREFIX: &str = "browser.page.codes.";
const BROWSER_PAGE_PREFIX: &str = "browser.page.";
const CREATED_BY_NAME_PREFIX: &str = "vusers.created_by_name.";
const ERRORS_PREFIX: &str = "errors.";

/// Known counter families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMetric<'a> {
    HttpRequests,
    HttpRequestsTotal,
    HttpRequestsByEndpoint(&'a str),
    HttpCode(&'a str),
    BrowserHttpRequests,
    BrowserPageCode(&'a str),
    VusersCreated,
    VusersActive,
    VusersCompleted,
    VusersFailed,
    VusersCreatedByName(&'a str),
    Error(&'a str),
    Other(&'a str),
}

impl<'a> CounterMetric<'a> {
    pub fn parse(key: &'a str) -> Self {
        match key {
            HTTP_REQUESTS => return CounterMetric::HttpRequests,
            HTTP_REQUESTS_TOTAL => return CounterMetric::HttpRequestsTotal,
            BROWSER_HTTP_REQUESTS => return CounterMetric::BrowserHttpRequests,
            VUSERS_CREATED => return CounterMetric::VusersCreated,
            VUSERS_ACTIVE => return CounterMetric::VusersActive,
            VUSERS_COMPLETED => return CounterMetric::VusersCompleted,
            VUSERS_FAILED => return CounterMetric::VusersFailed,
            _ => {}
        }

        if let Some(endpoint) = non_empty_suffix(key, HTTP_REQUESTS_PREFIX) {
            CounterMetric::HttpRequestsByEndpoint(endpoint)
        } else if let Some(code) = non_empty_suffix(key, HTTP_CODES_PREFIX) {
            CounterMetric::HttpCode(code)
        } else if let Some(code) = non_empty_suffix(key, BROWSER_PAGE_CODES_PREFIX) {
            CounterMetric::BrowserPageCode(code)
        } else if let Some(flow) = non_empty_suffix(key, CREATED_BY_NAME_PREFIX) {
            CounterMetric::VusersCreatedByName(flow)
        } else if let Some(category) = non_empty_suffix(key, ERRORS_PREFIX) {
            CounterMetric::Error(category)
        } else {
            CounterMetric::Other(key)
        }
    }
}

/// Browser page timing metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageMetric {
    Ttfb,
    Fcp,
    Lcp,
}

impl PageMetric {
    pub fn marker(&self) -> &'static str {
        match self {
            PageMetric::Ttfb => "TTFB",
            PageMetric::Fcp => "FCP",
            PageMetric::Lcp => "LCP",
        }
    }

    pub const ALL: [PageMetric; 3] = [PageMetric::Ttfb, PageMetric::Fcp, PageMetric::Lcp];

    fn from_marker(marker: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.marker() == marker)
    }
}

/// Known summary families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMetric<'a> {
    HttpResponseTime,
    SessionLength,
    /// `browser.page.<METRIC>.<target>`, where target is usually a page URL
    Page {
        metric: PageMetric,
        target: &'a str,
    },
    Other(&'a str),
}

impl<'a> SummaryMetric<'a> {
    pub fn parse(key: &'a str) -> Self {
        match key {
            HTTP_RESPONSE_TIME => return SummaryMetric::HttpResponseTime,
            VUSERS_SESSION_LENGTH => return SummaryMetric::SessionLength,
            _ => {}
        }

        if let Some(rest) = key.strip_prefix(BROWSER_PAGE_PREFIX)
            && let Some((marker, target)) = rest.split_once('.')
            && let Some(metric) = PageMetric::from_marker(marker)
            && !target.is_empty()
        {
            return SummaryMetric::Page { metric, target };
        }

        SummaryMetric::Other(key)
    }
}

/// A value that can be read off a [`SummaryStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Percentile {
    Min,
    P50,
    P75,
    P90,
    P95,
    P99,
    P999,
    Max,
    Mean,
}

impl Percentile {
    pub fn value_of(&self, stats: &SummaryStats) -> f64 {
        match self {
            Percentile::Min => stats.min,
            Percentile::P50 => stats.p50.or(stats.median).unwrap_or(0.0),
            Percentile::P75 => stats.p75,
            Percentile::P90 => stats.p90,
            Percentile::P95 => stats.p95,
            Percentile::P99 => stats.p99,
            Percentile::P999 => stats.p999,
            Percentile::Max => stats.max,
            Percentile::Mean => stats.mean,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Percentile::Min => "Min",
            Percentile::P50 => "P50",
            Percentile::P75 => "P75",
            Percentile::P90 => "P90",
            Percentile::P95 => "P95",
            Percentile::P99 => "P99",
            Percentile::P999 => "P999",
            Percentile::Max => "Max",
            Percentile::Mean => "Mean",
        }
    }
}

/// True when the key lives in the browser-automation namespace
pub fn is_browser_key(key: &str) -> bool {
    key.starts_with(BROWSER_NAMESPACE)
}

fn non_empty_suffix<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    key.strip_prefix(prefix).filter(|rest| !rest.is_empty())
}
