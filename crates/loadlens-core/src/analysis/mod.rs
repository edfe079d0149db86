mod breakdown;
mod classifier;
mod latency;
mod overview;
mod scoring;
mod series;

pub use breakdown::{
    BreakdownAnalyzer, BreakdownRow, Breakdowns, Bucket, DEFAULT_TOP_FLOWS, EndpointLatency,
    PathCollapser, endpoint_latency, endpoints, error_categories, response_time_buckets,
    status_codes, top_flows,
};
pub use classifier::{RunKind, is_browser_run};
pub use latency::{response_time, weighted_page_percentile};
pub use overview::{Overview, OverviewAnalyzer, ResponseTimeCard};
pub use scoring::{Rating, Score, ScoringPolicy, score, score_log};
pub use series::{
    LatencyPercentiles, SeriesAnalyzer, SessionLength, TimeSeriesRow, build_series, request_rate,
};

use crate::report::ResultLog;
use serde::{Deserialize, Serialize};

/// Everything the dashboard displays for one results file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub overview: Overview,
    pub series: Vec<TimeSeriesRow>,
    pub breakdowns: Breakdowns,
}

impl DashboardReport {
    /// Run every analyzer over the log
    pub fn build(log: &ResultLog, breakdowns: &BreakdownAnalyzer) -> crate::Result<Self> {
        let overview = OverviewAnalyzer.analyze(log)?;
        let series = SeriesAnalyzer::with_kind(overview.run_kind).analyze(log)?;
        let breakdowns = breakdowns.analyze(log)?;

        Ok(Self {
            overview,
            series,
            breakdowns,
        })
    }
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, log: &ResultLog) -> crate::Result<Self::Output>;
}
