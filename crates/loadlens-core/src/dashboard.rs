//! Single-file viewing session.
//!
//! A [`Dashboard`] holds at most one loaded results file. Loading parses the
//! whole document before anything is replaced, so a failed load leaves the
//! previous file (if any) in place. The highlighted row is the cursor shared
//! by every time-series view.

use crate::analysis::{BreakdownAnalyzer, DashboardReport, RunKind, TimeSeriesRow, build_series};
use crate::report::{ResultLog, ResultLogReader};
use crate::{Error, Result};
use std::path::Path;

#[derive(Debug, Default)]
pub struct Dashboard {
    log: Option<ResultLog>,
    series: Vec<TimeSeriesRow>,
    highlighted: Option<usize>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let log = ResultLogReader::from_file(path)?;
        self.replace(log);
        Ok(())
    }

    pub fn load_str(&mut self, content: &str) -> Result<()> {
        let log = ResultLogReader::from_str(content)?;
        self.replace(log);
        Ok(())
    }

    fn replace(&mut self, log: ResultLog) {
        if let Err(e) = ResultLogReader::validate(&log) {
            tracing::warn!("Loaded results with structural issues: {}", e);
        }

        self.series = build_series(&log, RunKind::classify(&log));
        self.log = Some(log);
        self.clear_highlight();
    }

    pub fn log(&self) -> Option<&ResultLog> {
        self.log.as_ref()
    }

    pub fn series(&self) -> &[TimeSeriesRow] {
        &self.series
    }

    /// Derive every view, or `None` before the first successful load
    pub fn report(&self, breakdowns: &BreakdownAnalyzer) -> Option<Result<DashboardReport>> {
        self.log
            .as_ref()
            .map(|log| DashboardReport::build(log, breakdowns))
    }

    /// Move the cursor to a row index
    pub fn highlight(&mut self, index: usize) -> Result<&TimeSeriesRow> {
        let len = self.series.len();
        let row = self
            .series
            .get(index)
            .ok_or(Error::RowOutOfRange { index, len })?;
        self.highlighted = Some(index);
        Ok(row)
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted_row(&self) -> Option<&TimeSeriesRow> {
        self.highlighted.and_then(|idx| self.series.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_INTERVALS: &str = r#"{
        "aggregate": {"counters": {"http.requests": 20}},
        "intermediate": [
            {"counters": {"http.requests": 10}, "firstCounterAt": 0, "lastCounterAt": 10000},
            {"counters": {"http.requests": 10}, "firstCounterAt": 10000, "lastCounterAt": 20000}
        ]
    }"#;

    #[test]
    fn test_empty_dashboard_has_no_report() {
        let dashboard = Dashboard::new();
        assert!(dashboard.log().is_none());
        assert!(dashboard.report(&BreakdownAnalyzer::default()).is_none());
    }

    #[test]
    fn test_failed_load_keeps_previous_log() {
        let mut dashboard = Dashboard::new();
        dashboard.load_str(TWO_INTERVALS).unwrap();
        dashboard.highlight(1).unwrap();

        let result = dashboard.load_str("{ broken");
        assert!(matches!(result, Err(Error::Parse(_))));
        assert_eq!(dashboard.series().len(), 2);
        assert_eq!(dashboard.highlighted_index(), Some(1));
    }

    #[test]
    fn test_new_load_replaces_and_resets_cursor() {
        let mut dashboard = Dashboard::new();
        dashboard.load_str(TWO_INTERVALS).unwrap();
        dashboard.highlight(0).unwrap();

        dashboard
            .load_str(r#"{"aggregate": {}, "intermediate": [{}]}"#)
            .unwrap();
        assert_eq!(dashboard.series().len(), 1);
        assert!(dashboard.highlighted_row().is_none());
    }

    #[test]
    fn test_clear_highlight_drops_cursor() {
        let mut dashboard = Dashboard::new();
        dashboard.load_str(TWO_INTERVALS).unwrap();
        dashboard.highlight(1).unwrap();

        dashboard.clear_highlight();
        assert!(dashboard.highlighted_index().is_none());
        assert_eq!(dashboard.series().len(), 2);
    }

    #[test]
    fn test_highlight_out_of_range() {
        let mut dashboard = Dashboard::new();
        dashboard.load_str(TWO_INTERVALS).unwrap();

        let result = dashboard.highlight(5);
        assert!(matches!(
            result,
            Err(Error::RowOutOfRange { index: 5, len: 2 })
        ));
        assert!(dashboard.highlighted_index().is_none());
    }

    #[test]
    fn test_highlighted_row_matches_series() {
        let mut dashboard = Dashboard::new();
        dashboard.load_str(TWO_INTERVALS).unwrap();

        let rate = dashboard.highlight(1).unwrap().request_rate;
        assert_eq!(rate, 1.0);
        assert_eq!(dashboard.highlighted_row().map(|r| r.index), Some(1));

        let report = dashboard
            .report(&BreakdownAnalyzer::default())
            .unwrap()
            .unwrap();
        assert_eq!(report.series.len(), 2);
        assert_eq!(report.overview.total_requests, 20);
    }
}
