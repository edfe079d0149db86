use super::metrics::Percentile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level results document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultLog {
    pub aggregate: LogEntry,
    pub intermediate: Vec<LogEntry>,
    #[serde(rename = "testId", default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RunMetadata>,
}

/// One reporting window, or the whole-run aggregate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub counters: BTreeMap<String, u64>,
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
    #[serde(default)]
    pub summaries: BTreeMap<String, SummaryStats>,
    #[serde(default)]
    pub histograms: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(rename = "firstCounterAt", default, skip_serializing_if = "Option::is_none")]
    pub first_counter_at: Option<i64>,
    #[serde(rename = "lastCounterAt", default, skip_serializing_if = "Option::is_none")]
    pub last_counter_at: Option<i64>,
}

/// Distribution summary for a single metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub mean: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p50: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(default)]
    pub p75: f64,
    #[serde(default)]
    pub p90: f64,
    #[serde(default)]
    pub p95: f64,
    #[serde(default)]
    pub p99: f64,
    #[serde(default)]
    pub p999: f64,
}

impl SummaryStats {
    pub fn has_data(&self) -> bool {
        self.count > 0
    }
}

/// Run-level metadata attached by the load-testing tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunMetadata {
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(
        rename = "artilleryVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tool_version: Option<serde_json::Value>,
}

impl RunMetadata {
    /// Tool version as display text.
    ///
    /// Accepts either a plain string or an object carrying a `core` field.
    pub fn tool_version(&self) -> Option<String> {
        match self.tool_version.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(map) => match map.get("core") {
                Some(serde_json::Value::String(core)) => Some(core.clone()),
                _ => Some(serde_json::Value::Object(map.clone()).to_string()),
            },
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl LogEntry {
    /// Counter value, zero when the counter was never emitted
    pub fn counter(&self, key: &str) -> u64 {
        self.counters.get(key).copied().unwrap_or(0)
    }

    /// Precomputed rate, zero when absent
    pub fn rate(&self, key: &str) -> f64 {
        self.rates.get(key).copied().unwrap_or(0.0)
    }

    /// Summary with at least one observation.
    ///
    /// A summary with `count == 0` is reported as `None`: it carries no data,
    /// not a zero duration.
    pub fn summary(&self, key: &str) -> Option<&SummaryStats> {
        self.summaries.get(key).filter(|s| s.has_data())
    }

    /// Percentile of a summary, zero when there is no data
    pub fn percentile(&self, key: &str, percentile: Percentile) -> f64 {
        self.summary(key)
            .map(|s| percentile.value_of(s))
            .unwrap_or(0.0)
    }

    /// Length of the window in seconds, never below one
    pub fn period_seconds(&self) -> f64 {
        let first = self.first_counter_at.unwrap_or(0);
        let last = self.last_counter_at.unwrap_or(first);
        let secs = (last - first) as f64 / 1000.0;
        secs.max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_bounds(first: Option<i64>, last: Option<i64>) -> LogEntry {
        LogEntry {
            first_counter_at: first,
            last_counter_at: last,
            ..Default::default()
        }
    }

    #[test]
    fn test_period_seconds_floor() {
        assert_eq!(entry_with_bounds(Some(5000), Some(5000)).period_seconds(), 1.0);
        assert_eq!(entry_with_bounds(Some(5000), Some(5400)).period_seconds(), 1.0);
        assert_eq!(entry_with_bounds(None, None).period_seconds(), 1.0);
        // Out-of-order bounds still floor at one second
        assert_eq!(entry_with_bounds(Some(9000), Some(1000)).period_seconds(), 1.0);
    }

    #[test]
    fn test_period_seconds_regular_window() {
        let entry = entry_with_bounds(Some(1_700_000_000_000), Some(1_700_000_010_000));
        assert_eq!(entry.period_seconds(), 10.0);
    }

    #[test]
    fn test_missing_counter_and_rate_default_to_zero() {
        let entry = LogEntry::default();
        assert_eq!(entry.counter("http.requests"), 0);
        assert_eq!(entry.rate("http.request_rate"), 0.0);
        assert!(entry.summary("http.response_time").is_none());
    }

    #[test]
    fn test_empty_summary_is_no_data() {
        let mut entry = LogEntry::default();
        entry.summaries.insert(
            "http.response_time".to_string(),
            SummaryStats {
                count: 0,
                p95: 42.0,
                ..Default::default()
            },
        );

        assert!(entry.summary("http.response_time").is_none());
        assert_eq!(entry.percentile("http.response_time", Percentile::P95), 0.0);
    }

    #[test]
    fn test_tool_version_forms() {
        let plain = RunMetadata {
            tool_version: Some(serde_json::json!("2.0.21")),
            ..Default::default()
        };
        assert_eq!(plain.tool_version().as_deref(), Some("2.0.21"));

        let nested = RunMetadata {
            tool_version: Some(serde_json::json!({"core": "2.0.21", "pro": "1.2"})),
            ..Default::default()
        };
        assert_eq!(nested.tool_version().as_deref(), Some("2.0.21"));

        assert!(RunMetadata::default().tool_version().is_none());
    }
}
