use crate::report::ResultLog;
use crate::report::metrics::is_browser_key;
use serde::{Deserialize, Serialize};

/// Origin of a results file, which decides the metric families to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunKind {
    /// Browser-automation run (page loads, web vitals)
    Browser,
    /// Traditional protocol-level load run
    Protocol,
}

impl RunKind {
    /// Classify a log by the counters of its aggregate record.
    ///
    /// Interval records are not consulted: a log where only some intervals
    /// carry `browser.*` counters is classified by the aggregate alone.
    pub fn classify(log: &ResultLog) -> Self {
        let browser = log.aggregate.counters.keys().any(|k| is_browser_key(k));

        tracing::debug!(
            "Classified results as {} run",
            if browser { "browser" } else { "protocol" }
        );

        if browser {
            RunKind::Browser
        } else {
            RunKind::Protocol
        }
    }

    pub fn is_browser(&self) -> bool {
        matches!(self, RunKind::Browser)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunKind::Browser => "browser",
            RunKind::Protocol => "protocol",
        }
    }
}

/// True iff any aggregate counter is in the `browser.` namespace
pub fn is_browser_run(log: &ResultLog) -> bool {
    RunKind::classify(log).is_browser()
}
