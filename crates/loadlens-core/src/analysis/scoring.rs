use super::RunKind;
use super::latency::response_time;
use crate::report::{Percentile, ResultLog};
use serde::{Deserialize, Serialize};

/// Multiple of the Apdex threshold that still counts as tolerated
const TOLERATED_MULTIPLIER: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Satisfied,
    Tolerated,
    Frustrated,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Satisfied => "satisfied",
            Rating::Tolerated => "tolerated",
            Rating::Frustrated => "frustrated",
        }
    }
}

/// Fixed thresholds in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Applied to p95
    pub apdex_threshold: f64,
    /// Applied to p99
    pub pass_threshold: f64,
}

impl ScoringPolicy {
    pub fn for_kind(kind: RunKind) -> Self {
        match kind {
            RunKind::Browser => Self {
                apdex_threshold: 100.0,
                pass_threshold: 200.0,
            },
            RunKind::Protocol => Self {
                apdex_threshold: 150.0,
                pass_threshold: 300.0,
            },
        }
    }

    pub fn rate(&self, p95: f64) -> Rating {
        if p95 < self.apdex_threshold {
            Rating::Satisfied
        } else if p95 <= self.apdex_threshold * TOLERATED_MULTIPLIER {
            Rating::Tolerated
        } else {
            Rating::Frustrated
        }
    }

    /// Both p99 and p95 must be under their thresholds
    pub fn passes(&self, p95: f64, p99: f64) -> bool {
        p99 < self.pass_threshold && p95 < self.apdex_threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub apdex: Rating,
    pub pass: bool,
    pub p95: f64,
    pub p99: f64,
    pub policy: ScoringPolicy,
}

/// Score a pair of response-time percentiles.
///
/// Absent data arrives here as 0 and therefore passes.
pub fn score(p95: f64, p99: f64, kind: RunKind) -> Score {
    let policy = ScoringPolicy::for_kind(kind);

    Score {
        apdex: policy.rate(p95),
        pass: policy.passes(p95, p99),
        p95,
        p99,
        policy,
    }
}

/// Score the aggregate record of a results file
pub fn score_log(log: &ResultLog, kind: RunKind) -> Score {
    let p95 = response_time(&log.aggregate, kind, Percentile::P95);
    let p99 = response_time(&log.aggregate, kind, Percentile::P99);

    let result = score(p95, p99, kind);
    tracing::debug!(
        "Scored {} run: p95={:.2}ms p99={:.2}ms -> {} ({})",
        kind.as_str(),
        p95,
        p99,
        result.apdex.as_str(),
        if result.pass { "PASS" } else { "FAIL" }
    );

    result
}
