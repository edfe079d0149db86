use super::RunKind;
use crate::report::metrics::HTTP_RESPONSE_TIME;
use crate::report::{LogEntry, PageMetric, Percentile, SummaryMetric};

/// Count-weighted average of one percentile across a page metric family.
///
/// Computes `sum(stat[p] * count) / sum(count)` over every
/// `browser.page.<METRIC>.*` summary. Returns 0 when no key matches or the
/// total count is zero.
pub fn weighted_page_percentile(entry: &LogEntry, metric: PageMetric, percentile: Percentile) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_count = 0u64;

    for (key, stats) in &entry.summaries {
        if let SummaryMetric::Page { metric: m, .. } = SummaryMetric::parse(key)
            && m == metric
        {
            weighted_sum += percentile.value_of(stats) * stats.count as f64;
            total_count = total_count.saturating_add(stats.count);
        }
    }

    if total_count == 0 {
        0.0
    } else {
        weighted_sum / total_count as f64
    }
}

/// Largest maximum seen across a page metric family, 0 when absent
pub fn page_family_max(entry: &LogEntry, metric: PageMetric) -> f64 {
    entry
        .summaries
        .iter()
        .filter(|(key, stats)| {
            stats.has_data()
                && matches!(SummaryMetric::parse(key), SummaryMetric::Page { metric: m, .. } if m == metric)
        })
        .map(|(_, stats)| stats.max)
        .fold(0.0, f64::max)
}

/// Response time percentile under the run's classification.
///
/// Browser runs aggregate the TTFB family; protocol runs read
/// `http.response_time` directly.
pub fn response_time(entry: &LogEntry, kind: RunKind, percentile: Percentile) -> f64 {
    match kind {
        RunKind::Browser => weighted_page_percentile(entry, PageMetric::Ttfb, percentile),
        RunKind::Protocol => entry.percentile(HTTP_RESPONSE_TIME, percentile),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SummaryStats;

    fn stats(count: u64, p95: f64, max: f64) -> SummaryStats {
        SummaryStats {
            count,
            p95,
            max,
            ..Default::default()
        }
    }

    #[test]
    fn test_weighted_average_no_keys_is_zero() {
        let entry = LogEntry::default();
        assert_eq!(
            weighted_page_percentile(&entry, PageMetric::Ttfb, Percentile::P95),
            0.0
        );
    }

    #[test]
    fn test_weighted_average_single_key_is_identity() {
        let mut entry = LogEntry::default();
        entry.summaries.insert(
            "browser.page.TTFB.https://example.com/".to_string(),
            stats(7, 123.0, 200.0),
        );

        assert_eq!(
            weighted_page_percentile(&entry, PageMetric::Ttfb, Percentile::P95),
            123.0
        );
    }

    #[test]
    fn test_weighted_average_across_keys() {
        let mut entry = LogEntry::default();
        entry.summaries.insert(
            "browser.page.TTFB.https://example.com/a".to_string(),
            stats(1, 100.0, 100.0),
        );
        entry.summaries.insert(
            "browser.page.TTFB.https://example.com/b".to_string(),
            stats(3, 200.0, 300.0),
        );
        // Different family, must not contribute
        entry.summaries.insert(
            "browser.page.FCP.https://example.com/a".to_string(),
            stats(100, 9999.0, 9999.0),
        );

        assert_eq!(
            weighted_page_percentile(&entry, PageMetric::Ttfb, Percentile::P95),
            175.0
        );
        assert_eq!(page_family_max(&entry, PageMetric::Ttfb), 300.0);
    }

    #[test]
    fn test_weighted_average_zero_counts_is_zero() {
        let mut entry = LogEntry::default();
        entry.summaries.insert(
            "browser.page.LCP.https://example.com/".to_string(),
            stats(0, 500.0, 500.0),
        );

        assert_eq!(
            weighted_page_percentile(&entry, PageMetric::Lcp, Percentile::P95),
            0.0
        );
    }

    #[test]
    fn test_weighted_average_saturates_total_count() {
        let mut entry = LogEntry::default();
        entry.summaries.insert(
            "browser.page.TTFB.https://example.com/a".to_string(),
            stats(u64::MAX, 100.0, 100.0),
        );
        entry.summaries.insert(
            "browser.page.TTFB.https://example.com/b".to_string(),
            stats(1, 100.0, 100.0),
        );

        assert_eq!(
            weighted_page_percentile(&entry, PageMetric::Ttfb, Percentile::P95),
            100.0
        );
    }

    #[test]
    fn test_protocol_response_time_reads_summary() {
        let mut entry = LogEntry::default();
        entry
            .summaries
            .insert("http.response_time".to_string(), stats(10, 88.0, 120.0));

        assert_eq!(response_time(&entry, RunKind::Protocol, Percentile::P95), 88.0);
        assert_eq!(response_time(&entry, RunKind::Browser, Percentile::P95), 0.0);
    }
}
