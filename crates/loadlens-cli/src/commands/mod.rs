pub mod breakdown;
pub mod completion;
pub mod report;
pub mod score;
pub mod series;
pub mod summary;

use anyhow::Result;
use loadlens_core::report::{ResultLog, ResultLogReader};
use std::path::Path;

/// Read a results file, warning about structural problems without failing
pub(crate) fn load_log(file: &Path) -> Result<ResultLog> {
    let log = ResultLogReader::from_file(file)?;

    if let Err(e) = ResultLogReader::validate(&log) {
        tracing::warn!("{}", e);
    }

    Ok(log)
}

/// Display name for a results file
pub(crate) fn file_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Render a millisecond value the way every view prints latencies
pub(crate) fn ms(value: f64) -> String {
    format!("{:.1} ms", value)
}
