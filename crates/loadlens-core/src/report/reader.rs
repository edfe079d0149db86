use super::types::ResultLog;
use crate::{Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct ResultLogReader;

impl ResultLogReader {
    /// Read and parse a results file from the given path
    pub fn from_file(path: &Path) -> Result<ResultLog> {
        tracing::debug!("Reading results file from: {}", path.display());

        Self::check_extension(path)?;

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let log: ResultLog = serde_json::from_reader(reader)?;

        tracing::info!(
            "Successfully parsed results file with {} intervals",
            log.intermediate.len()
        );

        Ok(log)
    }

    /// Parse a results document from a JSON string
    pub fn from_str(content: &str) -> Result<ResultLog> {
        tracing::debug!("Parsing results from string");

        let log: ResultLog = serde_json::from_str(content)?;

        tracing::info!(
            "Successfully parsed results from string with {} intervals",
            log.intermediate.len()
        );

        Ok(log)
    }

    /// Validate that interval records are chronological and do not overlap
    pub fn validate(log: &ResultLog) -> Result<()> {
        tracing::debug!("Validating results structure");

        if log.intermediate.is_empty() {
            tracing::warn!("Results file contains no intervals");
        }

        for (idx, pair) in log.intermediate.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);

            if let (Some(prev_first), Some(next_first)) =
                (prev.first_counter_at, next.first_counter_at)
                && next_first < prev_first
            {
                return Err(Error::InvalidStructure(format!(
                    "Interval {} starts before interval {}",
                    idx + 1,
                    idx
                )));
            }

            if let (Some(prev_last), Some(next_first)) =
                (prev.last_counter_at, next.first_counter_at)
                && next_first < prev_last
            {
                return Err(Error::InvalidStructure(format!(
                    "Interval {} overlaps interval {}",
                    idx + 1,
                    idx
                )));
            }
        }

        tracing::debug!("Results structure is valid");
        Ok(())
    }

    fn check_extension(path: &Path) -> Result<()> {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Ok(())
        } else {
            Err(Error::UnsupportedFile(path.display().to_string()))
        }
    }
}
