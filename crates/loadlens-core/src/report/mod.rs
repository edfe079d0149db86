pub mod metrics;
mod reader;
mod types;

pub use metrics::{CounterMetric, PageMetric, Percentile, SummaryMetric};
pub use reader::ResultLogReader;
pub use types::*;
