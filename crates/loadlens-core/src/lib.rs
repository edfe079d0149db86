pub mod analysis;
pub mod dashboard;
pub mod error;
pub mod report;

pub use dashboard::Dashboard;
pub use error::{Error, Result};
