use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read results file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse results file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported file: {0} (expected a .json results file)")]
    UnsupportedFile(String),

    #[error("Invalid results structure: {0}")]
    InvalidStructure(String),

    #[error("Row {index} is out of range ({len} rows)")]
    RowOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
