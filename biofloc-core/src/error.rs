use thiserror::Error;

/// The coarse failure classes every caller has to distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Io,
    Validation,
}

#[derive(Debug, Error)]
pub enum BioflocError {
    #[error("Table file '{0}' does not exist")]
    TableNotFound(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error), // Correctly structured for context

    #[error("Water volume must be non-zero to compute stocking density")]
    ZeroVolume,

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Population count out of range: {0}")]
    PopulationOverflow(String),
}

impl BioflocError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BioflocError::TableNotFound(_) => ErrorKind::NotFound,
            BioflocError::FileIO(..) | BioflocError::CsvError(..) => ErrorKind::Io,
            BioflocError::ZeroVolume
            | BioflocError::InvalidDate(_)
            | BioflocError::PopulationOverflow(_) => ErrorKind::Validation,
        }
    }
}

pub type Result<T> = std::result::Result<T, BioflocError>;
