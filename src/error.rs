//! Error types for market_sync

use thiserror::Error;

/// Unified error type for market_sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status code
    #[error("unexpected HTTP status: {0}")]
    Status(reqwest::StatusCode),

    /// Failed to parse a JSON response
    #[error("failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stock feed archive could not be read
    #[error("failed to read feed archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Stock feed spreadsheet could not be parsed
    #[error("failed to parse feed spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::XlsError),

    /// The downloaded archive contains no .xls entry
    #[error("feed archive contains no spreadsheet")]
    NoSpreadsheet,

    /// The spreadsheet header row lacks a required column
    #[error("feed spreadsheet is missing column {0:?}")]
    MissingColumn(&'static str),

    /// A feed row carries a quantity that is neither a bucket marker nor a number
    #[error("invalid quantity {value:?} for product {code}")]
    Quantity { code: String, value: String },

    /// A feed row carries a price with no digits before the decimal point
    #[error("invalid price {value:?} for product {code}")]
    Price { code: String, value: String },

    /// A required environment variable is not set
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// Coarse failure classification used by the orchestrator's diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request exceeded its deadline
    Timeout,
    /// The endpoint could not be reached at all
    Connection,
    /// Anything else, including malformed responses
    Other,
}

impl Error {
    /// Classify this error into one of the orchestrator's three buckets.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Error::Http(e) if e.is_timeout() => FailureKind::Timeout,
            Error::Http(e) if e.is_connect() => FailureKind::Connection,
            _ => FailureKind::Other,
        }
    }
}

/// Result alias for market_sync operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_http_errors_classify_as_other() {
        let err = Error::NoSpreadsheet;
        assert_eq!(err.failure_kind(), FailureKind::Other);

        let err = Error::Quantity {
            code: "A1".to_string(),
            value: "many".to_string(),
        };
        assert_eq!(err.failure_kind(), FailureKind::Other);
    }

    #[test]
    fn error_messages_name_the_offending_value() {
        let err = Error::Quantity {
            code: "A1".to_string(),
            value: "many".to_string(),
        };
        assert_eq!(err.to_string(), "invalid quantity \"many\" for product A1");

        let err = Error::MissingColumn("Цена");
        assert!(err.to_string().contains("Цена"));
    }
}
