//! Error handling for the encoding advisor

use thiserror::Error;

/// Main error type for advisor operations
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Measurement failed: {0}")]
    Measurement(String),

    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for AdvisorError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut => {
                AdvisorError::Connection(err.to_string())
            }
            other => AdvisorError::Query(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AdvisorError {
    fn from(err: serde_json::Error) -> Self {
        AdvisorError::Serialization(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Result type alias for advisor operations (alias for Result)
pub type AdvisorResult<T> = std::result::Result<T, AdvisorError>;

/// Macro for creating measurement errors
#[macro_export]
macro_rules! measurement_err {
    ($msg:expr) => {
        $crate::common::error::AdvisorError::Measurement($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::AdvisorError::Measurement(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AdvisorError::Configuration("table is required".to_string());
        assert_eq!(format!("{}", err), "Configuration error: table is required");

        let err = measurement_err!("size of {} unavailable", "t1");
        assert_eq!(format!("{}", err), "Measurement failed: size of t1 unavailable");
    }

    #[test]
    fn test_sqlx_error_mapping() {
        let err: AdvisorError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AdvisorError::Query(_)));

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: AdvisorError = sqlx::Error::Io(io).into();
        assert!(matches!(err, AdvisorError::Connection(_)));
    }
}
