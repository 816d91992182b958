//! Error types for the database layer

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Could not open or attach the target database
    #[error("Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement failed (permissions, schema mismatch, bad SQL)
    #[error("SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found
    #[error("Table not found: {0}")]
    TableNotFound(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionError(_) => "DB_CONNECTION",
            Self::ExecutionError(_) => "DB_EXECUTION",
            Self::TableNotFound(_) => "DB_TABLE_NOT_FOUND",
        }
    }

    /// Connectivity failures are the only ones worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error carries no structured kind, so classify on the message.
        let msg = err.to_string();
        if msg.contains("Table with name")
            || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not found"))
        {
            DbError::TableNotFound(msg)
        } else if msg.contains("could not connect")
            || msg.contains("Connection refused")
            || msg.contains("Unable to connect")
            || msg.contains("IO Error: Could not set lock")
        {
            DbError::ConnectionError(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_connection_errors_retry() {
        assert!(DbError::ConnectionError("refused".into()).is_retryable());
        assert!(!DbError::ExecutionError("permission denied".into()).is_retryable());
        assert!(!DbError::TableNotFound("fact_orders".into()).is_retryable());
    }
}
