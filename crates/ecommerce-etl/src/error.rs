//! Error types for the ETL pipeline.
//!
//! Every failure kind a stage can hit has its own variant so callers can tell
//! a transient database outage apart from a broken input directory. Errors are
//! serializable so the binaries can emit them alongside `--json` reports.

use crate::db::DbError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the pipeline stages.
#[derive(Error, Debug)]
pub enum EtlError {
    /// One or more raw CSV inputs are absent from the data directory.
    #[error("Missing files in {}: {missing:?}", .dir.display())]
    MissingInputFiles { dir: PathBuf, missing: Vec<String> },

    /// A snapshot the loader expects was never produced.
    #[error("Missing snapshot file: {}", .0.display())]
    MissingSnapshot(PathBuf),

    /// A derived table ended up with zero rows.
    #[error("Refusing to write empty table '{0}'")]
    EmptyTable(String),

    /// The "one" side of a many-to-one join has repeated keys.
    #[error(
        "Join on '{key}' is not many-to-one: {duplicate_keys} key(s) appear more than once in {table}"
    )]
    JoinCardinality {
        table: String,
        key: String,
        duplicate_keys: usize,
    },

    /// A column a cleaning rule depends on is missing.
    #[error("Column '{column}' not found in {table}")]
    ColumnNotFound { table: String, column: String },

    /// The database table does not hold what the snapshot held.
    #[error("Table '{table}' has {actual} rows after load, expected {expected}")]
    RowCountMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Database client error.
    #[error(transparent)]
    Database(#[from] DbError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EtlError>,
    },
}

static_assertions::assert_impl_all!(EtlError: Send, Sync);

impl EtlError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EtlError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable code for the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingInputFiles { .. } => "MISSING_INPUT_FILES",
            Self::MissingSnapshot(_) => "MISSING_SNAPSHOT",
            Self::EmptyTable(_) => "EMPTY_TABLE",
            Self::JoinCardinality { .. } => "JOIN_CARDINALITY",
            Self::ColumnNotFound { .. } => "COLUMN_NOT_FOUND",
            Self::RowCountMismatch { .. } => "ROW_COUNT_MISMATCH",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Database(e) => e.error_code(),
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether running the stage again unchanged could succeed.
    ///
    /// Only database connectivity problems qualify; bad inputs stay bad.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Database(e) => e.is_retryable(),
            Self::WithContext { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for EtlError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        EtlError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for EtlError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EtlError", 3)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("retryable", &self.is_retryable())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, EtlError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EtlError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EtlError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            EtlError::EmptyTable("fact_orders".to_string()).error_code(),
            "EMPTY_TABLE"
        );
        assert_eq!(
            EtlError::MissingSnapshot(PathBuf::from("x.parquet")).error_code(),
            "MISSING_SNAPSHOT"
        );
    }

    #[test]
    fn test_missing_files_message_lists_every_file() {
        let error = EtlError::MissingInputFiles {
            dir: PathBuf::from("data"),
            missing: vec!["a.csv".to_string(), "b.csv".to_string()],
        };
        let msg = error.to_string();
        assert!(msg.contains("a.csv"));
        assert!(msg.contains("b.csv"));
    }

    #[test]
    fn test_is_retryable() {
        assert!(EtlError::Database(DbError::ConnectionError("refused".into())).is_retryable());
        assert!(!EtlError::Database(DbError::ExecutionError("syntax".into())).is_retryable());
        assert!(!EtlError::EmptyTable("dim_products".into()).is_retryable());
        assert!(
            EtlError::Database(DbError::ConnectionError("refused".into()))
                .with_context("Loading fact_orders")
                .is_retryable()
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = EtlError::ColumnNotFound {
            table: "orders".to_string(),
            column: "order_purchase_timestamp".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("order_purchase_timestamp"));
        assert!(json.contains("\"retryable\":false"));
    }

    #[test]
    fn test_with_context() {
        let error = EtlError::EmptyTable("dim_customers".to_string()).with_context("Writing snapshots");
        assert!(error.to_string().contains("Writing snapshots"));
        assert_eq!(error.error_code(), "EMPTY_TABLE");
    }
}
