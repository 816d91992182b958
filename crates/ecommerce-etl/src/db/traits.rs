//! Database trait definition

use crate::db::error::DbResult;
use std::path::Path;

/// The small slice of a SQL database the loader needs.
///
/// Everything is synchronous: the loader issues one statement at a time and
/// waits for it.
pub trait Database {
    /// Execute multiple SQL statements
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Drop `table` if present and recreate it from the parquet file at `path`
    fn replace_table_from_parquet(&self, table: &str, path: &Path) -> DbResult<()>;

    /// Number of rows currently in `table`
    fn table_row_count(&self, table: &str) -> DbResult<usize>;

    /// Check if a table exists
    fn relation_exists(&self, table: &str) -> DbResult<bool>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
