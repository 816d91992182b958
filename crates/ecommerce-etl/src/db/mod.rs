//! Database abstraction for the loader.
//!
//! A `Database` trait plus the DuckDB implementation, which either owns a
//! local database file or attaches PostgreSQL.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use self::duckdb::{DuckDbBackend, is_postgres_url};
pub use error::{DbError, DbResult};
pub use traits::Database;
