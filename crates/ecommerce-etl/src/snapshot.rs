//! Parquet snapshot files: one compressed file per derived table.

use crate::config::SnapshotCompression;
use crate::error::{EtlError, Result, ResultExt};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Write `df` to `path`, replacing any existing file.
pub fn write_snapshot(
    df: &mut DataFrame,
    path: &Path,
    compression: SnapshotCompression,
) -> Result<u64> {
    let file = File::create(path).context(format!("Creating {}", path.display()))?;
    let bytes = ParquetWriter::new(file)
        .with_compression(compression.into())
        .finish(df)
        .context(format!("Writing {}", path.display()))?;
    info!(
        "Wrote {} rows to {} ({} bytes)",
        df.height(),
        path.display(),
        bytes
    );
    Ok(bytes)
}

/// Read a snapshot back into a DataFrame.
pub fn read_snapshot(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(EtlError::MissingSnapshot(path.to_path_buf()));
    }
    let file = File::open(path).context(format!("Opening {}", path.display()))?;
    let df = ParquetReader::new(file)
        .finish()
        .context(format!("Reading {}", path.display()))?;
    Ok(df)
}
