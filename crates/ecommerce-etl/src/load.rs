//! Load stage: bulk-write the parquet snapshots into the target database.

use crate::config::EtlConfig;
use crate::db::{Database, DuckDbBackend};
use crate::error::{EtlError, Result, ResultExt};
use crate::report::{Stage, StageReport, TableSummary};
use crate::snapshot::read_snapshot;
use crate::tables::Table;
use std::time::Instant;
use tracing::info;

/// Reads `<root>/data/processed/*.parquet` and replaces the like-named tables.
pub struct Loader<D: Database> {
    config: EtlConfig,
    db: D,
}

impl Loader<DuckDbBackend> {
    /// Connect to `config.database_url`.
    pub fn connect(config: EtlConfig) -> Result<Self> {
        let db = DuckDbBackend::connect(&config.database_url)?;
        Ok(Self::new(config, db))
    }
}

impl<D: Database> Loader<D> {
    pub fn new(config: EtlConfig, db: D) -> Self {
        Self { config, db }
    }

    pub fn database(&self) -> &D {
        &self.db
    }

    /// Load one snapshot, replacing the table of the same name.
    pub fn load_table(&self, table: Table) -> Result<TableSummary> {
        let path = self.config.processed_dir().join(table.snapshot_file_name());
        info!("Loading {} from {}", table.snapshot_file_name(), path.display());

        let df = read_snapshot(&path)?;
        info!("Read {} rows from {}", df.height(), table.snapshot_file_name());

        self.db
            .replace_table_from_parquet(table.name(), &path)
            .map_err(EtlError::from)
            .context(format!("Loading {}", table))?;

        let loaded = self.db.table_row_count(table.name())?;
        if loaded != df.height() {
            return Err(EtlError::RowCountMismatch {
                table: table.name().to_string(),
                expected: df.height(),
                actual: loaded,
            });
        }
        info!("Loaded {} ({} rows)", table, loaded);

        Ok(TableSummary {
            name: table.name().to_string(),
            rows: loaded,
            columns: df.width(),
            path,
        })
    }

    /// Load every snapshot in [`Table::LOAD_ORDER`], stopping at the first failure.
    ///
    /// Tables loaded before a failure stay in the database.
    pub fn run(&self) -> Result<StageReport> {
        let started = Instant::now();
        info!(
            "Loading {} into {}",
            self.config.processed_dir().display(),
            self.db.db_type()
        );

        let mut summaries = Vec::with_capacity(Table::LOAD_ORDER.len());
        for table in Table::LOAD_ORDER {
            summaries.push(self.load_table(table)?);
        }

        info!("All data loaded successfully");
        Ok(StageReport::new(Stage::Load, summaries, started))
    }
}
