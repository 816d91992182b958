//! Extract stage: read the raw CSV datasets into DataFrames.

use crate::config::EtlConfig;
use crate::error::{EtlError, Result, ResultExt};
use crate::report::{Stage, StageReport, TableSummary};
use crate::tables::Dataset;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// The four raw inputs, as read from disk.
#[derive(Debug, Clone)]
pub struct RawDatasets {
    pub orders: DataFrame,
    pub order_items: DataFrame,
    pub products: DataFrame,
    pub customers: DataFrame,
}

impl RawDatasets {
    pub fn get(&self, dataset: Dataset) -> &DataFrame {
        match dataset {
            Dataset::Orders => &self.orders,
            Dataset::OrderItems => &self.order_items,
            Dataset::Products => &self.products,
            Dataset::Customers => &self.customers,
        }
    }
}

/// File names of required inputs that are absent from `raw_dir`.
pub fn missing_inputs(raw_dir: &Path) -> Vec<String> {
    Dataset::ALL
        .iter()
        .filter(|dataset| !raw_dir.join(dataset.file_name()).is_file())
        .map(|dataset| dataset.file_name().to_string())
        .collect()
}

/// Fail with [`EtlError::MissingInputFiles`] unless every input is present.
pub fn ensure_inputs_present(raw_dir: &Path) -> Result<()> {
    let missing = missing_inputs(raw_dir);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(EtlError::MissingInputFiles {
            dir: raw_dir.to_path_buf(),
            missing,
        })
    }
}

/// Read one CSV file with a header row.
pub fn read_csv(path: &Path, infer_schema_length: Option<usize>) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Reads the raw datasets from `<root>/data`.
pub struct Extractor {
    config: EtlConfig,
}

impl Extractor {
    pub fn new(config: EtlConfig) -> Self {
        Self { config }
    }

    /// Read a single dataset.
    pub fn load(&self, dataset: Dataset) -> Result<DataFrame> {
        let path = self.config.raw_dir().join(dataset.file_name());
        debug!("Reading {} from {}", dataset, path.display());
        let df = read_csv(&path, self.config.infer_schema_length)
            .context(format!("Reading {}", path.display()))?;
        info!("Loaded {}: {:?}", dataset, df.shape());
        Ok(df)
    }

    /// Read all four datasets.
    pub fn load_all(&self) -> Result<RawDatasets> {
        Ok(RawDatasets {
            orders: self.load(Dataset::Orders)?,
            order_items: self.load(Dataset::OrderItems)?,
            products: self.load(Dataset::Products)?,
            customers: self.load(Dataset::Customers)?,
        })
    }

    /// Summarize what [`Extractor::load_all`] read, one row per input file.
    pub fn report(&self, raw: &RawDatasets, started: Instant) -> StageReport {
        let raw_dir = self.config.raw_dir();
        let tables = Dataset::ALL
            .iter()
            .map(|dataset| {
                let df = raw.get(*dataset);
                TableSummary {
                    name: dataset.name().to_string(),
                    rows: df.height(),
                    columns: df.width(),
                    path: raw_dir.join(dataset.file_name()),
                }
            })
            .collect();
        StageReport::new(Stage::Extract, tables, started)
    }

    /// First rows of `orders`, sized by `sample_rows`.
    pub fn orders_sample(&self, raw: &RawDatasets) -> DataFrame {
        raw.orders.head(Some(self.config.sample_rows))
    }
}
