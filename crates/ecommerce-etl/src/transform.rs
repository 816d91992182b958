//! Transform stage: clean and join the raw datasets, then write parquet snapshots.

use crate::cleaner::{clean_customers, clean_orders, clean_products, join_order_details};
use crate::config::EtlConfig;
use crate::error::{EtlError, Result, ResultExt};
use crate::extract::{Extractor, RawDatasets, ensure_inputs_present};
use crate::report::{Stage, StageReport, TableSummary};
use crate::snapshot::write_snapshot;
use crate::tables::Table;
use polars::prelude::*;
use std::fs;
use std::time::Instant;
use tracing::info;

/// The four tables the transformer produces.
#[derive(Debug, Clone)]
pub struct DerivedTables {
    pub fact_orders: DataFrame,
    pub fact_order_details: DataFrame,
    pub dim_products: DataFrame,
    pub dim_customers: DataFrame,
}

impl DerivedTables {
    /// Apply every cleaning rule to the raw datasets.
    pub fn derive(raw: RawDatasets) -> Result<Self> {
        let fact_orders = clean_orders(raw.orders)?;
        let dim_products = clean_products(raw.products)?;
        let fact_order_details = join_order_details(&raw.order_items, &dim_products)?;
        let dim_customers = clean_customers(raw.customers)?;

        Ok(Self {
            fact_orders,
            fact_order_details,
            dim_products,
            dim_customers,
        })
    }

    pub fn get(&self, table: Table) -> &DataFrame {
        match table {
            Table::FactOrders => &self.fact_orders,
            Table::FactOrderDetails => &self.fact_order_details,
            Table::DimProducts => &self.dim_products,
            Table::DimCustomers => &self.dim_customers,
        }
    }

    fn get_mut(&mut self, table: Table) -> &mut DataFrame {
        match table {
            Table::FactOrders => &mut self.fact_orders,
            Table::FactOrderDetails => &mut self.fact_order_details,
            Table::DimProducts => &mut self.dim_products,
            Table::DimCustomers => &mut self.dim_customers,
        }
    }

    /// Fail with [`EtlError::EmptyTable`] for the first table with no rows.
    pub fn ensure_non_empty(&self) -> Result<()> {
        match Table::ALL.into_iter().find(|t| self.get(*t).height() == 0) {
            Some(table) => Err(EtlError::EmptyTable(table.name().to_string())),
            None => Ok(()),
        }
    }
}

/// Reads `<root>/data/*.csv` and writes `<root>/data/processed/*.parquet`.
pub struct Transformer {
    config: EtlConfig,
}

impl Transformer {
    pub fn new(config: EtlConfig) -> Self {
        Self { config }
    }

    /// Run the whole stage.
    ///
    /// Inputs are checked before anything is read and every table is checked
    /// for emptiness before the first snapshot is written. A write failure part
    /// way through still leaves the earlier snapshots on disk.
    pub fn run(&self) -> Result<StageReport> {
        let started = Instant::now();
        let raw_dir = self.config.raw_dir();
        let processed_dir = self.config.processed_dir();

        info!("Project root: {}", self.config.project_root.display());
        info!("Processed data directory: {}", processed_dir.display());

        fs::create_dir_all(&processed_dir)
            .context(format!("Creating {}", processed_dir.display()))?;
        ensure_inputs_present(&raw_dir)?;

        let raw = Extractor::new(self.config.clone()).load_all()?;
        let mut tables = DerivedTables::derive(raw)?;
        tables.ensure_non_empty()?;

        let mut summaries = Vec::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            let path = processed_dir.join(table.snapshot_file_name());
            let df = tables.get_mut(table);
            write_snapshot(df, &path, self.config.compression)
                .context(format!("Saving {}", table))?;
            summaries.push(TableSummary {
                name: table.name().to_string(),
                rows: df.height(),
                columns: df.width(),
                path,
            });
        }

        info!("Data cleaning and transformation complete");
        Ok(StageReport::new(Stage::Transform, summaries, started))
    }
}
