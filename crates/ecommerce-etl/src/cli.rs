//! Command-line arguments shared by the stage binaries.
//!
//! Every flag has a default (or an environment variable), so each stage runs
//! with no arguments at all.

use crate::config::{DEFAULT_DATABASE_URL, EtlConfig, EtlConfigBuilder, SnapshotCompression};
use crate::error::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// CLI-compatible snapshot compression enum
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliCompression {
    /// Snappy (default)
    Snappy,
    /// Zstandard
    Zstd,
    /// No compression
    None,
}

impl From<CliCompression> for SnapshotCompression {
    fn from(cli: CliCompression) -> Self {
        match cli {
            CliCompression::Snappy => SnapshotCompression::Snappy,
            CliCompression::Zstd => SnapshotCompression::Zstd,
            CliCompression::None => SnapshotCompression::Uncompressed,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Project root containing data/ and data/processed/
    #[arg(long, env = "ETL_PROJECT_ROOT", default_value = ".")]
    pub project_root: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl CommonArgs {
    pub fn config_builder(&self) -> EtlConfigBuilder {
        EtlConfig::builder().project_root(&self.project_root)
    }

    pub fn to_config(&self) -> Result<EtlConfig> {
        Ok(self.config_builder().build()?)
    }
}

#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Target database: postgres URL, DuckDB file path, or :memory:
    #[arg(long, env = "ETL_DATABASE_URL", default_value = DEFAULT_DATABASE_URL, hide_env_values = true)]
    pub database_url: String,
}
