//! Transform stage: clean the raw datasets and write parquet snapshots.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use ecommerce_etl::cli::{CliCompression, CommonArgs};
use ecommerce_etl::logging::init_logging;
use ecommerce_etl::{EtlError, StageReport, Transformer};
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean and join the raw datasets into parquet snapshots under data/processed"
)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Snapshot compression codec
    #[arg(long, value_enum, default_value = "snappy")]
    compression: CliCompression,

    /// Print the stage report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn run(args: &Args) -> Result<StageReport> {
    let config = args
        .common
        .config_builder()
        .compression(args.compression.into())
        .build()?;
    let report = Transformer::new(config)
        .run()
        .context("Transform stage failed")?;
    Ok(report)
}

fn main() {
    dotenv().ok();
    let args = Args::parse();
    init_logging(&args.common.log_level, args.common.quiet || args.json);

    match run(&args) {
        Ok(report) if args.json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Could not serialize report: {}", e);
                std::process::exit(1);
            }
        },
        Ok(report) => println!("\n{}", report),
        Err(e) => {
            error!("{:?}", e);
            if args.json
                && let Some(etl_error) = e.downcast_ref::<EtlError>()
                && let Ok(json) = serde_json::to_string_pretty(etl_error)
            {
                println!("{}", json);
            }
            std::process::exit(1);
        }
    }
}
