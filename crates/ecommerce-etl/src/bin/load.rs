//! Load stage: replace the database tables with the parquet snapshots.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use ecommerce_etl::cli::{CommonArgs, DatabaseArgs};
use ecommerce_etl::logging::init_logging;
use ecommerce_etl::{EtlError, Loader, StageReport};
use tracing::{error, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Bulk-load the parquet snapshots in data/processed into the target database"
)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    database: DatabaseArgs,

    /// Print the stage report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn run(args: &Args) -> Result<StageReport> {
    let config = args
        .common
        .config_builder()
        .database_url(&args.database.database_url)
        .build()?;
    let loader = Loader::connect(config).context("Connecting to the target database")?;
    let report = loader.run().context("Load stage failed")?;
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
            if let Some(etl_error) = e.downcast_ref::<EtlError>() {
                if etl_error.is_retryable() {
                    warn!("The database looks unreachable; rerunning the loader may succeed");
                }
                if args.json
                    && let Ok(json) = serde_json::to_string_pretty(etl_error)
                {
                    println!("{}", json);
                }
            }
            std::process::exit(1);
        }
    }
}
