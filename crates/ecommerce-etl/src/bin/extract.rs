//! Extract stage: load the raw CSV datasets and print a sample of the orders.
//!
//! Purely diagnostic. Any read failure propagates and exits non-zero.

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use ecommerce_etl::Extractor;
use ecommerce_etl::cli::CommonArgs;
use ecommerce_etl::logging::init_logging;
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Load the raw e-commerce CSV datasets and print a sample of the orders"
)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Number of order rows to print
    #[arg(short = 'n', long, default_value = "5")]
    rows: usize,

    /// Print the stage report as JSON instead of the orders sample
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();
    init_logging(&args.common.log_level, args.common.quiet || args.json);

    let config = args.common.config_builder().sample_rows(args.rows).build()?;
    info!("Reading datasets from {}", config.raw_dir().display());

    let started = Instant::now();
    let extractor = Extractor::new(config);
    let raw = extractor.load_all()?;
    let report = extractor.report(&raw, started);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    // User-facing output, printed regardless of log level.
    println!("Orders Data Sample:");
    println!("{}", extractor.orders_sample(&raw));
    println!("\n{}", report);

    Ok(())
}
