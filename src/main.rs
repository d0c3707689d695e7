use anyhow::Result;
use clap::Parser;
use daysplit::split_by_day;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_RAW_DATA_PATH: &str = "./data/raw/fraudTrain.csv";
const DEFAULT_OUTPUT_DIR: &str = "./data/processed/";
const DEFAULT_DATE_FIELD: &str = "trans_date_trans_time";

/// Split a dated CSV into one file per calendar day.
#[derive(Parser)]
#[command(name = "daysplit", version)]
#[command(about = "Split a dated CSV into one file per calendar day")]
struct Cli {
    /// Path to the raw CSV file
    #[arg(long, default_value = DEFAULT_RAW_DATA_PATH)]
    input: PathBuf,

    /// Directory to write the per-day CSV files
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Column holding each record's date
    #[arg(long, default_value = DEFAULT_DATE_FIELD)]
    date_field: String,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();
    let created_files = split_by_day(&cli.input, &cli.output, &cli.date_field)?;
    info!(files = created_files, "successfully split data by day");
    info!("finished splitting data by day");
    Ok(())
}
