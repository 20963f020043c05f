use chrono::NaiveDate;
use clap::{Parser, command};
use std::path::PathBuf;

/// Daily driver for the external HRR routing model
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory holding the daily runoff forcing files (YYYYMMDD.txt)
    pub runoff_dir: PathBuf,

    /// First simulated day (YYYY-MM-DD)
    pub start: NaiveDate,

    /// Stop date, exclusive (YYYY-MM-DD)
    pub end: NaiveDate,

    /// Model configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Directory the input deck and model output land in
    #[arg(short, long, default_value = "out")]
    pub out_dir: PathBuf,

    /// Restart state file handed to the model
    #[arg(long, default_value = "restart.txt")]
    pub restart: PathBuf,

    /// Accumulating results CSV
    #[arg(long, default_value = "discharge.csv")]
    pub results: PathBuf,

    /// Assimilation-update flag written to the deck's first line
    #[arg(long, default_value = "normal")]
    pub mode: String,

    /// Run make clean/all in the model source tree before simulating
    #[arg(long)]
    pub compile: bool,
}
