use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod deck;
mod driver;
mod error;
mod io;
mod workdir;

use cli::Args;
use driver::{Hrr, RunFlag};
use io::results::{WriteMode, append_output};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    anyhow::ensure!(
        args.start < args.end,
        "start date {} is not before end date {}",
        args.start,
        args.end
    );

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create output directory {:?}", args.out_dir))?;

    let hrr = Hrr::new(&args.config, args.compile)
        .with_context(|| format!("Failed to initialize model from {:?}", args.config))?;

    let total_days = (args.end - args.start).num_days();
    info!(start = %args.start, end = %args.end, days = total_days, "starting daily simulation");

    let pb = ProgressBar::new(total_days as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days ({eta})")?
            .progress_chars("#>-"),
    );

    // First day cold-starts the model and truncates the results file;
    // every later day restarts from the state the previous day wrote.
    let mut date = args.start;
    let mut flag = RunFlag::Initial;
    let mut mode = WriteMode::Write;
    while date < args.end {
        let (row, next) = hrr
            .run_day(
                date,
                flag,
                &args.restart,
                &args.runoff_dir,
                &args.mode,
                &args.out_dir,
            )
            .with_context(|| format!("Simulation failed on {date}"))?;
        append_output(&row, &args.results, mode)
            .with_context(|| format!("Failed to write results for {date}"))?;

        date = next;
        flag = RunFlag::Restart;
        mode = WriteMode::Append;
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!(
        "Simulation complete. Results saved to {}",
        args.results.display()
    );
    Ok(())
}
