//! Runs the weekly label strategy over a labeled daily-bar CSV export.
//!
//! ```text
//! cargo run --example weekly_labels -- <labeled_days.csv> [config.json] [report_dir]
//! ```

use std::{env, path::PathBuf, time::Instant};

use anyhow::{Context, Result, bail};
use label_trader::prelude::*;
use polars::prelude::{DataFrame, LazyCsvReader, LazyFileListReader, PlPath};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let mut args = env::args().skip(1);
    let Some(csv_path) = args.next() else {
        bail!("usage: weekly_labels <labeled_days.csv> [config.json] [report_dir]");
    };
    let cfg = match args.next() {
        Some(path) => BacktestConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load config {path}"))?,
        None => BacktestConfig::default(),
    };
    let report_dir = PathBuf::from(args.next().unwrap_or_else(|| "reports".to_string()));

    let start = Instant::now();
    let df = read_csv(&csv_path)?;
    let bars = daily_bars_from_df(&df).context("Failed to validate daily bars")?;
    info!(rows = bars.len(), path = %csv_path, "Loaded labeled daily bars");

    let backtest = Backtest::new(cfg)?;
    let outcomes = backtest.run_by_year(&bars)?;

    println!("Trading Strategy Results:");
    for yearly in &outcomes {
        print_year(yearly);
        yearly.outcome.history().to_csv(&report_dir)?;
    }

    println!("\nReports written to {}", report_dir.display());
    println!("Elapsed: {:?}", start.elapsed());
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

fn read_csv(path: &str) -> Result<DataFrame> {
    LazyCsvReader::new(PlPath::new(path))
        .with_has_header(true)
        .finish()
        .with_context(|| format!("Failed to scan {path}"))?
        .collect()
        .with_context(|| format!("Failed to read {path}"))
}

fn print_year(yearly: &YearlyOutcome) {
    let outcome = &yearly.outcome;
    println!("\n{} Results:", yearly.year);
    println!("{}", outcome.history().as_df());

    let Some(summary) = outcome.summary() else {
        println!("No decision steps were taken.");
        return;
    };
    let sigma = summary
        .std_dev
        .map_or_else(|| "n/a".to_string(), |s| format!("${s}"));

    println!("The mean is ${}", summary.mean);
    println!("The sigma is {sigma}");
    println!("The min is ${}", summary.min);
    println!("The max is ${}", summary.max);
    println!("The final value of the account is ${}", summary.final_balance);

    let streaks = outcome.streaks();
    println!("Flat weeks are skipped when counting streaks");
    println!("Max number of monotonically increasing weeks: {}", streaks.max_increasing);
    println!(
        "Max number of monotonically decreasing weeks: {}",
        streaks.max_non_increasing
    );
}
