use std::path::PathBuf;

use label_trader::prelude::*;
use polars::prelude::{DataFrame, LazyCsvReader, LazyFileListReader, PlPath};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn read_fixture(name: &str) -> DataFrame {
    let pb = fixture_path(name);
    let path = PlPath::new(
        pb.as_os_str()
            .to_str()
            .expect("failed to convert fixture path to string"),
    );

    LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()
        .expect("failed to create LazyFrame from CSV")
        .collect()
        .expect("failed to collect DataFrame from LazyFrame")
}

pub fn load_fixture_bars(name: &str) -> Vec<DailyBar> {
    daily_bars_from_df(&read_fixture(name)).expect("fixture bars should be valid")
}

pub fn balances(outcome: &BacktestOutcome) -> Vec<f64> {
    outcome
        .history()
        .points()
        .iter()
        .map(|p| p.balance)
        .collect()
}
