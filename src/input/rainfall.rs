//! Code for reading the monthly rainfall profile.
use super::{input_err_msg, read_csv};
use crate::rainfall::{DECEMBER, MONTHS_PER_YEAR, RainfallProfile};
use anyhow::{Context, Result, ensure};
use log::info;
use serde::Deserialize;
use std::path::Path;

const RAINFALL_FILE_NAME: &str = "rainfall.csv";

/// A row of the rainfall CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct RainfallRow {
    month: i32,
    rainfall: f64,
}

/// Read the monthly rainfall profile from the specified data directory.
///
/// The file is optional. If it is not present, the default profile is used.
///
/// # Arguments
///
/// * `data_dir` - Folder containing the rainfall CSV file
pub fn read_rainfall_profile(data_dir: &Path) -> Result<RainfallProfile> {
    let file_path = data_dir.join(RAINFALL_FILE_NAME);
    if !file_path.is_file() {
        info!("No rainfall file found; using default monthly rainfall");
        return Ok(RainfallProfile::default());
    }

    let rows: Vec<RainfallRow> = read_csv(&file_path)?;
    rainfall_profile_from_rows(&rows).with_context(|| input_err_msg(&file_path))
}

fn rainfall_profile_from_rows(rows: &[RainfallRow]) -> Result<RainfallProfile> {
    ensure!(
        rows.len() == MONTHS_PER_YEAR,
        "Rainfall must be given for exactly {MONTHS_PER_YEAR} months"
    );
    ensure!(
        rows.iter().map(|row| row.month).eq(1..=DECEMBER),
        "Months must be listed in order from 1 to {DECEMBER}"
    );
    ensure!(
        rows.iter()
            .all(|row| row.rainfall.is_finite() && row.rainfall >= 0.0),
        "Rainfall must be a finite, non-negative number"
    );

    let mut rainfall = [0.0; MONTHS_PER_YEAR];
    for (value, row) in rainfall.iter_mut().zip(rows) {
        *value = row.rainfall;
    }

    Ok(RainfallProfile::new(rainfall))
}
