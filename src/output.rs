//! The module responsible for writing output data to disk.
use crate::forecast::ForecastEntry;
use crate::units::{IndexValue, Money};
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub mod metadata;

/// The output file name for forecasts
const FORECAST_FILE_NAME: &str = "forecast.csv";

/// Create a new output directory.
///
/// If the directory already exists and is not empty, it is only replaced if `allow_overwrite` is
/// true.
///
/// # Returns
///
/// Whether an existing directory was overwritten, or an error.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Already exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// A row of the forecast CSV file
#[derive(Serialize, Debug, PartialEq)]
struct ForecastRow<'a> {
    commodity_id: &'a str,
    label: &'a str,
    month: i32,
    year: i32,
    rainfall: f64,
    index_value: IndexValue,
    price: Money,
}

/// Write a forecast for a commodity to a CSV file in `output_dir`
pub fn write_forecast(
    output_dir: &Path,
    commodity_id: &str,
    forecast: &[ForecastEntry],
) -> Result<()> {
    let file_path = output_dir.join(FORECAST_FILE_NAME);
    let write = || -> Result<()> {
        let mut writer = csv::Writer::from_path(&file_path)?;
        for entry in forecast {
            writer.serialize(ForecastRow {
                commodity_id,
                label: &entry.label,
                month: entry.month,
                year: entry.year,
                rainfall: entry.rainfall,
                index_value: entry.index_value,
                price: entry.price,
            })?;
        }
        writer.flush()?;

        Ok(())
    };

    write().with_context(|| format!("Failed to write {}", file_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_create_output_directory_new_directory() {
        let temp_dir = tempdir().unwrap();
        let output_dir = temp_dir.path().join("new");
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());
    }

    #[test]
    fn test_create_output_directory_existing_empty() {
        let temp_dir = tempdir().unwrap();
        assert!(!create_output_directory(temp_dir.path(), false).unwrap());
        assert!(temp_dir.path().is_dir());
    }

    #[test]
    fn test_create_output_directory_existing_non_empty() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("forecast.csv");
        File::create(&file_path).unwrap();

        assert!(create_output_directory(temp_dir.path(), false).is_err());
        assert!(file_path.is_file());

        assert!(create_output_directory(temp_dir.path(), true).unwrap());
        assert!(temp_dir.path().is_dir());
        assert!(!file_path.exists());
    }

    #[test]
    fn test_write_forecast() {
        let entries = [
            ForecastEntry {
                label: "Dec 2024".into(),
                month: 12,
                year: 2024,
                rainfall: 10.9,
                index_value: IndexValue(100.0),
                price: Money(1350.0),
            },
            ForecastEntry {
                label: "Jan 2025".into(),
                month: 1,
                year: 2025,
                rainfall: 29.0,
                index_value: IndexValue(101.5),
                price: Money(1370.25),
            },
        ];

        let dir = tempdir().unwrap();
        write_forecast(dir.path(), "Wheat", &entries).unwrap();

        let contents = fs::read_to_string(dir.path().join(FORECAST_FILE_NAME)).unwrap();
        assert_eq!(
            contents,
            "commodity_id,label,month,year,rainfall,index_value,price\n\
            Wheat,Dec 2024,12,2024,10.9,100.0,1350.0\n\
            Wheat,Jan 2025,1,2025,29.0,101.5,1370.25\n"
        );
    }

    #[test]
    fn test_write_forecast_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(write_forecast(&dir.path().join("missing"), "Wheat", &[]).is_err());
    }
}
