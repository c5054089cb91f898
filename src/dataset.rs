//! Historical observations for a single commodity.
//!
//! A dataset is a CSV file with a header row and exactly four numeric columns, in this order:
//! month, year, rainfall (mm) and index value. Column names are not checked, so files like the
//! ones published with the wholesale price index (`Month,Year,Rainfall,WPI`) can be used as-is.
use crate::error::{PredictionError, PredictionResult};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// The number of columns in a dataset file
pub const NUM_COLUMNS: usize = 4;

/// The number of features used to predict the index value
pub const NUM_FEATURES: usize = 3;

/// A single historical observation for a commodity
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Observation {
    /// Calendar month (1 to 12)
    pub month: i32,
    /// Year
    pub year: i32,
    /// Rainfall in millimetres
    pub rainfall: f64,
    /// The price index value (the regression target)
    pub index_value: f64,
}

impl Observation {
    /// The feature vector for this observation: month, year and rainfall
    pub fn features(&self) -> [f64; NUM_FEATURES] {
        feature_vector(self.month, self.year, self.rainfall)
    }
}

/// Build the feature vector used by price models
pub fn feature_vector(month: i32, year: i32, rainfall: f64) -> [f64; NUM_FEATURES] {
    [f64::from(month), f64::from(year), rainfall]
}

/// A table of historical observations for one commodity.
///
/// A dataset always contains at least one observation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommodityDataset {
    observations: Vec<Observation>,
}

impl CommodityDataset {
    /// Create a dataset from observations, failing if there are none or any value is not finite
    pub fn new(observations: Vec<Observation>) -> PredictionResult<Self> {
        if observations.is_empty() {
            return Err(PredictionError::Data("Dataset is empty".into()));
        }
        if let Some(pos) = observations.iter().position(|obs| !is_finite(obs)) {
            return Err(PredictionError::Data(format!(
                "Observation {} contains a non-numeric value",
                pos + 1
            )));
        }

        Ok(Self { observations })
    }

    /// Read a dataset from a CSV file
    pub fn from_path(file_path: &Path) -> PredictionResult<Self> {
        let file = File::open(file_path).map_err(|err| PredictionError::data(file_path, err))?;
        Self::from_reader(file).map_err(|err| match err {
            PredictionError::Data(msg) => PredictionError::data(file_path, msg),
            err => err,
        })
    }

    /// Read a dataset in CSV format from `reader`
    pub fn from_reader<R: Read>(reader: R) -> PredictionResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let num_columns = reader
            .headers()
            .map_err(|err| PredictionError::Data(err.to_string()))?
            .len();
        if num_columns != NUM_COLUMNS {
            return Err(PredictionError::Data(format!(
                "Expected {NUM_COLUMNS} columns (month, year, rainfall, index value) but found \
                {num_columns}"
            )));
        }

        let mut observations = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| PredictionError::Data(err.to_string()))?;
            let line = record.position().map_or(0, csv::Position::line);
            let observation: Observation = record
                .deserialize(None)
                .map_err(|err| PredictionError::Data(format!("Line {line}: {err}")))?;
            if !is_finite(&observation) {
                return Err(PredictionError::Data(format!(
                    "Line {line}: non-numeric value"
                )));
            }
            observations.push(observation);
        }

        Self::new(observations)
    }

    /// The number of observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false, as datasets cannot be empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Iterate over the observations
    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    /// The feature vectors (month, year, rainfall) of all observations
    pub fn features(&self) -> Vec<[f64; NUM_FEATURES]> {
        self.iter().map(Observation::features).collect()
    }

    /// The index values of all observations
    pub fn targets(&self) -> Vec<f64> {
        self.iter().map(|obs| obs.index_value).collect()
    }
}

fn is_finite(observation: &Observation) -> bool {
    observation.rainfall.is_finite() && observation.index_value.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::tempdir;

    const VALID_CSV: &str = "Month,Year,Rainfall,WPI
1,2012,20.2,102.1
2,2012,22.8,101.9
3,2012,37.5,103.4
";

    #[test]
    fn test_from_reader() {
        let dataset = CommodityDataset::from_reader(VALID_CSV.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(
            dataset.iter().next(),
            Some(&Observation {
                month: 1,
                year: 2012,
                rainfall: 20.2,
                index_value: 102.1
            })
        );
        assert_eq!(dataset.features()[1], [2.0, 2012.0, 22.8]);
        assert_eq!(dataset.targets(), vec![102.1, 101.9, 103.4]);
    }

    #[test]
    fn test_from_reader_any_column_order_names() {
        // Columns are identified by position
        let csv = "a,b,c,d\n 7 , 2015 ,299, 99.5\n";
        let dataset = CommodityDataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.features(), vec![[7.0, 2015.0, 299.0]]);
    }

    #[test]
    fn test_from_reader_negative_year() {
        let csv = "Month,Year,Rainfall,WPI\n3,-44,12.5,100\n";
        let dataset = CommodityDataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.features(), vec![[3.0, -44.0, 12.5]]);
    }

    #[rstest]
    #[case::empty_file("")]
    #[case::header_only("Month,Year,Rainfall,WPI\n")]
    #[case::missing_column("Month,Year,WPI\n1,2012,100\n")]
    #[case::extra_column("Month,Year,Rainfall,WPI,Extra\n1,2012,20,100,1\n")]
    #[case::short_row("Month,Year,Rainfall,WPI\n1,2012,20\n")]
    #[case::non_numeric("Month,Year,Rainfall,WPI\n1,2012,heavy,100\n")]
    #[case::non_numeric_month("Month,Year,Rainfall,WPI\nJan,2012,20,100\n")]
    #[case::nan("Month,Year,Rainfall,WPI\n1,2012,20,NaN\n")]
    fn test_from_reader_invalid(#[case] csv: &str) {
        assert!(matches!(
            CommodityDataset::from_reader(csv.as_bytes()),
            Err(PredictionError::Data(_))
        ));
    }

    #[test]
    fn test_new_empty() {
        assert_eq!(
            CommodityDataset::new(Vec::new()),
            Err(PredictionError::Data("Dataset is empty".into()))
        );
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("Wheat.csv");
        fs::write(&file_path, VALID_CSV).unwrap();
        assert_eq!(CommodityDataset::from_path(&file_path).unwrap().len(), 3);
    }

    #[test]
    fn test_from_path_error_names_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("Wheat.csv");
        fs::write(&file_path, "Month,Year,Rainfall,WPI\n").unwrap();
        assert_eq!(
            CommodityDataset::from_path(&file_path),
            Err(PredictionError::Data(format!(
                "Error reading {}: Dataset is empty",
                file_path.display()
            )))
        );
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            CommodityDataset::from_path(&dir.path().join("missing.csv")),
            Err(PredictionError::Data(_))
        ));
    }
}
