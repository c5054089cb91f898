//! Recommending a crop from soil and weather measurements.
use crate::error::{PredictionError, PredictionResult};
use indexmap::IndexSet;
use itertools::Itertools;
use serde::Deserialize;
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// The number of measurements in a [`SoilSample`]
pub const NUM_MEASUREMENTS: usize = 7;

/// The number of trees in the recommendation forest
const NUM_TREES: u16 = 20;

/// The seed used to draw bootstrap samples and feature subsets
const FOREST_SEED: u64 = 5;

type Forest = RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Soil and weather measurements for a field
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SoilSample {
    /// Nitrogen content of the soil
    #[serde(rename = "N")]
    pub nitrogen: f64,
    /// Phosphorus content of the soil
    #[serde(rename = "P")]
    pub phosphorus: f64,
    /// Potassium content of the soil
    #[serde(rename = "K")]
    pub potassium: f64,
    /// Temperature (degrees C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Soil pH
    pub ph: f64,
    /// Rainfall (mm)
    pub rainfall: f64,
}

impl SoilSample {
    /// The measurements as a feature vector
    pub fn features(&self) -> [f64; NUM_MEASUREMENTS] {
        [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }
}

/// A row of the labelled training data
#[derive(Debug, Deserialize)]
struct LabelledSample {
    #[serde(rename = "N")]
    nitrogen: f64,
    #[serde(rename = "P")]
    phosphorus: f64,
    #[serde(rename = "K")]
    potassium: f64,
    temperature: f64,
    humidity: f64,
    ph: f64,
    rainfall: f64,
    label: String,
}

impl LabelledSample {
    fn into_parts(self) -> (SoilSample, String) {
        let sample = SoilSample {
            nitrogen: self.nitrogen,
            phosphorus: self.phosphorus,
            potassium: self.potassium,
            temperature: self.temperature,
            humidity: self.humidity,
            ph: self.ph,
            rainfall: self.rainfall,
        };
        (sample, self.label)
    }
}

/// Recommends the crop best suited to a field
pub struct CropRecommender {
    /// The trained forest, or `None` if the training data only has one crop
    forest: Option<Forest>,
    labels: IndexSet<String>,
}

impl fmt::Debug for CropRecommender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropRecommender")
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

impl CropRecommender {
    /// Train a recommender on the labelled CSV file at `file_path`
    pub fn from_path(file_path: &Path) -> PredictionResult<Self> {
        let file = File::open(file_path).map_err(|err| PredictionError::data(file_path, err))?;
        Self::from_reader(file).map_err(|err| match err {
            PredictionError::Data(msg) => PredictionError::data(file_path, msg),
            err => err,
        })
    }

    /// Train a recommender on labelled CSV data.
    ///
    /// The columns are `N,P,K,temperature,humidity,ph,rainfall,label`.
    pub fn from_reader<R: Read>(reader: R) -> PredictionResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let rows = reader
            .deserialize()
            .map(|row| row.map(LabelledSample::into_parts))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| PredictionError::Data(err.to_string()))?;

        Self::from_samples(rows)
    }

    /// Train a recommender on samples paired with their crop labels.
    ///
    /// Labels are numbered in order of first appearance.
    pub fn from_samples<I>(samples: I) -> PredictionResult<Self>
    where
        I: IntoIterator<Item = (SoilSample, String)>,
    {
        let mut labels = IndexSet::new();
        let mut features = Vec::new();
        let mut classes = Vec::new();
        for (sample, label) in samples {
            if !sample.features().iter().all(|x| x.is_finite()) {
                return Err(PredictionError::Data(format!(
                    "Non-finite measurement for {label}"
                )));
            }

            features.push(Vec::from(sample.features()));
            let (class, _) = labels.insert_full(label);
            let class = i32::try_from(class)
                .map_err(|_| PredictionError::Data("Too many crop labels".into()))?;
            classes.push(class);
        }

        if features.is_empty() {
            return Err(PredictionError::Data("Dataset is empty".into()));
        }

        // A forest needs at least two classes to split on
        let forest = if labels.len() > 1 {
            let x = DenseMatrix::from_2d_vec(&features);
            let params = RandomForestClassifierParameters::default()
                .with_n_trees(NUM_TREES)
                .with_seed(FOREST_SEED);
            let forest = Forest::fit(&x, &classes, params)
                .map_err(|err| PredictionError::Data(err.to_string()))?;
            Some(forest)
        } else {
            None
        };

        Ok(Self { forest, labels })
    }

    /// The crops which can be recommended, in training order
    pub fn crops(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Recommend a crop for `sample`
    pub fn recommend(&self, sample: &SoilSample) -> PredictionResult<&str> {
        let Some(forest) = &self.forest else {
            return self.label(0);
        };

        let x = DenseMatrix::from_2d_vec(&vec![Vec::from(sample.features())]);
        let class = forest
            .predict(&x)
            .map_err(|err| PredictionError::Data(err.to_string()))?
            .into_iter()
            .exactly_one()
            .map_err(|_| PredictionError::Data("Expected a single prediction".into()))?;
        let class = usize::try_from(class)
            .map_err(|_| PredictionError::Data(format!("Unknown crop class {class}")))?;

        self.label(class)
    }

    fn label(&self, class: usize) -> PredictionResult<&str> {
        self.labels
            .get_index(class)
            .map(String::as_str)
            .ok_or_else(|| PredictionError::Data(format!("Unknown crop class {class}")))
    }
}
