//! Price index models for individual commodities.
use crate::commodity::CommodityID;
use crate::dataset::{CommodityDataset, feature_vector};
use crate::error::{PredictionError, PredictionResult};
use crate::units::IndexValue;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smartcore::error::Failed;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};
use std::fmt;
use std::ops::RangeInclusive;

/// The range from which tree depths are drawn when no depth is configured
pub const TREE_DEPTH_RANGE: RangeInclusive<usize> = 7..=15;

/// How the maximum depth of a commodity's regression tree is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthStrategy {
    /// Draw a depth from [`TREE_DEPTH_RANGE`] using a freshly seeded RNG
    #[default]
    Random,
    /// Draw a depth from [`TREE_DEPTH_RANGE`] using an RNG with the given seed
    Seeded(u64),
    /// Always use the given depth
    Fixed(usize),
}

impl DepthStrategy {
    /// Choose a maximum tree depth
    pub fn choose(self) -> usize {
        match self {
            Self::Random => rand::thread_rng().gen_range(TREE_DEPTH_RANGE),
            Self::Seeded(seed) => StdRng::seed_from_u64(seed).gen_range(TREE_DEPTH_RANGE),
            Self::Fixed(depth) => depth,
        }
    }
}

type Regressor = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// A regression model predicting a commodity's price index from month, year and rainfall
pub struct PricePredictor {
    commodity_id: CommodityID,
    model: Option<Regressor>,
    max_depth: usize,
    num_observations: usize,
}

impl fmt::Debug for PricePredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PricePredictor")
            .field("commodity_id", &self.commodity_id)
            .field("max_depth", &self.max_depth)
            .field("num_observations", &self.num_observations)
            .finish_non_exhaustive()
    }
}

impl PricePredictor {
    /// Create a model which has not yet been fitted
    pub fn new(commodity_id: CommodityID, max_depth: usize) -> Self {
        Self {
            commodity_id,
            model: None,
            max_depth,
            num_observations: 0,
        }
    }

    /// Fit a model to the whole of `dataset`.
    ///
    /// # Arguments
    ///
    /// * `commodity_id` - The commodity the dataset describes
    /// * `dataset` - Historical observations for the commodity
    /// * `max_depth` - The maximum depth of the regression tree
    pub fn fit(
        commodity_id: CommodityID,
        dataset: &CommodityDataset,
        max_depth: usize,
    ) -> PredictionResult<Self> {
        let mut predictor = Self::new(commodity_id, max_depth);
        predictor.fit_dataset(dataset)?;
        Ok(predictor)
    }

    /// Fit (or refit) the regression tree to `dataset`
    pub fn fit_dataset(&mut self, dataset: &CommodityDataset) -> PredictionResult<()> {
        let features = dataset.features().into_iter().map(Vec::from).collect_vec();
        let x = DenseMatrix::from_2d_vec(&features);
        let params = DecisionTreeRegressorParameters::default()
            .with_max_depth(u16::try_from(self.max_depth).unwrap_or(u16::MAX));
        let model = Regressor::fit(&x, &dataset.targets(), params).map_err(model_err)?;

        self.model = Some(model);
        self.num_observations = dataset.len();
        Ok(())
    }

    /// Whether the model has been fitted
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// The commodity this model predicts prices for
    pub fn commodity_id(&self) -> &CommodityID {
        &self.commodity_id
    }

    /// The maximum depth of the regression tree
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The number of observations the model was fitted to
    pub fn num_observations(&self) -> usize {
        self.num_observations
    }

    /// Predict the price index.
    ///
    /// Inputs are not validated: a month outside 1 to 12 or a negative rainfall is passed to the
    /// model unchanged.
    pub fn predict_index(
        &self,
        month: i32,
        year: i32,
        rainfall: f64,
    ) -> PredictionResult<IndexValue> {
        let model = self.model.as_ref().ok_or(PredictionError::NotFitted)?;
        let x = DenseMatrix::from_2d_vec(&vec![Vec::from(feature_vector(month, year, rainfall))]);
        let index = model
            .predict(&x)
            .map_err(model_err)?
            .first()
            .copied()
            .ok_or_else(|| PredictionError::Data("Model returned no prediction".into()))?;
        Ok(IndexValue(index))
    }
}

fn model_err(err: Failed) -> PredictionError {
    PredictionError::Data(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Observation;
    use crate::fixture::{constant_dataset, wheat_dataset};
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    fn test_predict_constant_index(constant_dataset: CommodityDataset) {
        let predictor = PricePredictor::fit("Wheat".into(), &constant_dataset, 7).unwrap();
        assert_eq!(predictor.num_observations(), 5);
        for (month, year, rainfall) in [(1, 2024, 10.0), (12, 1990, 0.0), (13, 2100, 500.0)] {
            assert_eq!(
                predictor.predict_index(month, year, rainfall),
                Ok(IndexValue(100.0))
            );
        }
    }

    #[rstest]
    fn test_fixed_depth_is_deterministic(wheat_dataset: CommodityDataset) {
        let predictor1 = PricePredictor::fit("Wheat".into(), &wheat_dataset, 9).unwrap();
        let predictor2 = PricePredictor::fit("Wheat".into(), &wheat_dataset, 9).unwrap();
        for obs in wheat_dataset.iter() {
            assert_eq!(
                predictor1.predict_index(obs.month, obs.year + 5, obs.rainfall),
                predictor2.predict_index(obs.month, obs.year + 5, obs.rainfall)
            );
        }
    }

    #[test]
    fn test_predict_learns_month_effect() {
        let observations = (2015..2020)
            .flat_map(|year| {
                (1..=12).map(move |month| Observation {
                    month,
                    year,
                    rainfall: 50.0,
                    index_value: if month <= 6 { 100.0 } else { 120.0 },
                })
            })
            .collect();
        let dataset = CommodityDataset::new(observations).unwrap();
        let predictor = PricePredictor::fit("Cotton".into(), &dataset, 7).unwrap();
        assert_eq!(predictor.predict_index(3, 2024, 50.0), Ok(IndexValue(100.0)));
        assert_eq!(predictor.predict_index(9, 2024, 50.0), Ok(IndexValue(120.0)));
    }

    #[test]
    fn test_predict_not_fitted() {
        let predictor = PricePredictor::new("Wheat".into(), 7);
        assert!(!predictor.is_fitted());
        assert_eq!(
            predictor.predict_index(1, 2024, 10.0),
            Err(PredictionError::NotFitted)
        );
    }

    #[rstest]
    fn test_fit_dataset(constant_dataset: CommodityDataset) {
        let mut predictor = PricePredictor::new("Wheat".into(), 7);
        predictor.fit_dataset(&constant_dataset).unwrap();
        assert!(predictor.is_fitted());
        assert_eq!(predictor.num_observations(), 5);
        assert_eq!(predictor.max_depth(), 7);
    }

    #[rstest]
    fn test_depth_limits_tree(wheat_dataset: CommodityDataset) {
        // A stump can only tell two groups of observations apart
        let stump = PricePredictor::fit("Wheat".into(), &wheat_dataset, 1).unwrap();
        let predictions: HashSet<_> = wheat_dataset
            .iter()
            .map(|obs| {
                stump
                    .predict_index(obs.month, obs.year, obs.rainfall)
                    .unwrap()
                    .value()
                    .to_bits()
            })
            .collect();
        assert!(predictions.len() <= 2);
    }

    #[rstest]
    fn test_predict_negative_inputs(constant_dataset: CommodityDataset) {
        let predictor = PricePredictor::fit("Wheat".into(), &constant_dataset, 7).unwrap();
        assert_eq!(
            predictor.predict_index(-1, -2024, -5.0),
            Ok(IndexValue(100.0))
        );
    }

    #[rstest]
    #[case(DepthStrategy::Fixed(3), 3)]
    #[case(DepthStrategy::Fixed(20), 20)]
    fn test_depth_strategy_fixed(#[case] strategy: DepthStrategy, #[case] expected: usize) {
        assert_eq!(strategy.choose(), expected);
    }

    #[test]
    fn test_depth_strategy_seeded() {
        let depth = DepthStrategy::Seeded(42).choose();
        assert!(TREE_DEPTH_RANGE.contains(&depth));
        assert_eq!(DepthStrategy::Seeded(42).choose(), depth);
    }

    #[test]
    fn test_depth_strategy_random_in_range() {
        for _ in 0..100 {
            assert!(TREE_DEPTH_RANGE.contains(&DepthStrategy::Random.choose()));
        }
    }
}
