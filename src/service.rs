//! The price service: predictions and forecasts for registered commodities.
use crate::cache::{DatasetFitter, ModelCache, ModelFitter};
use crate::commodity::CommodityMap;
use crate::error::PredictionResult;
use crate::forecast::{ForecastEntry, MonthYear};
use crate::input::{read_commodities, read_rainfall_profile};
use crate::predictor::DepthStrategy;
use crate::rainfall::RainfallProfile;
use crate::units::{IndexValue, Money};
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Answers price queries, fitting each commodity's model on first use
pub struct PriceService<F = DatasetFitter> {
    commodities: CommodityMap,
    rainfall: RainfallProfile,
    cache: ModelCache<F>,
}

impl PriceService {
    /// Create a service from the files in a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Folder containing `commodities.csv` and, optionally, `rainfall.csv`
    /// * `depth` - How to choose the depth of each commodity's regression tree
    pub fn from_data_dir(data_dir: &Path, depth: DepthStrategy) -> Result<Self> {
        let commodities = read_commodities(data_dir)?;
        let rainfall = read_rainfall_profile(data_dir)?;
        info!(
            "Loaded {} commodities from {}",
            commodities.len(),
            data_dir.display()
        );

        Ok(Self::new(commodities, rainfall, DatasetFitter::new(depth)))
    }
}

impl<F: ModelFitter> PriceService<F> {
    /// Create a service from its parts
    pub fn new(commodities: CommodityMap, rainfall: RainfallProfile, fitter: F) -> Self {
        Self {
            commodities,
            rainfall,
            cache: ModelCache::new(fitter),
        }
    }

    /// The registered commodities
    pub fn commodities(&self) -> &CommodityMap {
        &self.commodities
    }

    /// The rainfall used when none is given
    pub fn rainfall_profile(&self) -> &RainfallProfile {
        &self.rainfall
    }

    /// The cache of fitted models
    pub fn cache(&self) -> &ModelCache<F> {
        &self.cache
    }

    /// Predict the price index for a commodity.
    ///
    /// If `rainfall` is `None`, the rainfall profile's value for `month` is used, in which case
    /// `month` must be between 1 and 12. Explicit inputs are passed to the model unchanged.
    pub fn predict_index(
        &self,
        commodity: &str,
        month: i32,
        year: i32,
        rainfall: Option<f64>,
    ) -> PredictionResult<IndexValue> {
        let commodity = self.commodities.get(commodity)?;
        let rainfall = match rainfall {
            Some(rainfall) => rainfall,
            None => self.rainfall.for_month(month)?,
        };

        self.cache
            .get_or_fit(commodity)?
            .predict_index(month, year, rainfall)
    }

    /// Predict the price for a commodity, rounded to two decimal places.
    ///
    /// See [`PriceService::predict_index`].
    pub fn predict_price(
        &self,
        commodity: &str,
        month: i32,
        year: i32,
        rainfall: Option<f64>,
    ) -> PredictionResult<Money> {
        let base_price = self.commodities.base_price(commodity)?;
        let index = self.predict_index(commodity, month, year, rainfall)?;
        Ok(index.to_price(base_price))
    }

    /// Forecast prices for the `horizon` months following the start month.
    ///
    /// Each month uses the rainfall profile's value for that month. Fails with
    /// [`PredictionError::YearOutOfRange`](crate::error::PredictionError::YearOutOfRange) if the
    /// forecast runs past the last representable year.
    pub fn forecast(
        &self,
        commodity: &str,
        start_month: i32,
        start_year: i32,
        horizon: u32,
    ) -> PredictionResult<Vec<ForecastEntry>> {
        let commodity = self.commodities.get(commodity)?;
        let start = MonthYear::new(start_month, start_year)?;
        let model = self.cache.get_or_fit(commodity)?;

        start
            .following(horizon)
            .map(|month| {
                let month = month?;
                let rainfall = self.rainfall.for_month(month.month)?;
                let index_value = model.predict_index(month.month, month.year, rainfall)?;
                Ok(ForecastEntry {
                    label: month.label(),
                    month: month.month,
                    year: month.year,
                    rainfall,
                    index_value,
                    price: index_value.to_price(commodity.base_price),
                })
            })
            .collect()
    }

    /// Fit the model for every registered commodity, to check that all the datasets are valid
    pub fn validate(&self) -> Result<()> {
        for commodity in self.commodities.iter() {
            self.cache
                .get_or_fit(commodity)
                .with_context(|| format!("Invalid price model for {}", commodity.id))?;
        }

        Ok(())
    }
}
