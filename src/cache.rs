//! A cache of fitted price models, shared between requests.
//!
//! Fitting a model is expensive and, with a random tree depth, not reproducible, so each
//! commodity's model is fitted at most once and reused for the lifetime of the cache. Every
//! commodity has its own lock: when several threads ask for a model that has not been fitted yet,
//! one of them fits it while the others wait, and all of them get the same model. Models for
//! different commodities can be fitted at the same time.
use crate::commodity::{Commodity, CommodityID};
use crate::dataset::CommodityDataset;
use crate::error::PredictionResult;
use crate::predictor::{DepthStrategy, PricePredictor};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Fits a price model for a commodity
pub trait ModelFitter: Send + Sync {
    /// Fit a model for `commodity`
    fn fit(&self, commodity: &Commodity) -> PredictionResult<PricePredictor>;
}

impl<F> ModelFitter for F
where
    F: Fn(&Commodity) -> PredictionResult<PricePredictor> + Send + Sync,
{
    fn fit(&self, commodity: &Commodity) -> PredictionResult<PricePredictor> {
        self(commodity)
    }
}

/// Fits models to the dataset file named by each commodity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DatasetFitter {
    depth: DepthStrategy,
}

impl DatasetFitter {
    /// Create a fitter which chooses tree depths with `depth`
    pub fn new(depth: DepthStrategy) -> Self {
        Self { depth }
    }
}

impl ModelFitter for DatasetFitter {
    fn fit(&self, commodity: &Commodity) -> PredictionResult<PricePredictor> {
        let dataset = CommodityDataset::from_path(&commodity.dataset)?;
        PricePredictor::fit(commodity.id.clone(), &dataset, self.depth.choose())
    }
}

/// Holds the model for one commodity, once fitted
type Slot = Arc<Mutex<Option<Arc<PricePredictor>>>>;

/// A cache of fitted models, keyed by commodity
pub struct ModelCache<F = DatasetFitter> {
    fitter: F,
    slots: Mutex<HashMap<CommodityID, Slot>>,
}

/// Lock a mutex, ignoring poisoning.
///
/// A panic while fitting leaves the slot empty, so the data behind a poisoned lock is still valid.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<F: ModelFitter> ModelCache<F> {
    /// Create an empty cache which fits models with `fitter`
    pub fn new(fitter: F) -> Self {
        Self {
            fitter,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Get the model for `commodity`, fitting it first if needed.
    ///
    /// If fitting fails, the error is returned and nothing is cached, so the next request will
    /// try again.
    pub fn get_or_fit(&self, commodity: &Commodity) -> PredictionResult<Arc<PricePredictor>> {
        let slot = Arc::clone(lock(&self.slots).entry(commodity.id.clone()).or_default());

        // Held while fitting, so concurrent requests for this commodity wait for the result
        let mut model = lock(&slot);
        if let Some(model) = model.as_ref() {
            return Ok(Arc::clone(model));
        }

        debug!("Fitting price model for {}", commodity.id);
        let fitted = Arc::new(self.fitter.fit(commodity)?);
        info!(
            "Fitted price model for {} ({} observations, max depth {})",
            commodity.id,
            fitted.num_observations(),
            fitted.max_depth()
        );
        *model = Some(Arc::clone(&fitted));

        Ok(fitted)
    }

    /// Get the model for the commodity with the given ID, if it has been fitted
    pub fn get(&self, commodity_id: &str) -> Option<Arc<PricePredictor>> {
        let slot = Arc::clone(lock(&self.slots).get(commodity_id)?);
        lock(&slot).clone()
    }

    /// Whether a model has been fitted for the commodity with the given ID
    pub fn contains(&self, commodity_id: &str) -> bool {
        self.get(commodity_id).is_some()
    }

    /// The number of fitted models
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = lock(&self.slots).values().cloned().collect();
        slots.iter().filter(|slot| lock(slot).is_some()).count()
    }

    /// Whether no models have been fitted
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
