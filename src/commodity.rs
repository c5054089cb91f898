//! Commodities and their base prices.
use crate::error::{PredictionError, PredictionResult};
use crate::id::{define_id_getter, define_id_type};
use crate::units::Money;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::PathBuf;

define_id_type! {CommodityID}

/// A tradeable agricultural commodity (e.g. wheat)
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct Commodity {
    /// Unique identifier for the commodity (e.g. "Wheat")
    pub id: CommodityID,
    /// The price corresponding to an index value of 100
    pub base_price: Money,
    /// Path to the CSV file containing the commodity's historical observations
    pub dataset: PathBuf,
}
define_id_getter! {Commodity, CommodityID}

/// The commodities known to the program, keyed by ID, in the order they were defined.
///
/// This also serves as the table of base prices.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct CommodityMap(IndexMap<CommodityID, Commodity>);

impl CommodityMap {
    /// Create a map from commodities which are already keyed by ID
    pub fn new(commodities: IndexMap<CommodityID, Commodity>) -> Self {
        Self(commodities)
    }

    /// Look up a commodity by name
    pub fn get(&self, name: &str) -> PredictionResult<&Commodity> {
        self.0
            .get(name)
            .ok_or_else(|| PredictionError::UnknownCommodity(name.into()))
    }

    /// Look up the base price for a commodity.
    ///
    /// There is no fallback for unknown commodities.
    pub fn base_price(&self, name: &str) -> PredictionResult<Money> {
        Ok(self.get(name)?.base_price)
    }

    /// Whether the commodity is known
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Iterate over the commodities
    pub fn iter(&self) -> impl Iterator<Item = &Commodity> {
        self.0.values()
    }

    /// The number of commodities
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no commodities
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Commodity> for CommodityMap {
    /// Collect commodities into a map. Later commodities replace earlier ones with the same ID.
    fn from_iter<I: IntoIterator<Item = Commodity>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|commodity| (commodity.id.clone(), commodity))
                .collect(),
        )
    }
}
