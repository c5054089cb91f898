//! Code for reading the commodities CSV file.
use super::{input_err_msg, read_csv};
use crate::commodity::{Commodity, CommodityMap};
use crate::id::collect_by_id;
use anyhow::{Context, Result, ensure};
use std::path::Path;

const COMMODITIES_FILE_NAME: &str = "commodities.csv";

/// Read commodities from the specified data directory.
///
/// Dataset paths are resolved relative to `data_dir`.
///
/// # Arguments
///
/// * `data_dir` - Folder containing the commodities CSV file
///
/// # Returns
///
/// The commodities, in the order they appear in the file, or an error.
pub fn read_commodities(data_dir: &Path) -> Result<CommodityMap> {
    let file_path = data_dir.join(COMMODITIES_FILE_NAME);
    let commodities: Vec<Commodity> = read_csv(&file_path)?;
    read_commodities_from_iter(commodities.into_iter(), data_dir)
        .with_context(|| input_err_msg(&file_path))
}

fn read_commodities_from_iter<I>(iter: I, data_dir: &Path) -> Result<CommodityMap>
where
    I: Iterator<Item = Commodity>,
{
    let commodities = iter
        .map(|mut commodity| {
            ensure!(
                commodity.base_price.is_finite() && commodity.base_price.value() > 0.0,
                "Base price for {} must be a finite number greater than zero",
                commodity.id
            );
            commodity.dataset = data_dir.join(&commodity.dataset);
            Ok(commodity)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CommodityMap::new(collect_by_id(commodities)?))
}
