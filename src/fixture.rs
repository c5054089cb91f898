//! Fixtures for tests

use crate::commodity::{Commodity, CommodityMap};
use crate::dataset::{CommodityDataset, Observation};
use crate::units::Money;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn wheat() -> Commodity {
    Commodity {
        id: "Wheat".into(),
        base_price: Money(1350.0),
        dataset: "no_such_dir/Wheat.csv".into(),
    }
}

#[fixture]
pub fn cotton() -> Commodity {
    Commodity {
        id: "Cotton".into(),
        base_price: Money(3600.0),
        dataset: "no_such_dir/Cotton.csv".into(),
    }
}

#[fixture]
pub fn commodities(wheat: Commodity, cotton: Commodity) -> CommodityMap {
    [wheat, cotton].into_iter().collect()
}

/// Five observations whose index value is always 100
#[fixture]
pub fn constant_dataset() -> CommodityDataset {
    let observations = [
        (1, 2019, 29.0),
        (4, 2019, 30.7),
        (7, 2020, 299.0),
        (10, 2021, 70.5),
        (12, 2022, 10.9),
    ]
    .into_iter()
    .map(|(month, year, rainfall)| Observation {
        month,
        year,
        rainfall,
        index_value: 100.0,
    })
    .collect();

    CommodityDataset::new(observations).unwrap()
}

/// Three years of monthly observations with a seasonal price index
#[fixture]
pub fn wheat_dataset() -> CommodityDataset {
    let observations = (2017..2020)
        .flat_map(|year| {
            (1..=12).map(move |month| Observation {
                month,
                year,
                rainfall: f64::from(month * 10 + year % 7),
                index_value: 100.0 + f64::from(month % 4) * 2.5 + f64::from(year - 2017) * 3.0,
            })
        })
        .collect();

    CommodityDataset::new(observations).unwrap()
}
