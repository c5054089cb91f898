//! Code for working with sequences of calendar months.
use crate::error::{PredictionError, PredictionResult};
use crate::rainfall::{DECEMBER, month_index};
use crate::units::{IndexValue, Money};
use chrono::Month;
use serde::Serialize;
use std::fmt;

/// A calendar month in a particular year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear {
    /// Calendar month (1 to 12)
    pub month: i32,
    /// Year
    pub year: i32,
}

impl MonthYear {
    /// Create a new [`MonthYear`], checking that the month is valid
    pub fn new(month: i32, year: i32) -> PredictionResult<Self> {
        month_index(month)?;
        Ok(Self { month, year })
    }

    /// The following month, moving into the next year after December.
    ///
    /// Fails if the next year cannot be represented.
    pub fn next(self) -> PredictionResult<Self> {
        if self.month == DECEMBER {
            let year = self
                .year
                .checked_add(1)
                .ok_or(PredictionError::YearOutOfRange(self.year))?;
            Ok(Self { month: 1, year })
        } else {
            Ok(Self {
                month: self.month + 1,
                year: self.year,
            })
        }
    }

    /// Iterate over the `count` months following this one.
    ///
    /// Once the year overflows, every remaining item is an error.
    pub fn following(self, count: u32) -> impl Iterator<Item = PredictionResult<MonthYear>> {
        let mut current = Ok(self);
        (0..count).map(move |_| {
            current = current.clone().and_then(MonthYear::next);
            current.clone()
        })
    }

    /// A short label for the month, e.g. "Dec 2024"
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|month| Month::try_from(month).ok())
            .map_or("???", |month| &month.name()[..3]);
        write!(f, "{name} {}", self.year)
    }
}

/// A single entry in a price forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    /// Label for the month, e.g. "Dec 2024"
    pub label: String,
    /// Calendar month (1 to 12)
    pub month: i32,
    /// Year
    pub year: i32,
    /// The rainfall (mm) used for the prediction
    pub rainfall: f64,
    /// The predicted price index
    pub index_value: IndexValue,
    /// The predicted price
    pub price: Money,
}
