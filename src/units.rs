//! This module defines the quantity types used for prices.

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            derive_more::Add,
            derive_more::Sub,
            derive_more::Display,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is finite
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }
    };
}

// An amount of currency (rupees per quintal for the bundled data)
unit_struct!(Money);
// A wholesale price index value, where 100 corresponds to the base price
unit_struct!(IndexValue);

/// The index value at which a commodity trades at exactly its base price
const BASE_INDEX: f64 = 100.0;

/// Round `value` to two decimal places
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl IndexValue {
    /// Convert an index value to a price, rounded to two decimal places.
    ///
    /// # Arguments
    ///
    /// * `base_price` - The price corresponding to an index value of 100
    pub fn to_price(self, base_price: Money) -> Money {
        Money(round_to_cents(self.0 * base_price.0 / BASE_INDEX))
    }
}
