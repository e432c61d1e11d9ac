//! Product price in minor currency units.

use serde::{Deserialize, Serialize};

/// A price stored as an integer number of minor currency units (e.g. cents).
///
/// No currency is attached; the store sells in a single currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i32);

impl Price {
    /// Create a price from minor units.
    #[must_use]
    pub const fn from_minor_units(amount: i32) -> Self {
        Self(amount)
    }

    /// Amount in minor units.
    #[must_use]
    pub const fn minor_units(&self) -> i32 {
        self.0
    }
}
