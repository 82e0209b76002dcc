use serde::{Deserialize, Serialize};

/// Comparable listing prices in whole currency units.
pub type PriceList = Vec<u64>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSuggestion {
    pub suggested_price: u64,
    pub min_price: u64,
    pub max_price: u64,
}
