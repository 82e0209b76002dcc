use crate::models::PriceSuggestion;

/// Reduces comparable prices to a suggestion: floor of the mean, plus the extremes.
///
/// An empty list yields all zeros.
pub fn aggregate(prices: &[u64]) -> PriceSuggestion {
    let (Some(&min_price), Some(&max_price)) = (prices.iter().min(), prices.iter().max()) else {
        return PriceSuggestion::default();
    };

    let total: u128 = prices.iter().map(|&price| u128::from(price)).sum();
    let suggested_price = (total / prices.len() as u128) as u64;

    PriceSuggestion {
        suggested_price,
        min_price,
        max_price,
    }
}
