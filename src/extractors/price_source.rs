use async_trait::async_trait;
use tracing::debug;

use crate::config::PricingConfig;
use crate::models::PriceList;

/// Looks up comparable listing prices for a search term.
///
/// Implementations never fail: an unreachable or malformed source yields an
/// empty or partial list, and unparseable listings are skipped.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn collect_prices(&self, search_term: &str) -> PriceList;
}

/// Fixed price list standing in for a marketplace search.
#[derive(Debug, Clone)]
pub struct DemoPriceSource {
    prices: PriceList,
}

impl DemoPriceSource {
    pub fn new(prices: PriceList) -> Self {
        Self { prices }
    }

    pub fn from_config(config: &PricingConfig) -> Self {
        Self::new(config.demo_prices.clone())
    }
}

impl Default for DemoPriceSource {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}

#[async_trait]
impl PriceSource for DemoPriceSource {
    async fn collect_prices(&self, search_term: &str) -> PriceList {
        debug!(
            search_term = search_term,
            prices = self.prices.len(),
            "Returning demo prices"
        );
        self.prices.clone()
    }
}
