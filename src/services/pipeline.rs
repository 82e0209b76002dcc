use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::{debug, error, warn};

use crate::clients::OpenAiClient;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::extractors::{DemoPriceSource, PriceSource};
use crate::models::{AnalyzeResponse, ImagePayload, ProductListing};
use crate::services::analyzer::{ProductAnalyzer, VisionAnalyzer, VisionOptions};
use crate::services::pricing::aggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Analyzed,
    Priced,
    Assembled,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Analyzed => "analyzed",
            Stage::Priced => "priced",
            Stage::Assembled => "assembled",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Image → analysis → comparable prices → suggestion → listing.
///
/// Stages run strictly in sequence. Nothing is shared between requests apart
/// from the read-only collaborators held here.
#[derive(Clone)]
pub struct ProductPipeline {
    analyzer: Arc<dyn ProductAnalyzer>,
    prices: Arc<dyn PriceSource>,
    price_timeout: Duration,
}

impl ProductPipeline {
    pub fn new(
        analyzer: Arc<dyn ProductAnalyzer>,
        prices: Arc<dyn PriceSource>,
        price_timeout: Duration,
    ) -> Self {
        Self {
            analyzer,
            prices,
            price_timeout,
        }
    }

    /// Wires the OpenAI-backed analyzer and the demo price source.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let model = Arc::new(OpenAiClient::from_config(&settings.vision)?);
        let analyzer = VisionAnalyzer::new(model, VisionOptions::from(&settings.vision));
        let prices = DemoPriceSource::from_config(&settings.pricing);

        Ok(Self::new(
            Arc::new(analyzer),
            Arc::new(prices),
            settings.pricing.timeout(),
        ))
    }

    /// Always returns a well-formed body: the listing, or `{"error": ...}` when
    /// any stage failed or panicked.
    ///
    /// The work runs on its own task; dropping this future (a client hanging
    /// up) aborts it, outbound calls included.
    pub async fn analyze_product(&self, image: ImagePayload) -> AnalyzeResponse {
        let pipeline = self.clone();
        let handle = tokio::spawn(async move { pipeline.run(image).await });
        let _abort = AbortOnDrop(handle.abort_handle());
        let outcome = handle
            .await
            .unwrap_or_else(|e| Err(Error::Pipeline(e.to_string())));

        match outcome {
            Ok(listing) => AnalyzeResponse::from(listing),
            Err(e) => {
                error!(error = %e, stage = %Stage::Failed, "Product analysis failed");
                AnalyzeResponse::failed(e)
            }
        }
    }

    pub async fn run(&self, image: ImagePayload) -> Result<ProductListing> {
        if image.is_empty() {
            return Err(Error::EmptyImage);
        }
        debug!(stage = %Stage::Received, image_bytes = image.len(), "Image received");

        let analysis = self.analyzer.analyze(&image).await;
        drop(image);
        if let Some(message) = &analysis.error {
            warn!(error = %message, "Analysis degraded, continuing with empty fields");
        }
        debug!(
            stage = %Stage::Analyzed,
            product_name = analysis.product_name(),
            "Image analyzed"
        );

        let search_term = analysis.product_name();
        let lookup = self.prices.collect_prices(search_term);
        let prices = match tokio::time::timeout(self.price_timeout, lookup).await {
            Ok(prices) => prices,
            Err(_) => {
                warn!(
                    search_term = search_term,
                    timeout = ?self.price_timeout,
                    "Price lookup timed out, using no prices"
                );
                Vec::new()
            }
        };
        let suggestion = aggregate(&prices);
        debug!(
            stage = %Stage::Priced,
            prices = prices.len(),
            suggested = suggestion.suggested_price,
            "Prices aggregated"
        );

        let listing = ProductListing::assemble(&analysis, suggestion);
        debug!(stage = %Stage::Assembled, title = %listing.title, "Listing assembled");

        Ok(listing)
    }
}

struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
