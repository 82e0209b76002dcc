use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::clients::vision::{ChatRequest, ContentPart, Message, VisionModel};
use crate::config::VisionConfig;
use crate::models::{AnalysisResult, ImagePayload};
use crate::services::extract::extract_json_object;
use crate::utils::{retry_with_backoff, with_timeout};

pub const DEFAULT_PROMPT: &str = "\
Analyze this product photo and provide the following information:\n\
1. product_name: a name suitable as a listing title\n\
2. description: a detailed description of the product\n\
3. category: the product category\n\
4. condition: the condition of the product\n\
Respond in JSON format with the keys product_name, description, category and condition.";

/// Turns a product photo into structured attributes. Never fails: problems are
/// reported through `AnalysisResult::error`.
#[async_trait]
pub trait ProductAnalyzer: Send + Sync {
    async fn analyze(&self, image: &ImagePayload) -> AnalysisResult;
}

#[derive(Debug, Clone)]
pub struct VisionOptions {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for VisionOptions {
    fn default() -> Self {
        Self::from(&VisionConfig::default())
    }
}

impl From<&VisionConfig> for VisionOptions {
    fn from(config: &VisionConfig) -> Self {
        Self {
            model: config.model.clone(),
            prompt: config
                .prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
            max_retries: config.max_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
        }
    }
}

pub struct VisionAnalyzer {
    model: Arc<dyn VisionModel>,
    options: VisionOptions,
}

impl VisionAnalyzer {
    pub fn new(model: Arc<dyn VisionModel>, options: VisionOptions) -> Self {
        Self { model, options }
    }

    pub fn build_request(&self, image: &ImagePayload) -> ChatRequest {
        ChatRequest::new(self.options.model.clone())
            .message(Message::user(vec![
                ContentPart::text(self.options.prompt.clone()),
                ContentPart::image_url(image.data_url()),
            ]))
            .max_tokens(self.options.max_tokens)
    }
}

#[async_trait]
impl ProductAnalyzer for VisionAnalyzer {
    async fn analyze(&self, image: &ImagePayload) -> AnalysisResult {
        debug!(
            image_bytes = image.len(),
            mime_type = image.mime_type(),
            model = %self.options.model,
            "Analyzing product image"
        );

        let request = self.build_request(image);
        let options = &self.options;

        let attempt = || async {
            with_timeout(options.timeout, self.model.complete(&request)).await
        };
        let completion =
            retry_with_backoff(options.max_retries, options.retry_base_delay_ms, attempt).await;

        let text = match completion {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Vision model call failed");
                return AnalysisResult::failed(e.to_string());
            }
        };

        match extract_json_object(&text) {
            Ok(object) => {
                let result = AnalysisResult::from_object(&object);
                debug!(product_name = result.product_name(), "Parsed model response");
                result
            }
            Err(e) => {
                warn!(
                    error = %e,
                    response_chars = text.chars().count(),
                    "Could not parse model response"
                );
                AnalysisResult::failed(e.to_string())
            }
        }
    }
}
