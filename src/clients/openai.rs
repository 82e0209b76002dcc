use async_trait::async_trait;
use http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, error};

use crate::clients::http::HttpClient;
use crate::clients::vision::{ChatRequest, ChatResponseRaw, VisionModel};
use crate::config::VisionConfig;
use crate::error::{Error, Result};

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiClient {
    http: HttpClient,
    base_url: String,
    has_api_key: bool,
}

impl OpenAiClient {
    pub fn new(api_key: Option<&str>, base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let api_key = api_key.map(str::trim).filter(|key| !key.is_empty());
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|_| Error::Config(config::ConfigError::Message(
                    "API key contains characters not allowed in a header".into(),
                )))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(Self {
            http: HttpClient::new(headers)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            has_api_key: api_key.is_some(),
        })
    }

    pub fn from_config(config: &VisionConfig) -> Result<Self> {
        Self::new(config.api_key.as_deref(), config.base_url.clone())
    }

    pub fn has_api_key(&self) -> bool {
        self.has_api_key
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl VisionModel for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        if !self.has_api_key {
            return Err(Error::MissingApiKey);
        }

        let start = std::time::Instant::now();
        let url = self.completions_url();
        let body = serde_json::to_vec(request)?;

        debug!(
            url = %url,
            model = %request.model,
            max_tokens = ?request.max_tokens,
            body_bytes = body.len(),
            "Sending chat completion"
        );

        let response = self.http.send(self.http.post(&url).body(body)).await?;
        let bytes = response.bytes().await?;

        let raw: ChatResponseRaw = serde_json::from_slice(&bytes).map_err(|e| {
            error!(
                error = %e,
                body = %String::from_utf8_lossy(&bytes),
                "Failed to parse chat completion response"
            );
            Error::from(e)
        })?;

        if let Some(usage) = &raw.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Token usage"
            );
        }

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(Error::EmptyCompletion)?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis() as u64,
            content_chars = content.chars().count(),
            "Chat completion received"
        );

        Ok(content)
    }
}
