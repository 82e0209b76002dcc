use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use config::{Config, ConfigError, Environment, File};
use tracing::debug;

const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Deserialize, Clone)]
pub struct VisionConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_vision_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PricingConfig {
    #[serde(default = "default_demo_prices")]
    pub demo_prices: Vec<u64>,
    #[serde(default = "default_pricing_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_vision_timeout_secs() -> u64 {
    60
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

fn default_demo_prices() -> Vec<u64> {
    vec![1000, 1500, 2000, 2500, 3000]
}

fn default_pricing_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_vision_timeout_secs(),
            max_retries: 0,
            retry_base_delay_ms: default_retry_base_delay_ms(),
            prompt: None,
            api_key: None,
        }
    }
}

impl VisionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Keeps the key out of `{:?}` output.
impl std::fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .field("prompt", &self.prompt.as_ref().map(|_| "<custom>"))
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            demo_prices: default_demo_prices(),
            timeout_secs: default_pricing_timeout_secs(),
        }
    }
}

impl PricingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// Loads `config/default.yaml` (if present) overlaid with `APP_` environment
    /// variables, sections split by `__` (`APP_SERVER__PORT`, `APP_VISION__MODEL`).
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(environment());

        Self::build(builder)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment());

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let mut settings: Settings = builder.build()?.try_deserialize()?;

        if settings.vision.api_key.is_none() {
            settings.vision.api_key = std::env::var(API_KEY_VAR)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        debug!(
            server = ?settings.server,
            vision = ?settings.vision,
            pricing = ?settings.pricing,
            "Loaded settings"
        );

        Ok(settings)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("pricing.demo_prices")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // The environment is process-global; tests that load settings hold this.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_VARS: &[(&str, &str)] = &[
        ("APP_SERVER__PORT", "9000"),
        ("APP_VISION__MAX_TOKENS", "800"),
        ("APP_PRICING__DEMO_PRICES", "5,7,9"),
        ("OPENAI_API_KEY", "sk-env"),
    ];

    fn yaml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.server.address(), "0.0.0.0:8000");
        assert_eq!(settings.vision.max_tokens, 500);
        assert_eq!(settings.vision.max_retries, 0);
        assert_eq!(settings.pricing.demo_prices, vec![1000, 1500, 2000, 2500, 3000]);
    }

    #[test]
    fn test_from_file_overrides_and_keeps_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let file = yaml_file(
            "server:\n  port: 9100\nvision:\n  model: gpt-4o-mini\n  max_tokens: 800\n  \
             api_key: sk-from-file\npricing:\n  demo_prices: [10, 20]",
        );

        let settings = Settings::from_file(file.path()).unwrap();

        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.vision.model, "gpt-4o-mini");
        assert_eq!(settings.vision.max_tokens, 800);
        assert_eq!(settings.vision.timeout(), Duration::from_secs(60));
        assert_eq!(settings.vision.api_key.as_deref(), Some("sk-from-file"));
        assert_eq!(settings.pricing.demo_prices, vec![10, 20]);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let vision = VisionConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };

        let rendered = format!("{:?}", vision);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_environment_overrides_file_and_supplies_key() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let file = yaml_file("server:\n  port: 9100\nvision:\n  model: gpt-4o-mini");

        // SAFETY: ENV_LOCK serialises every test in this crate that touches the environment.
        unsafe {
            for (key, value) in ENV_VARS {
                std::env::set_var(key, value);
            }
        }
        let loaded = Settings::from_file(file.path());
        let from_defaults = Settings::new();
        unsafe {
            for (key, _) in ENV_VARS {
                std::env::remove_var(key);
            }
        }

        let settings = loaded.unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.vision.model, "gpt-4o-mini");
        assert_eq!(settings.vision.max_tokens, 800);
        assert_eq!(settings.pricing.demo_prices, vec![5, 7, 9]);
        assert_eq!(settings.vision.api_key.as_deref(), Some("sk-env"));

        let settings = from_defaults.unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.vision.model, "gpt-4o");
        assert_eq!(settings.vision.api_key.as_deref(), Some("sk-env"));
    }

    #[test]
    fn test_configured_key_wins_over_openai_api_key() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let file = yaml_file("vision:\n  api_key: sk-from-file");

        // SAFETY: see test_environment_overrides_file_and_supplies_key.
        unsafe { std::env::set_var("OPENAI_API_KEY", "sk-env") };
        let loaded = Settings::from_file(file.path());
        unsafe { std::env::remove_var("OPENAI_API_KEY") };

        assert_eq!(loaded.unwrap().vision.api_key.as_deref(), Some("sk-from-file"));
    }
}
