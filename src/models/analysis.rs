use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Older prompts asked for Japanese keys; accept them alongside the English ones.
const PRODUCT_NAME_KEYS: &[&str] = &["product_name", "商品名"];
const DESCRIPTION_KEYS: &[&str] = &["description", "商品の詳細な説明"];
const CATEGORY_KEYS: &[&str] = &["category", "商品のカテゴリー"];
const CONDITION_KEYS: &[&str] = &["condition", "商品の状態"];

/// Product attributes pulled out of a vision model response.
///
/// Any field may be missing. When the model call or parsing failed only
/// `error` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            product_name: lookup(object, PRODUCT_NAME_KEYS),
            description: lookup(object, DESCRIPTION_KEYS),
            category: lookup(object, CATEGORY_KEYS),
            condition: lookup(object, CONDITION_KEYS),
            error: lookup(object, &["error"]),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn product_name(&self) -> &str {
        self.product_name.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }

    pub fn condition(&self) -> &str {
        self.condition.as_deref().unwrap_or_default()
    }
}

fn lookup(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(|value| match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
}
