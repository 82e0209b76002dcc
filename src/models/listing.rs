use serde::{Deserialize, Serialize};

use super::{AnalysisResult, PriceSuggestion};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListing {
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: String,
    pub price_suggestion: PriceSuggestion,
}

impl ProductListing {
    /// Missing analysis fields become empty strings.
    pub fn assemble(analysis: &AnalysisResult, price_suggestion: PriceSuggestion) -> Self {
        Self {
            title: analysis.product_name().to_string(),
            description: analysis.description().to_string(),
            category: analysis.category().to_string(),
            condition: analysis.condition().to_string(),
            price_suggestion,
        }
    }
}

/// Body of every `/analyze-product` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Listing(ProductListing),
    Failed { error: String },
}

impl AnalyzeResponse {
    pub fn failed(error: impl std::fmt::Display) -> Self {
        AnalyzeResponse::Failed {
            error: error.to_string(),
        }
    }

    pub fn listing(&self) -> Option<&ProductListing> {
        match self {
            AnalyzeResponse::Listing(listing) => Some(listing),
            AnalyzeResponse::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalyzeResponse::Listing(_) => None,
            AnalyzeResponse::Failed { error } => Some(error),
        }
    }
}

impl From<ProductListing> for AnalyzeResponse {
    fn from(listing: ProductListing) -> Self {
        AnalyzeResponse::Listing(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listing_serializes_flat() {
        let analysis = AnalysisResult {
            product_name: Some("Chair".into()),
            ..Default::default()
        };
        let suggestion = PriceSuggestion {
            suggested_price: 2000,
            min_price: 1000,
            max_price: 3000,
        };

        let response = AnalyzeResponse::from(ProductListing::assemble(&analysis, suggestion));

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "title": "Chair",
                "description": "",
                "category": "",
                "condition": "",
                "price_suggestion": {
                    "suggested_price": 2000,
                    "min_price": 1000,
                    "max_price": 3000
                }
            })
        );
    }

    #[test]
    fn test_failed_serializes_error_object() {
        let response = AnalyzeResponse::failed("boom");

        assert_eq!(serde_json::to_value(&response).unwrap(), json!({ "error": "boom" }));
        assert_eq!(response.error(), Some("boom"));
        assert!(response.listing().is_none());
    }

    #[test]
    fn test_deserializes_either_shape() {
        let failed: AnalyzeResponse = serde_json::from_value(json!({ "error": "x" })).unwrap();
        assert_eq!(failed.error(), Some("x"));

        let listing: AnalyzeResponse = serde_json::from_value(json!({
            "title": "t",
            "description": "d",
            "category": "c",
            "condition": "n",
            "price_suggestion": { "suggested_price": 0, "min_price": 0, "max_price": 0 }
        }))
        .unwrap();
        assert_eq!(listing.listing().map(|l| l.title.as_str()), Some("t"));
    }
}
