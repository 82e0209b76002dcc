//! Turns a product photo into a priced listing: a vision model describes the
//! product, a price source supplies comparable prices, and the prices are
//! reduced to a suggested range.

pub mod clients;
pub mod config;
pub mod error;
pub mod extractors;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;

pub use config::Settings;
pub use error::{Error, Result};
pub use models::{
    AnalysisResult, AnalyzeResponse, ImagePayload, PriceList, PriceSuggestion, ProductListing,
};
pub use services::ProductPipeline;
