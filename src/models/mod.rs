mod analysis;
mod image;
mod listing;
mod price;

pub use analysis::AnalysisResult;
pub use image::ImagePayload;
pub use listing::{AnalyzeResponse, ProductListing};
pub use price::{PriceList, PriceSuggestion};
