pub mod analyzer;
pub mod extract;
pub mod pipeline;
pub mod pricing;

pub use analyzer::{ProductAnalyzer, VisionAnalyzer, VisionOptions};
pub use extract::{extract_json_object, ResponseParseError};
pub use pipeline::{ProductPipeline, Stage};
pub use pricing::aggregate;
