pub mod http;
pub mod openai;
pub mod vision;

pub use http::HttpClient;
pub use openai::OpenAiClient;
pub use vision::{ChatRequest, ContentPart, Message, VisionModel};
