pub mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use error::LlmError;
pub use http::{HttpClient, HttpClientConfig};
pub use traits::{LanguageModel, ModelComponent};
pub use types::{ChatRole, GenerationConfig, LanguageModelUsage};
