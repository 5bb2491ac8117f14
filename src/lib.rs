//! # gemini-component
//!
//! A "Google Generative AI" model component for no-code pipeline hosts.
//!
//! The component publishes an ordered list of configuration fields for the
//! host to render, and builds a [`LanguageModel`] backed by the Gemini
//! `generateContent` API from the values the user picked.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gemini_component::{GoogleGenerativeAiComponent, LanguageModel, ModelComponent};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let component = GoogleGenerativeAiComponent::new();
//!     let values = json!({ "gemini_api_key": "YOUR_KEY", "temperature": 0.4 });
//!     let config = component.resolve(values.as_object().unwrap())?;
//!
//!     let model = component.build_language_model(&config)?;
//!     let text = model.invoke("Explain how AI works", None).await?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```
//!
//! ## Known Issues
//!
//! Stop sequences passed to [`LanguageModel::invoke`] are not forwarded to
//! the API.

pub mod component;
pub mod core;
pub mod provider;

pub use component::{
    ComponentInfo, FieldDescriptor, FieldKind, FieldValue, GeminiChatModel,
    GoogleGenerativeAiComponent, HandleRef, ResolvedConfig,
};
pub use core::{
    GenerationConfig, HttpClientConfig, LanguageModel, LanguageModelUsage, LlmError,
    ModelComponent,
};
pub use provider::{ClientContext, GeminiClient, GenerativeModel};
