mod config;
mod field;
pub mod google_generative_ai;

pub use config::ResolvedConfig;
pub use field::{FieldDescriptor, FieldKind, FieldValue, HandleRef};
pub use google_generative_ai::{GeminiChatModel, GoogleGenerativeAiComponent};

use serde::Serialize;

/// Descriptive metadata a host shows for a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}
