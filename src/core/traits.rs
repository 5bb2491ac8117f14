use async_trait::async_trait;

use super::error::LlmError;
use crate::component::{ComponentInfo, FieldDescriptor, ResolvedConfig};

/// A callable text model, as handed to downstream pipeline steps.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send `prompt` to the model and return the generated text.
    ///
    /// `stop` is part of the generic capability contract; implementations
    /// may ignore it.
    async fn invoke(&self, prompt: &str, stop: Option<&[String]>) -> Result<String, LlmError>;
}

/// The shape a host expects from a model-producing component.
pub trait ModelComponent {
    fn info(&self) -> ComponentInfo;

    /// Configuration fields, in display order.
    fn inputs(&self) -> Vec<FieldDescriptor>;

    fn build_language_model(
        &self,
        config: &ResolvedConfig,
    ) -> Result<Box<dyn LanguageModel>, LlmError>;

    /// Resolve host-supplied values against [`ModelComponent::inputs`].
    fn resolve(
        &self,
        values: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<ResolvedConfig, LlmError> {
        ResolvedConfig::resolve(&self.inputs(), values)
    }
}
