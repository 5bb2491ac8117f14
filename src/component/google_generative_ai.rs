//! The "Google Generative AI" model component.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::{ComponentInfo, FieldDescriptor, ResolvedConfig};
use crate::core::{GenerationConfig, LanguageModel, LlmError, ModelComponent};
use crate::provider::{ClientContext, GeminiClient, GenerativeModel};

/// Field names, as they appear in a resolved configuration.
pub mod fields {
    pub const MAX_OUTPUT_TOKENS: &str = "max_output_tokens";
    pub const MODEL: &str = "model";
    pub const GEMINI_API_KEY: &str = "gemini_api_key";
    pub const TOP_P: &str = "top_p";
    pub const TEMPERATURE: &str = "temperature";
    pub const TOP_K: &str = "top_k";
    pub const OUTPUT_PARSER: &str = "output_parser";
}

pub const MODEL_OPTIONS: &[&str] = &[
    "gemini-exp-1206",
    "gemini-1.5-pro-latest",
    "gemini-1.0-pro-latest",
    "gemini-1.0-pro-001",
    "gemini-pro",
];

pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Component that turns a model selection and sampling settings into a
/// [`GeminiChatModel`].
#[derive(Debug, Clone, Default)]
pub struct GoogleGenerativeAiComponent {
    context: ClientContext,
}

impl GoogleGenerativeAiComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `context` for the transport of every model this component builds.
    pub fn with_context(context: ClientContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    pub fn input_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::int(fields::MAX_OUTPUT_TOKENS, "Max Output Tokens", 8192)
                .info("The maximum number of tokens to generate."),
            FieldDescriptor::dropdown(fields::MODEL, "Model", MODEL_OPTIONS, DEFAULT_MODEL)
                .info("The name of the model to use."),
            FieldDescriptor::secret(fields::GEMINI_API_KEY, "Gemini API Key")
                .info("The Gemini API Key to use for the Google Generative AI."),
            FieldDescriptor::float(fields::TOP_P, "Top P", 0.95)
                .info("The maximum cumulative probability of tokens to consider when sampling.")
                .advanced(),
            FieldDescriptor::float(fields::TEMPERATURE, "Temperature", 1.0),
            FieldDescriptor::int(fields::TOP_K, "Top K", 64)
                .info(
                    "Decode using top-k sampling: consider the set of top_k most probable tokens. Must be positive.",
                )
                .advanced(),
            FieldDescriptor::handle(fields::OUTPUT_PARSER, "Output Parser", &["OutputParser"])
                .info("The parser to use to parse the output of the model")
                .advanced(),
        ]
    }

    /// Build a chat model from `config`.
    ///
    /// Fails without touching the network when the API key is empty. Each
    /// model gets its own client, so keys never leak between models.
    #[tracing::instrument(name = "build_model", skip(self, config), err)]
    pub fn build_model(&self, config: &ResolvedConfig) -> Result<GeminiChatModel, LlmError> {
        let api_key = config.secret(fields::GEMINI_API_KEY)?;
        if api_key.expose_secret().is_empty() {
            return Err(LlmError::Configuration(
                "Gemini API Key is required.".to_string(),
            ));
        }

        let model_name = config.str(fields::MODEL)?;
        let generation_config = GenerationConfig {
            temperature: config.float(fields::TEMPERATURE)?,
            top_p: config.float(fields::TOP_P)?,
            top_k: config.int(fields::TOP_K)?,
            max_output_tokens: config.int(fields::MAX_OUTPUT_TOKENS)?,
        };

        let client = GeminiClient::new(
            &self.context,
            SecretString::from(api_key.expose_secret().to_owned()),
        )?;
        let model = client.generative_model(model_name, generation_config);
        debug!(model = %model.model_name(), "Built Gemini chat model");

        Ok(GeminiChatModel {
            temperature: generation_config.temperature,
            max_output_tokens: generation_config.max_output_tokens,
            model,
        })
    }
}

impl ModelComponent for GoogleGenerativeAiComponent {
    fn info(&self) -> ComponentInfo {
        ComponentInfo {
            name: "GoogleGenerativeAIModel",
            display_name: "Google Generative AI",
            description: "Generate text using Google Generative AI.",
            icon: "GoogleGenerativeAI",
        }
    }

    fn inputs(&self) -> Vec<FieldDescriptor> {
        Self::input_fields()
    }

    fn build_language_model(
        &self,
        config: &ResolvedConfig,
    ) -> Result<Box<dyn LanguageModel>, LlmError> {
        Ok(Box::new(self.build_model(config)?))
    }
}

/// Adapter exposing a [`GenerativeModel`] as a [`LanguageModel`].
///
/// Every call opens a fresh chat, so calls share no conversation state.
#[derive(Debug, Clone)]
pub struct GeminiChatModel {
    model: GenerativeModel,
    temperature: f64,
    max_output_tokens: i64,
}

impl GeminiChatModel {
    pub fn model(&self) -> &GenerativeModel {
        &self.model
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn max_output_tokens(&self) -> i64 {
        self.max_output_tokens
    }
}

#[async_trait]
impl LanguageModel for GeminiChatModel {
    /// Stop sequences are accepted but not sent to the API.
    #[tracing::instrument(
        name = "gemini_invoke",
        skip(self, prompt, _stop),
        fields(model = %self.model.model_name()),
        err
    )]
    async fn invoke(&self, prompt: &str, _stop: Option<&[String]>) -> Result<String, LlmError> {
        let mut chat = self.model.start_chat();
        let response = chat.send_message(prompt).await?;
        response.text()
    }
}
