//! Google Generative AI (Gemini) client.
//!
//! Covers the slice of the API the model component needs: a per-key
//! authenticated client, a model handle bound to a generation config, chat
//! sessions and the `generateContent` wire types.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::core::{
    ChatRole, GenerationConfig, HttpClient, HttpClientConfig, LanguageModelUsage, LlmError,
};
use crate::provider::constants::gemini;

/// Transport settings shared by every client built from it.
///
/// Holds no credentials; the API key is supplied per client.
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub base_url: String,
    pub api_version: String,
    pub http_config: HttpClientConfig,
    pub user_agent: Option<String>,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self {
            base_url: gemini::API_BASE.to_string(),
            api_version: gemini::API_VERSION.to_string(),
            http_config: HttpClientConfig::default(),
            user_agent: None,
        }
    }
}

impl ClientContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

struct ClientInner {
    http: HttpClient,
    api_key: SecretString,
    base_url: String,
    api_version: String,
}

/// Authenticated Gemini client. Cheap to clone; clones share the key.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.inner.base_url)
            .field("api_version", &self.inner.api_version)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(context: &ClientContext, api_key: SecretString) -> Result<Self, LlmError> {
        let http = HttpClient::new(context.http_config.clone(), context.user_agent.as_deref())?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                api_key,
                base_url: context.base_url.trim_end_matches('/').to_string(),
                api_version: context.api_version.clone(),
            }),
        })
    }

    /// Handle for `model_name`, configured with `generation_config`.
    ///
    /// No request is made; an unknown model only fails on first use.
    pub fn generative_model(
        &self,
        model_name: &str,
        generation_config: GenerationConfig,
    ) -> GenerativeModel {
        GenerativeModel {
            client: self.clone(),
            model_name: qualified_model_name(model_name),
            generation_config,
        }
    }

    fn method_url(&self, model_name: &str, method: &str) -> String {
        format!(
            "{}/{}/{}:{}",
            self.inner.base_url, self.inner.api_version, model_name, method
        )
    }

    async fn post<Req, Res>(&self, url: &str, body: &Req) -> Result<Res, LlmError>
    where
        Req: Serialize,
        Res: serde::de::DeserializeOwned,
    {
        let headers = [(gemini::API_KEY_HEADER, self.inner.api_key.expose_secret())];
        self.inner.http.post_json(url, &headers, body).await
    }
}

fn qualified_model_name(name: &str) -> String {
    if name.starts_with("models/") || name.starts_with("tunedModels/") {
        name.to_string()
    } else {
        format!("models/{name}")
    }
}

/// Remote model handle bound to one generation config.
#[derive(Debug, Clone)]
pub struct GenerativeModel {
    client: GeminiClient,
    model_name: String,
    generation_config: GenerationConfig,
}

impl GenerativeModel {
    /// Fully qualified name, e.g. `models/gemini-pro`.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn generation_config(&self) -> &GenerationConfig {
        &self.generation_config
    }

    #[tracing::instrument(
        name = "gemini_generate_content",
        level = "debug",
        skip(self, contents),
        fields(model = %self.model_name, turns = contents.len()),
        err
    )]
    pub async fn generate_content(
        &self,
        contents: Vec<Content>,
    ) -> Result<GenerateContentResponse, LlmError> {
        let url = self
            .client
            .method_url(&self.model_name, gemini::GENERATE_CONTENT_METHOD);
        let request = GenerateContentRequest {
            contents,
            generation_config: self.generation_config,
        };

        self.client.post(&url, &request).await
    }

    pub fn start_chat(&self) -> ChatSession {
        ChatSession {
            model: self.clone(),
            history: Vec::new(),
        }
    }
}

/// Multi-turn conversation against one model handle.
#[derive(Debug)]
pub struct ChatSession {
    model: GenerativeModel,
    history: Vec<Content>,
}

impl ChatSession {
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Send a user turn along with the history so far.
    ///
    /// History only grows when the reply is usable; a blocked prompt or an
    /// abnormally stopped candidate leaves it untouched.
    pub async fn send_message(
        &mut self,
        text: impl Into<String>,
    ) -> Result<GenerateContentResponse, LlmError> {
        let user_turn = Content::user(text);
        let mut contents = self.history.clone();
        contents.push(user_turn.clone());

        let response = self.model.generate_content(contents).await?;
        response.check()?;

        // check() guarantees a first candidate
        let reply = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.clone())
            .unwrap_or_else(|| Content {
                role: Some(ChatRole::Model),
                parts: Vec::new(),
            });

        self.history.push(user_turn);
        self.history.push(reply);
        Ok(response)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ChatRole>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some(ChatRole::User),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    pub usage_metadata: Option<LanguageModelUsage>,
}

/// Finish reasons that still count as a normal completion.
const NORMAL_FINISH_REASONS: &[&str] = &["FINISH_REASON_UNSPECIFIED", "STOP", "MAX_TOKENS"];

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Result<String, LlmError> {
        let candidate = self
            .candidates
            .first()
            .ok_or_else(|| LlmError::Blocked {
                reason: self.block_reason().map(str::to_string),
            })?;

        let texts: Vec<&str> = candidate
            .content
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect();

        if texts.is_empty() {
            return Err(LlmError::EmptyResponse {
                finish_reason: candidate.finish_reason.clone(),
            });
        }

        Ok(texts.concat())
    }

    pub fn usage(&self) -> Option<&LanguageModelUsage> {
        self.usage_metadata.as_ref()
    }

    fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
    }

    /// Reject blocked prompts and candidates that stopped abnormally.
    fn check(&self) -> Result<(), LlmError> {
        let Some(candidate) = self.candidates.first() else {
            return Err(LlmError::Blocked {
                reason: self.block_reason().map(str::to_string),
            });
        };

        match candidate.finish_reason.as_deref() {
            Some(reason) if !NORMAL_FINISH_REASONS.contains(&reason) => {
                Err(LlmError::StoppedCandidate {
                    finish_reason: reason.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}
