use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every request of a model handle.
///
/// Serialized with the field names the `generateContent` endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature
    pub temperature: f64,

    /// Nucleus sampling cutoff (0.0 to 1.0)
    pub top_p: f64,

    /// Number of most probable tokens considered when sampling
    pub top_k: i64,

    /// Maximum number of tokens to generate
    pub max_output_tokens: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// Token accounting reported by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageModelUsage {
    #[serde(default)]
    pub prompt_token_count: i64,
    #[serde(default)]
    pub candidates_token_count: i64,
    #[serde(default)]
    pub total_token_count: i64,
}
