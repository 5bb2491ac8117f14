use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum LlmError {
    /// A precondition on the component configuration was not met.
    #[error("{0}")]
    Configuration(String),

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Provider configuration error: {0}")]
    ProviderConfiguration(String),

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: BoxError,
    },

    /// The prompt was rejected and no candidates were returned.
    #[error("Response has no candidates (block reason: {})", .reason.as_deref().unwrap_or("unspecified"))]
    Blocked { reason: Option<String> },

    /// Generation ended for a reason other than a normal stop.
    #[error("Candidate stopped early (finish reason: {finish_reason})")]
    StoppedCandidate { finish_reason: String },

    /// The first candidate carried no text parts.
    #[error("Response candidate contains no text (finish reason: {})", .finish_reason.as_deref().unwrap_or("unspecified"))]
    EmptyResponse { finish_reason: Option<String> },
}

impl LlmError {
    pub(crate) fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        LlmError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status of a remote failure, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }
}
