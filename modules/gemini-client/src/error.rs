use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeminiError>;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty response: no candidate text returned")]
    EmptyResponse,
}

impl GeminiError {
    /// Whether this failure is the overload signature (HTTP 503 or an
    /// "overloaded" marker in the error body), as opposed to an auth,
    /// validation, or transport fault.
    pub fn is_overloaded(&self) -> bool {
        match self {
            GeminiError::Api { status, message } => {
                *status == 503 || message.contains("overloaded")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        GeminiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GeminiError {
    fn from(err: serde_json::Error) -> Self {
        GeminiError::Parse(err.to_string())
    }
}
