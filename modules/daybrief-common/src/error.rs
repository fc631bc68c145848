use thiserror::Error;

/// Pipeline error taxonomy. A discovery skip (`found: false`) is not an
/// error and never appears here; it is a normal flow outcome.
#[derive(Debug, Error)]
pub enum BriefError {
    /// Every attempt in the retry budget hit the overload signature.
    #[error("generation provider overloaded, retry budget exhausted after {attempts} attempts")]
    TransientExhausted { attempts: u32 },

    /// Non-retryable generation failure (bad credentials, malformed
    /// request, transport fault). Propagated on the first occurrence.
    #[error("generation provider failed: {0}")]
    FatalProvider(String),

    /// The model answered, but the answer broke the JSON contract.
    /// Never retried through the failover path.
    #[error("report violates the JSON contract: {0}")]
    SchemaViolation(String),

    /// A sink write failed. Any sink write that already completed stays
    /// completed; there is no rollback.
    #[error("{sink} sink failed: {message}")]
    Sink { sink: &'static str, message: String },

    #[error("search failed: {0}")]
    Search(String),
}

impl BriefError {
    pub fn sink(sink: &'static str, err: impl std::fmt::Display) -> Self {
        BriefError::Sink {
            sink,
            message: err.to_string(),
        }
    }
}

/// Raw failure surfaced by the generation collaborator, before the retry
/// policy classifies it. Kept separate from [`BriefError`] so callers
/// cannot confuse a contract breach with provider flakiness.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),
}

impl ProviderError {
    /// The overload signature: HTTP 503 or an "overloaded" marker in the
    /// error body. Everything else is fatal.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Api { status, message } => {
                *status == 503 || message.contains("overloaded")
            }
            ProviderError::Transport(_) => false,
        }
    }
}
