//! Generation invocation: retry budget, one-shot model failover, backoff.
//!
//! This is the only stateful part of a run. The selector starts on the
//! primary model and may take exactly one transition, Primary→Secondary,
//! on the first transient failure; it never reverts within a call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use daybrief_common::{BriefError, GenerationRequest, ProviderError};
use gemini_client::{GeminiClient, GeminiError};

use crate::traits::GenerationProvider;

/// Attempts per generation call, including the first.
pub const RETRY_BUDGET: u32 = 3;

/// Backoff between attempts is `BASE_DELAY * attempt_index`
/// (attempt_index starting at 1): 2s, then 4s.
pub const BASE_DELAY: Duration = Duration::from_millis(2000);

/// Primary/secondary model pair for one generation client.
#[derive(Debug, Clone)]
pub struct ModelPair {
    pub primary: String,
    pub secondary: String,
}

/// Two-state model selector with a single allowed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModelSelector {
    Primary,
    Secondary,
}

impl ModelSelector {
    fn current<'a>(&self, models: &'a ModelPair) -> &'a str {
        match self {
            ModelSelector::Primary => &models.primary,
            ModelSelector::Secondary => &models.secondary,
        }
    }

    /// Primary→Secondary; a no-op once on Secondary.
    fn demote(&mut self) {
        *self = ModelSelector::Secondary;
    }
}

pub struct GenerationClient {
    provider: Arc<dyn GenerationProvider>,
    models: ModelPair,
    retry_budget: u32,
    base_delay: Duration,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn GenerationProvider>, models: ModelPair) -> Self {
        Self {
            provider,
            models,
            retry_budget: RETRY_BUDGET,
            base_delay: BASE_DELAY,
        }
    }

    /// Invoke the model under the retry policy and return the raw response
    /// text. Transient overloads are retried with failover and backoff;
    /// everything else propagates on first sight. The returned text has
    /// NOT been checked against the report contract yet.
    pub async fn generate(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, BriefError> {
        let mut selector = ModelSelector::Primary;

        for attempt in 1..=self.retry_budget {
            let request = GenerationRequest {
                model_id: selector.current(&self.models).to_string(),
                system_instruction: system_instruction.to_string(),
                user_prompt: user_prompt.to_string(),
            };

            debug!(model = %request.model_id, attempt, "generation attempt");

            match self.provider.generate_json(&request).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_transient() => {
                    warn!(
                        model = %request.model_id,
                        attempt,
                        error = %err,
                        "generation provider overloaded"
                    );
                    selector.demote();
                    if attempt < self.retry_budget {
                        tokio::time::sleep(self.base_delay * attempt).await;
                    }
                }
                Err(err) => return Err(BriefError::FatalProvider(err.to_string())),
            }
        }

        Err(BriefError::TransientExhausted {
            attempts: self.retry_budget,
        })
    }
}

// ---------------------------------------------------------------------------
// Gemini adapter
// ---------------------------------------------------------------------------

/// [`GenerationProvider`] over the Gemini HTTP client.
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    async fn generate_json(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        self.client
            .generate_json(
                &request.model_id,
                &request.system_instruction,
                &request.user_prompt,
            )
            .await
            .map_err(|err| match err {
                GeminiError::Api { status, message } => ProviderError::Api { status, message },
                other => ProviderError::Transport(other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{overloaded, test_models, ScriptedProvider};

    fn client(provider: Arc<ScriptedProvider>) -> GenerationClient {
        GenerationClient::new(provider, test_models())
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_first_try_on_primary_with_no_delay() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("{}".to_string())]));
        let start = tokio::time::Instant::now();

        let text = client(provider.clone()).generate("sys", "user").await.unwrap();

        assert_eq!(text, "{}");
        assert_eq!(provider.models_requested(), vec!["primary-model"]);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn fails_over_to_secondary_on_first_transient_failure() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(overloaded()),
            Err(overloaded()),
            Ok(r#"{"ok":1}"#.to_string()),
        ]));
        let start = tokio::time::Instant::now();

        let text = client(provider.clone()).generate("sys", "user").await.unwrap();

        assert_eq!(text, r#"{"ok":1}"#);
        // Secondary from attempt 2 on, never reverting.
        assert_eq!(
            provider.models_requested(),
            vec!["primary-model", "secondary-model", "secondary-model"]
        );
        // 2000ms after attempt 1, 4000ms after attempt 2.
        assert_eq!(start.elapsed(), Duration::from_millis(6000));
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_before_attempt_two_is_one_base_delay() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(overloaded()),
            Ok("{}".to_string()),
        ]));
        let start = tokio::time::Instant::now();

        client(provider.clone()).generate("sys", "user").await.unwrap();

        assert_eq!(provider.models_requested(), vec!["primary-model", "secondary-model"]);
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausting_the_budget_surfaces_transient_exhausted() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(overloaded()),
            Err(overloaded()),
            Err(overloaded()),
        ]));

        let err = client(provider.clone()).generate("sys", "user").await.unwrap_err();

        assert!(matches!(err, BriefError::TransientExhausted { attempts: 3 }));
        assert_eq!(provider.models_requested().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_failure_propagates_without_retry_or_failover() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::Api {
                status: 401,
                message: "API key not valid".to_string(),
            }),
            Ok("{}".to_string()),
        ]));
        let start = tokio::time::Instant::now();

        let err = client(provider.clone()).generate("sys", "user").await.unwrap_err();

        assert!(matches!(err, BriefError::FatalProvider(_)));
        assert_eq!(provider.models_requested(), vec!["primary-model"]);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn request_carries_the_same_prompts_on_every_attempt() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(overloaded()),
            Ok("{}".to_string()),
        ]));

        client(provider.clone()).generate("persona", "context").await.unwrap();

        for request in provider.requests() {
            assert_eq!(request.system_instruction, "persona");
            assert_eq!(request.user_prompt, "context");
        }
    }
}
