pub mod error;
mod types;

pub use error::{GeminiError, Result};

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use types::{GenerateContentRequest, GenerateContentResponse};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClient {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, http: reqwest::Client) -> Self {
        Self {
            api_key,
            http,
            base_url: GEMINI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| GeminiError::Parse(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Call generateContent with a JSON-only response contract and return
    /// the raw candidate text. The caller owns parsing that text.
    pub async fn generate_json(
        &self,
        model: &str,
        system_instruction: &str,
        user_text: &str,
    ) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let request = GenerateContentRequest::new(system_instruction, user_text);

        debug!(model, "Gemini generateContent request");

        let resp = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        parsed.text().ok_or(GeminiError::EmptyResponse)
    }
}
