pub mod error;
pub mod types;

pub use error::{Result, TavilyError};
pub use types::{SearchRequest, SearchResponse, TavilyResult};

const BASE_URL: &str = "https://api.tavily.com";

pub struct TavilyClient {
    client: reqwest::Client,
    api_key: String,
}

impl TavilyClient {
    pub fn new(api_key: String, client: reqwest::Client) -> Self {
        Self { client, api_key }
    }

    /// Run one search query. Returns hits in provider relevance order.
    pub async fn search(
        &self,
        query: &str,
        search_depth: &str,
        max_results: u32,
    ) -> Result<Vec<TavilyResult>> {
        let request = SearchRequest {
            api_key: self.api_key.clone(),
            query: query.to_string(),
            search_depth: search_depth.to_string(),
            max_results,
        };

        tracing::debug!(query, search_depth, max_results, "Tavily search request");

        let resp = self
            .client
            .post(format!("{BASE_URL}/search"))
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TavilyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        tracing::debug!(count = parsed.results.len(), "Tavily search complete");
        Ok(parsed.results)
    }
}
