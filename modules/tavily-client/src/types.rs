use serde::{Deserialize, Serialize};

/// Request body for POST /search. Tavily takes the API key in the body,
/// not a header.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub api_key: String,
    pub query: String,
    /// "basic" or "advanced".
    pub search_depth: String,
    pub max_results: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<TavilyResult>,
}

/// One ranked search hit. Results arrive ordered by provider-assigned
/// relevance; callers must preserve that order.
#[derive(Debug, Clone, Deserialize)]
pub struct TavilyResult {
    pub title: String,
    pub content: String,
    pub url: String,
    #[serde(default)]
    pub published_date: Option<String>,
}
