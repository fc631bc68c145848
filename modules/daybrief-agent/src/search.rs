use async_trait::async_trait;

use daybrief_common::{BriefError, SearchDepth, SearchResult};
use tavily_client::TavilyClient;

use crate::traits::NewsSearcher;

/// Tavily-backed [`NewsSearcher`].
pub struct TavilySearcher {
    client: TavilyClient,
}

impl TavilySearcher {
    pub fn new(client: TavilyClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NewsSearcher for TavilySearcher {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: u32,
    ) -> Result<Vec<SearchResult>, BriefError> {
        let results = self
            .client
            .search(query, depth.as_str(), max_results)
            .await
            .map_err(|e| BriefError::Search(e.to_string()))?;

        Ok(results
            .into_iter()
            .map(|r| SearchResult {
                title: r.title,
                content: r.content,
                published_date: r.published_date,
                url: r.url,
            })
            .collect())
    }
}
