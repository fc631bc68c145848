use serde::{Deserialize, Serialize};

/// One ranked hit from the search collaborator. Order is assigned by the
/// provider and preserved end to end; nothing re-sorts these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub content: String,
    pub published_date: Option<String>,
    pub url: String,
}

/// Search depth accepted by the search collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDepth {
    Basic,
    Advanced,
}

impl SearchDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

/// One generation attempt. Immutable per attempt; only `model_id` varies
/// between attempts, via failover.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model_id: String,
    pub system_instruction: String,
    pub user_prompt: String,
}
