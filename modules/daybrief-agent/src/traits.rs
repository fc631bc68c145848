// Trait boundaries for the pipeline's external collaborators.
//
// NewsSearcher, GenerationProvider, NotificationSink, PersistenceSink wrap
// the four network surfaces (Tavily, Gemini, Discord, Notion). They enable
// deterministic testing with the mocks in `testing` — no network, no keys,
// `cargo test` in seconds.

use async_trait::async_trait;

use daybrief_common::{
    BriefError, GenerationRequest, ProviderError, Report, SearchDepth, SearchResult,
};

use crate::flows::FlowSpec;
use crate::sinks::RecordPayload;

/// Ranked web search. Implementations must preserve provider order.
#[async_trait]
pub trait NewsSearcher: Send + Sync {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: u32,
    ) -> Result<Vec<SearchResult>, BriefError>;
}

/// One raw generation attempt against a concrete model. Retry, failover,
/// and contract validation live above this seam.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate_json(&self, request: &GenerationRequest) -> Result<String, ProviderError>;
}

/// Chat-notification sink. `render` is pure; `send` is fire-and-forget
/// (no acknowledgment correlates back into the Report).
#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn render(&self, report: &Report, flow: &FlowSpec) -> String;
    async fn send(&self, message: &str) -> Result<(), BriefError>;
}

/// Structured-record sink. `render` applies the destination's field-size
/// cap; `send` creates exactly one record.
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    fn render(&self, report: &Report, flow: &FlowSpec) -> RecordPayload;
    async fn send(&self, record: &RecordPayload) -> Result<(), BriefError>;
}
