use serde::{Deserialize, Serialize};

/// The validated JSON report produced by the generation collaborator.
///
/// One schema serves every flow: the brief flow fills the required blocks
/// and leaves `found` absent; the discovery flows set `found` and usually
/// carry a `source_url`. A Report is the sole unit handed to sinks, never
/// forwarded in part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Discovery flag. Absent means "always persist" (single-report mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,

    /// One-line summary of the most important finding.
    pub headline: String,

    /// Short-form video strategy.
    pub video: VideoStrategy,

    /// Product feature opportunity.
    pub app_opportunity: AppOpportunity,

    /// Optional long-form script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<Script>,

    /// Link to the underlying paper/product, when the flow surfaces one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStrategy {
    pub title: String,
    /// First-three-seconds copy.
    pub hook: String,
    pub key_point: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppOpportunity {
    /// What user need the news implies.
    pub insight: String,
    /// Which concrete feature to act on.
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub opening: String,
    pub body: String,
    pub call_to_action: String,
}
