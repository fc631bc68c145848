//! Data-driven flow definitions.
//!
//! Each flow is one pipeline run: a search query, a persona, a report mode,
//! and sink presentation details. The daily job runs them strictly one
//! after another; adding a flow means adding data here, not code anywhere
//! else.

use daybrief_common::SearchDepth;

use crate::context::ContextStyle;
use crate::validate::ReportMode;

#[derive(Debug, Clone)]
pub struct FlowSpec {
    /// Stable flow name, used in logs.
    pub name: &'static str,
    pub query: &'static str,
    pub depth: SearchDepth,
    pub max_results: u32,
    /// System instruction for the generation call.
    pub persona: &'static str,
    /// Prefix prepended to the aggregated context in the user prompt.
    pub context_preamble: &'static str,
    pub context_style: ContextStyle,
    pub mode: ReportMode,
    /// Prefix for the persisted record's title property.
    pub title_prefix: &'static str,
    /// Single-select status value on the persisted record.
    pub record_status: &'static str,
}

/// The shared JSON contract every persona must write into. The response
/// MIME type already forbids markdown; the schema text keeps the field
/// names stable across flows.
const REPORT_SCHEMA: &str = r#"Respond with a single JSON object and nothing else, using exactly this shape:
{
  "headline": "one sentence naming today's most important finding",
  "video": {
    "title": "a scroll-stopping short-form video title",
    "hook": "the first-three-seconds line; it must create curiosity or urgency",
    "key_point": "the one concept the video teaches"
  },
  "app_opportunity": {
    "insight": "what new user need this implies for a personal-finance tracking app",
    "action": "the one concrete app feature to build or improve"
  },
  "script": {
    "opening": "...", "body": "...", "call_to_action": "..."
  },
  "source_url": "https://... (the single best source link, if one stands out)"
}
"script" and "source_url" are optional; omit them rather than inventing content."#;

const BRIEF_PERSONA_HEADER: &str = r#"You are a financial content and product strategist advising a one-person company.
The operator ships an iOS subscription budgeting app (minimal expense tracking, strong visualization) and runs a short-video channel doing hard-nosed but accessible finance explainers.
Read the provided news snippets and produce one actionable daily report."#;

const RESEARCH_PERSONA_HEADER: &str = r#"You are an academically rigorous technical advisor.
From the search results, pick the ONE most noteworthy 2025 AI paper or foundational-model update for a developer building a personal-finance agent.
Strict recency filter:
1. The work must be published in 2025 (prefer late 2025).
2. Discard anything from 2024 or earlier outright.
3. If every result is old news, respond with {"found": false} and nothing else.
If you do find one, set "found": true, put the paper's contribution in "headline", angle the video blocks at explaining it to a lay audience, use "app_opportunity" for what it unlocks in the agent (memory, hallucination, reasoning), and set "source_url" to the paper link."#;

const APPS_PERSONA_HEADER: &str = r#"You are a product hunter.
From the search results, pick the ONE most inventive AI product or developer tool newly released in 2025.
Strict recency filter:
1. It must be a 2025 launch or major update.
2. Reject long-established 2023/2024 tools resurfacing in coverage.
3. If nothing qualifies, respond with {"found": false} and nothing else.
If you do find one, set "found": true, name the product and its core interaction in "headline", use the video blocks to pitch it, use "app_opportunity" for which of its interaction details is worth borrowing, and set "source_url" to the product link."#;

/// The composed daily job, in execution order. Strictly sequential to stay
/// inside the generation provider's per-minute rate limit.
pub fn daily_flows() -> Vec<FlowSpec> {
    vec![
        FlowSpec {
            name: "daily-brief",
            query: "latest financial market news tech stock trends personal finance regulation",
            depth: SearchDepth::Advanced,
            max_results: 5,
            persona: BRIEF_PERSONA_HEADER,
            context_preamble: "Today's collected headlines, ranked by relevance:",
            context_style: ContextStyle::Plain,
            mode: ReportMode::SingleReport,
            title_prefix: "📰 [Brief]",
            record_status: "Brief",
        },
        FlowSpec {
            name: "research",
            query: "latest AI research papers arXiv December 2025 finance reasoning",
            depth: SearchDepth::Advanced,
            max_results: 7,
            persona: RESEARCH_PERSONA_HEADER,
            context_preamble: "Collected paper coverage:",
            context_style: ContextStyle::Dated,
            mode: ReportMode::FilteredDiscovery,
            title_prefix: "📑 [Paper]",
            record_status: "Paper",
        },
        FlowSpec {
            name: "apps",
            query: "top trending new AI developer tools Product Hunt GitHub released December 2025",
            depth: SearchDepth::Advanced,
            max_results: 6,
            persona: APPS_PERSONA_HEADER,
            context_preamble: "Collected product coverage:",
            context_style: ContextStyle::Plain,
            mode: ReportMode::FilteredDiscovery,
            title_prefix: "🚀 [App]",
            record_status: "App",
        },
    ]
}

impl FlowSpec {
    /// Full system instruction: persona plus the shared JSON contract.
    pub fn system_instruction(&self) -> String {
        format!("{}\n\n{}", self.persona, REPORT_SCHEMA)
    }

    /// Full user prompt for an aggregated context blob.
    pub fn user_prompt(&self, context: &str) -> String {
        format!("{}\n{}", self.context_preamble, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_job_runs_brief_then_research_then_apps() {
        let names: Vec<_> = daily_flows().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["daily-brief", "research", "apps"]);
    }

    #[test]
    fn discovery_flows_tell_the_model_about_the_found_flag() {
        for flow in daily_flows() {
            let instruction = flow.system_instruction();
            match flow.mode {
                ReportMode::FilteredDiscovery => {
                    assert!(instruction.contains(r#"{"found": false}"#), "{}", flow.name)
                }
                ReportMode::SingleReport => {
                    assert!(!instruction.contains(r#"{"found": false}"#), "{}", flow.name)
                }
            }
        }
    }
}
