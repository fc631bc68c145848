// Test mocks for the pipeline's four trait boundaries:
// - MockSearcher (NewsSearcher) — fixed result list
// - ScriptedProvider (GenerationProvider) — scripted per-attempt outcomes,
//   records every request so tests can assert the failover sequence
// - RecordingNotifier / RecordingPersister — capture payloads, optionally
//   fail every send, and feed a shared CallLog for ordering assertions
//
// Plus helpers for sample reports, search results, and flow specs.
// No network, no keys.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use daybrief_common::{
    BriefError, GenerationRequest, ProviderError, Report, SearchDepth, SearchResult,
};

use crate::flows::{daily_flows, FlowSpec};
use crate::generate::ModelPair;
use crate::sinks::{truncate_chars, RecordPayload, MAX_RICH_TEXT_CHARS};
use crate::traits::{GenerationProvider, NewsSearcher, NotificationSink, PersistenceSink};

// ---------------------------------------------------------------------------
// Sample data
// ---------------------------------------------------------------------------

/// A well-formed single-report response, as the model should emit it.
pub fn sample_report_json() -> String {
    r#"{
        "headline": "Rates held steady",
        "video": {
            "title": "Why your bank hopes you ignore this",
            "hook": "Your savings account is lying to you",
            "key_point": "Nominal vs real interest"
        },
        "app_opportunity": {
            "insight": "Users will want to compare account yields",
            "action": "Ship the rate-alert widget"
        }
    }"#
    .to_string()
}

pub fn sample_report() -> Report {
    serde_json::from_str(&sample_report_json()).unwrap()
}

pub fn sample_results(n: usize) -> Vec<SearchResult> {
    (0..n)
        .map(|i| SearchResult {
            title: format!("Headline {i}"),
            content: format!("Body of story {i}"),
            published_date: Some("2025-12-03".to_string()),
            url: format!("https://news.example/{i}"),
        })
        .collect()
}

pub fn test_models() -> ModelPair {
    ModelPair {
        primary: "primary-model".to_string(),
        secondary: "secondary-model".to_string(),
    }
}

/// The transient overload signature.
pub fn overloaded() -> ProviderError {
    ProviderError::Api {
        status: 503,
        message: "The model is overloaded. Please try again later.".to_string(),
    }
}

/// The single-report flow from the real daily job.
pub fn daily_brief_flow() -> FlowSpec {
    daily_flows().remove(0)
}

/// A filtered-discovery flow from the real daily job.
pub fn discovery_flow() -> FlowSpec {
    daily_flows().remove(1)
}

// ---------------------------------------------------------------------------
// CallLog — cross-sink ordering
// ---------------------------------------------------------------------------

/// Shared append-only event log so ordering across mocks can be asserted.
#[derive(Clone, Default)]
pub struct CallLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: &str) {
        self.events.lock().unwrap().push(event.to_string());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

// ---------------------------------------------------------------------------
// MockSearcher
// ---------------------------------------------------------------------------

pub struct MockSearcher {
    results: Vec<SearchResult>,
    queries: Mutex<Vec<String>>,
}

impl MockSearcher {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsSearcher for MockSearcher {
    async fn search(
        &self,
        query: &str,
        _depth: SearchDepth,
        _max_results: u32,
    ) -> Result<Vec<SearchResult>, BriefError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.results.clone())
    }
}

// ---------------------------------------------------------------------------
// ScriptedProvider
// ---------------------------------------------------------------------------

/// Generation provider that plays back a script of outcomes, one per
/// attempt, while recording every request it sees.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Model ids in the order attempts were made.
    pub fn models_requested(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.model_id.clone())
            .collect()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationProvider for ScriptedProvider {
    async fn generate_json(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Transport("script exhausted".to_string())))
    }
}

// ---------------------------------------------------------------------------
// RecordingNotifier / RecordingPersister
// ---------------------------------------------------------------------------

pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    fail: bool,
    log: Option<CallLog>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
            log: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    fn render(&self, report: &Report, flow: &FlowSpec) -> String {
        format!("[{}] {} | {}", flow.name, report.headline, report.video.hook)
    }

    async fn send(&self, message: &str) -> Result<(), BriefError> {
        if self.fail {
            return Err(BriefError::sink("notification", "injected failure"));
        }
        if let Some(log) = &self.log {
            log.push("notify");
        }
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

pub struct RecordingPersister {
    sent: Mutex<Vec<RecordPayload>>,
    fail: bool,
    log: Option<CallLog>,
}

impl RecordingPersister {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
            log: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn sent(&self) -> Vec<RecordPayload> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for RecordingPersister {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistenceSink for RecordingPersister {
    fn render(&self, report: &Report, flow: &FlowSpec) -> RecordPayload {
        RecordPayload {
            title: truncate_chars(
                &format!("{} {}", flow.title_prefix, report.headline),
                MAX_RICH_TEXT_CHARS,
            ),
            date: "2025-12-03".to_string(),
            status: flow.record_status.to_string(),
            summary: truncate_chars(&report.video.key_point, MAX_RICH_TEXT_CHARS),
            value: truncate_chars(&report.app_opportunity.insight, MAX_RICH_TEXT_CHARS),
            app_inspiration: truncate_chars(&report.app_opportunity.action, MAX_RICH_TEXT_CHARS),
            url: report.source_url.clone(),
            blocks: Vec::new(),
        }
    }

    async fn send(&self, record: &RecordPayload) -> Result<(), BriefError> {
        if self.fail {
            return Err(BriefError::sink("persistence", "injected failure"));
        }
        if let Some(log) = &self.log {
            log.push("persist");
        }
        self.sent.lock().unwrap().push(record.clone());
        Ok(())
    }
}
