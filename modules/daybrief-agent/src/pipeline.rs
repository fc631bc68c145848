//! Flow orchestration.
//!
//! One flow walks Searching → Generating → Validating → Deciding →
//! Notifying → Persisting → Done; any fatal error drops it into Aborted.
//! The composed daily job runs flows strictly one after another, and one
//! flow's abort never stops the next.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info};

use daybrief_common::{BriefError, Report};

use crate::context;
use crate::flows::FlowSpec;
use crate::generate::GenerationClient;
use crate::traits::{NewsSearcher, NotificationSink, PersistenceSink};
use crate::validate::{self, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Searching,
    Generating,
    Validating,
    Deciding,
    Notifying,
    Persisting,
    Done,
    Aborted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Searching => "searching",
            Stage::Generating => "generating",
            Stage::Validating => "validating",
            Stage::Deciding => "deciding",
            Stage::Notifying => "notifying",
            Stage::Persisting => "persisting",
            Stage::Done => "done",
            Stage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Terminal state of one successfully completed flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Report published to both sinks.
    Published,
    /// Discovery flow declared nothing worth reporting; no sink was
    /// touched. Normal, not an error.
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobSummary {
    pub published: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct Pipeline {
    searcher: Arc<dyn NewsSearcher>,
    generator: GenerationClient,
    notifier: Arc<dyn NotificationSink>,
    persister: Arc<dyn PersistenceSink>,
}

impl Pipeline {
    pub fn new(
        searcher: Arc<dyn NewsSearcher>,
        generator: GenerationClient,
        notifier: Arc<dyn NotificationSink>,
        persister: Arc<dyn PersistenceSink>,
    ) -> Self {
        Self {
            searcher,
            generator,
            notifier,
            persister,
        }
    }

    /// Run one flow end to end. No sink is touched until a Report has
    /// validated; sink writes happen notify-then-persist with no rollback
    /// of a completed write if the later one fails.
    pub async fn run_flow(&self, flow: &FlowSpec) -> Result<FlowOutcome, BriefError> {
        let stage = |s: Stage| info!(flow = flow.name, stage = %s, "stage");

        stage(Stage::Searching);
        let results = self
            .searcher
            .search(flow.query, flow.depth, flow.max_results)
            .await
            .inspect_err(|e| self.abort(flow, Stage::Searching, e))?;
        info!(flow = flow.name, results = results.len(), "search complete");
        let context = context::aggregate(&results, flow.context_style);

        stage(Stage::Generating);
        let raw = self
            .generator
            .generate(&flow.system_instruction(), &flow.user_prompt(&context))
            .await
            .inspect_err(|e| self.abort(flow, Stage::Generating, e))?;

        stage(Stage::Validating);
        let verdict = validate::validate(&raw, flow.mode)
            .inspect_err(|e| self.abort(flow, Stage::Validating, e))?;

        stage(Stage::Deciding);
        let report = match verdict {
            Verdict::NothingFound => {
                info!(flow = flow.name, "nothing worth reporting today, skipping sinks");
                stage(Stage::Done);
                return Ok(FlowOutcome::Skipped);
            }
            Verdict::Report(report) if report.found == Some(false) => {
                info!(flow = flow.name, "report marked found=false, skipping sinks");
                stage(Stage::Done);
                return Ok(FlowOutcome::Skipped);
            }
            Verdict::Report(report) => report,
        };

        self.fan_out(flow, &report).await?;

        stage(Stage::Done);
        Ok(FlowOutcome::Published)
    }

    /// Fixed-order synchronous fan-out: notify, then persist.
    async fn fan_out(&self, flow: &FlowSpec, report: &Report) -> Result<(), BriefError> {
        info!(flow = flow.name, stage = %Stage::Notifying, "stage");
        let message = self.notifier.render(report, flow);
        self.notifier
            .send(&message)
            .await
            .inspect_err(|e| self.abort(flow, Stage::Notifying, e))?;

        info!(flow = flow.name, stage = %Stage::Persisting, "stage");
        let record = self.persister.render(report, flow);
        self.persister
            .send(&record)
            .await
            .inspect_err(|e| self.abort(flow, Stage::Persisting, e))?;

        Ok(())
    }

    fn abort(&self, flow: &FlowSpec, failed_stage: Stage, err: &BriefError) {
        error!(
            flow = flow.name,
            stage = %Stage::Aborted,
            failed_stage = %failed_stage,
            error = %err,
            "flow aborted"
        );
    }

    /// Run the composed job: every flow, strictly sequentially, each under
    /// its own top-level handler so a failure in one never prevents the
    /// next from attempting.
    pub async fn run_all(&self, flows: &[FlowSpec]) -> JobSummary {
        let mut summary = JobSummary::default();

        for flow in flows {
            match self.run_flow(flow).await {
                Ok(FlowOutcome::Published) => {
                    info!(flow = flow.name, "flow published");
                    summary.published += 1;
                }
                Ok(FlowOutcome::Skipped) => {
                    summary.skipped += 1;
                }
                Err(_) => {
                    // Already logged at the failing stage.
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybrief_common::ProviderError;

    use crate::generate::GenerationClient;
    use crate::testing::{
        daily_brief_flow, discovery_flow, overloaded, sample_report_json, sample_results,
        test_models, CallLog, MockSearcher, RecordingNotifier, RecordingPersister,
        ScriptedProvider,
    };

    fn pipeline_with(
        provider: ScriptedProvider,
        notifier: Arc<RecordingNotifier>,
        persister: Arc<RecordingPersister>,
    ) -> Pipeline {
        let generator = GenerationClient::new(Arc::new(provider), test_models());
        Pipeline::new(
            Arc::new(MockSearcher::new(sample_results(5))),
            generator,
            notifier,
            persister,
        )
    }

    #[tokio::test]
    async fn end_to_end_publishes_once_to_each_sink_in_order() {
        let log = CallLog::new();
        let notifier = Arc::new(RecordingNotifier::new().with_log(log.clone()));
        let persister = Arc::new(RecordingPersister::new().with_log(log.clone()));
        let provider = ScriptedProvider::new(vec![Ok(sample_report_json())]);
        let pipeline = pipeline_with(provider, notifier.clone(), persister.clone());

        let outcome = pipeline.run_flow(&daily_brief_flow()).await.unwrap();

        assert_eq!(outcome, FlowOutcome::Published);
        assert_eq!(notifier.sent().len(), 1);
        assert_eq!(persister.sent().len(), 1);
        assert_eq!(log.events(), vec!["notify", "persist"]);
        // Both payloads derive from the same validated report.
        assert!(notifier.sent()[0].contains("Rates held steady"));
        assert!(persister.sent()[0].title.contains("Rates held steady"));
    }

    #[tokio::test]
    async fn discovery_found_false_touches_no_sink() {
        let notifier = Arc::new(RecordingNotifier::new());
        let persister = Arc::new(RecordingPersister::new());
        let provider = ScriptedProvider::new(vec![Ok(r#"{"found": false}"#.to_string())]);
        let pipeline = pipeline_with(provider, notifier.clone(), persister.clone());

        let outcome = pipeline.run_flow(&discovery_flow()).await.unwrap();

        assert_eq!(outcome, FlowOutcome::Skipped);
        assert!(notifier.sent().is_empty());
        assert!(persister.sent().is_empty());
    }

    #[tokio::test]
    async fn discovery_found_true_publishes_to_both_sinks() {
        let notifier = Arc::new(RecordingNotifier::new());
        let persister = Arc::new(RecordingPersister::new());
        let raw = sample_report_json().replacen('{', r#"{"found": true,"#, 1);
        let provider = ScriptedProvider::new(vec![Ok(raw)]);
        let pipeline = pipeline_with(provider, notifier.clone(), persister.clone());

        let outcome = pipeline.run_flow(&discovery_flow()).await.unwrap();

        assert_eq!(outcome, FlowOutcome::Published);
        assert_eq!(notifier.sent().len(), 1);
        assert_eq!(persister.sent().len(), 1);
    }

    #[tokio::test]
    async fn unparseable_response_aborts_before_any_sink_write() {
        let notifier = Arc::new(RecordingNotifier::new());
        let persister = Arc::new(RecordingPersister::new());
        let provider = ScriptedProvider::new(vec![Ok("not json at all".to_string())]);
        let pipeline = pipeline_with(provider, notifier.clone(), persister.clone());

        let err = pipeline.run_flow(&daily_brief_flow()).await.unwrap_err();

        assert!(matches!(err, BriefError::SchemaViolation(_)));
        assert!(notifier.sent().is_empty());
        assert!(persister.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_abort_before_any_sink_write() {
        let notifier = Arc::new(RecordingNotifier::new());
        let persister = Arc::new(RecordingPersister::new());
        let provider =
            ScriptedProvider::new(vec![Err(overloaded()), Err(overloaded()), Err(overloaded())]);
        let pipeline = pipeline_with(provider, notifier.clone(), persister.clone());

        let err = pipeline.run_flow(&daily_brief_flow()).await.unwrap_err();

        assert!(matches!(err, BriefError::TransientExhausted { attempts: 3 }));
        assert!(notifier.sent().is_empty());
        assert!(persister.sent().is_empty());
    }

    #[tokio::test]
    async fn fatal_provider_error_aborts_the_flow() {
        let notifier = Arc::new(RecordingNotifier::new());
        let persister = Arc::new(RecordingPersister::new());
        let provider = ScriptedProvider::new(vec![Err(ProviderError::Api {
            status: 401,
            message: "API key not valid".to_string(),
        })]);
        let pipeline = pipeline_with(provider, notifier.clone(), persister.clone());

        let err = pipeline.run_flow(&daily_brief_flow()).await.unwrap_err();

        assert!(matches!(err, BriefError::FatalProvider(_)));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_leaves_the_notification_in_place() {
        let notifier = Arc::new(RecordingNotifier::new());
        let persister = Arc::new(RecordingPersister::failing());
        let provider = ScriptedProvider::new(vec![Ok(sample_report_json())]);
        let pipeline = pipeline_with(provider, notifier.clone(), persister.clone());

        let err = pipeline.run_flow(&daily_brief_flow()).await.unwrap_err();

        assert!(matches!(err, BriefError::Sink { sink: "persistence", .. }));
        // No rollback: the already-delivered notification stays delivered.
        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn composed_job_runs_the_second_flow_after_the_first_aborts() {
        let notifier = Arc::new(RecordingNotifier::new());
        let persister = Arc::new(RecordingPersister::failing());
        let provider = ScriptedProvider::new(vec![
            Ok(sample_report_json()),
            Ok(sample_report_json()),
        ]);
        let pipeline = pipeline_with(provider, notifier.clone(), persister.clone());

        let flows = vec![daily_brief_flow(), daily_brief_flow()];
        let summary = pipeline.run_all(&flows).await;

        assert_eq!(summary.failed, 2);
        assert_eq!(summary.published, 0);
        // Both flows got as far as notifying: the first one's sink error
        // did not stop the second from executing.
        assert_eq!(notifier.sent().len(), 2);
    }

    #[tokio::test]
    async fn composed_job_counts_skips_and_publishes_independently() {
        let notifier = Arc::new(RecordingNotifier::new());
        let persister = Arc::new(RecordingPersister::new());
        let provider = ScriptedProvider::new(vec![
            Ok(sample_report_json()),
            Ok(r#"{"found": false}"#.to_string()),
        ]);
        let pipeline = pipeline_with(provider, notifier.clone(), persister.clone());

        let flows = vec![daily_brief_flow(), discovery_flow()];
        let summary = pipeline.run_all(&flows).await;

        assert_eq!(
            summary,
            JobSummary {
                published: 1,
                skipped: 1,
                failed: 0
            }
        );
        assert_eq!(persister.sent().len(), 1);
    }
}
