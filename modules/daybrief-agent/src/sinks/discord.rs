use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use daybrief_common::{BriefError, Report};

use crate::flows::FlowSpec;
use crate::traits::NotificationSink;

/// Discord webhook sink. The webhook accepts one human-readable text
/// field; any 2xx response counts as delivered.
pub struct DiscordSink {
    webhook_url: String,
    http: reqwest::Client,
}

impl DiscordSink {
    pub fn new(webhook_url: String, http: reqwest::Client) -> Self {
        Self { webhook_url, http }
    }
}

#[async_trait]
impl NotificationSink for DiscordSink {
    fn render(&self, report: &Report, flow: &FlowSpec) -> String {
        let date = Utc::now().format("%Y-%m-%d");
        let mut message = format!(
            "📅 **{date} {prefix} Daily Action Brief**\n\
             ----------------------------------\n\
             🗞️ **Top story:** {headline}\n\n\
             🎬 **Video strategy:**\n\
             > **Title:** {title}\n\
             > **Hook:** {hook}\n\n\
             📱 **App move:**\n{action}",
            prefix = flow.title_prefix,
            headline = report.headline,
            title = report.video.title,
            hook = report.video.hook,
            action = report.app_opportunity.action,
        );
        if let Some(url) = &report.source_url {
            message.push_str(&format!("\n🔗 {url}"));
        }
        message
    }

    async fn send(&self, message: &str) -> Result<(), BriefError> {
        debug!(chars = message.chars().count(), "Discord webhook POST");

        let resp = self
            .http
            .post(&self.webhook_url)
            .json(&serde_json::json!({ "content": message }))
            .send()
            .await
            .map_err(|e| BriefError::sink("notification", e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BriefError::sink(
                "notification",
                format!("webhook returned {status}: {body}"),
            ));
        }
        Ok(())
    }
}
