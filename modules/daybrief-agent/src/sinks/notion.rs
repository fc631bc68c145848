use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::debug;

use daybrief_common::{BriefError, Report};

use crate::flows::FlowSpec;
use crate::traits::PersistenceSink;

use super::{truncate_chars, Block, RecordPayload, MAX_RICH_TEXT_CHARS};

const NOTION_API_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Notion database sink. Creates one page per run under the configured
/// database, with typed properties and rendered content blocks.
pub struct NotionSink {
    api_key: String,
    database_id: String,
    http: reqwest::Client,
    base_url: String,
}

impl NotionSink {
    pub fn new(api_key: String, database_id: String, http: reqwest::Client) -> Self {
        Self {
            api_key,
            database_id,
            http,
            base_url: NOTION_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Wire body for pages.create, built from an already-truncated payload.
    fn page_body(&self, record: &RecordPayload) -> serde_json::Value {
        let children: Vec<serde_json::Value> = record.blocks.iter().map(block_body).collect();

        let mut properties = json!({
            "Name": { "title": [{ "text": { "content": record.title } }] },
            "Date": { "date": { "start": record.date } },
            "Status": { "select": { "name": record.status } },
            "Summary": { "rich_text": [{ "text": { "content": record.summary } }] },
            "Value": { "rich_text": [{ "text": { "content": record.value } }] },
            "App Inspiration": { "rich_text": [{ "text": { "content": record.app_inspiration } }] },
        });
        if let Some(url) = &record.url {
            properties["url"] = json!({ "url": url });
        }

        json!({
            "parent": { "database_id": self.database_id },
            "properties": properties,
            "children": children,
        })
    }
}

fn block_body(block: &Block) -> serde_json::Value {
    match block {
        Block::Heading(text) => json!({
            "object": "block",
            "type": "heading_2",
            "heading_2": { "rich_text": [{ "text": { "content": text } }] },
        }),
        Block::Callout(text) => json!({
            "object": "block",
            "type": "callout",
            "callout": { "rich_text": [{ "text": { "content": text } }] },
        }),
        Block::Paragraph(text) => json!({
            "object": "block",
            "type": "paragraph",
            "paragraph": { "rich_text": [{ "text": { "content": text } }] },
        }),
        Block::Divider => json!({
            "object": "block",
            "type": "divider",
            "divider": {},
        }),
    }
}

fn cap(text: &str) -> String {
    truncate_chars(text, MAX_RICH_TEXT_CHARS)
}

#[async_trait]
impl PersistenceSink for NotionSink {
    fn render(&self, report: &Report, flow: &FlowSpec) -> RecordPayload {
        // Destination rejects non-http urls on a url property.
        let url = report
            .source_url
            .as_ref()
            .filter(|u| u.starts_with("http"))
            .cloned();

        let mut blocks = vec![
            Block::Heading(cap(&report.video.title)),
            Block::Callout(cap(&report.video.hook)),
            Block::Paragraph(cap(&report.video.key_point)),
            Block::Divider,
            Block::Heading("App opportunity".to_string()),
            Block::Paragraph(cap(&report.app_opportunity.insight)),
            Block::Paragraph(cap(&report.app_opportunity.action)),
        ];
        if let Some(script) = &report.script {
            blocks.push(Block::Divider);
            blocks.push(Block::Heading("Script".to_string()));
            blocks.push(Block::Paragraph(cap(&script.opening)));
            blocks.push(Block::Paragraph(cap(&script.body)));
            blocks.push(Block::Paragraph(cap(&script.call_to_action)));
        }

        RecordPayload {
            title: cap(&format!("{} {}", flow.title_prefix, report.headline)),
            date: Utc::now().format("%Y-%m-%d").to_string(),
            status: flow.record_status.to_string(),
            summary: cap(&report.video.key_point),
            value: cap(&report.app_opportunity.insight),
            app_inspiration: cap(&report.app_opportunity.action),
            url,
            blocks,
        }
    }

    async fn send(&self, record: &RecordPayload) -> Result<(), BriefError> {
        debug!(title = %record.title, "Notion pages.create");

        let resp = self
            .http
            .post(format!("{}/pages", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(&self.page_body(record))
            .send()
            .await
            .map_err(|e| BriefError::sink("persistence", e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BriefError::sink(
                "persistence",
                format!("pages.create returned {status}: {body}"),
            ));
        }
        Ok(())
    }
}
