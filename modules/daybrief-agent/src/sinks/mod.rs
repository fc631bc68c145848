pub mod discord;
pub mod notion;

pub use discord::DiscordSink;
pub use notion::NotionSink;

/// Hard cap on any free-text property sent to the persistence destination;
/// its rich-text fields reject anything longer.
pub const MAX_RICH_TEXT_CHARS: usize = 2000;

/// Sink-side rendering of a Report for the persistence destination:
/// typed properties plus an ordered sequence of content blocks.
/// Constructed once per run and never mutated afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPayload {
    pub title: String,
    /// ISO date (YYYY-MM-DD).
    pub date: String,
    /// Single-select status value.
    pub status: String,
    pub summary: String,
    pub value: String,
    pub app_inspiration: String,
    /// Only set for http(s) links; anything else is dropped.
    pub url: Option<String>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Callout(String),
    Paragraph(String),
    Divider,
}

/// First `max` characters of `text`. Counts Unicode scalar values, so the
/// cut can never land inside a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
