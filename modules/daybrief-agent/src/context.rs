use daybrief_common::SearchResult;

/// How a flow renders search hits into the model's context blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextStyle {
    /// `[Date Check] <date> | [Title] <t> | [Content] <c>`, newline-joined.
    /// Used where the persona must filter stale material by date.
    Dated,
    /// `[Title] <t>\n[Content] <c>`, `---`-separated.
    Plain,
}

/// Concatenate ranked search results into one context blob. Deterministic
/// and order-preserving; no re-ranking, de-duplication, or truncation.
pub fn aggregate(results: &[SearchResult], style: ContextStyle) -> String {
    match style {
        ContextStyle::Dated => results
            .iter()
            .map(|r| {
                format!(
                    "[Date Check] {} | [Title] {} | [Content] {}",
                    r.published_date.as_deref().unwrap_or("Unknown Date"),
                    r.title,
                    r.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        ContextStyle::Plain => results
            .iter()
            .map(|r| format!("[Title] {}\n[Content] {}", r.title, r.content))
            .collect::<Vec<_>>()
            .join("\n---\n"),
    }
}
