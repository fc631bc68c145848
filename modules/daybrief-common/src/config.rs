use std::env;

/// Primary generation model; overridable via GEMINI_PRIMARY_MODEL.
pub const DEFAULT_PRIMARY_MODEL: &str = "gemini-2.5-flash";
/// Failover model used after the first transient overload;
/// overridable via GEMINI_SECONDARY_MODEL.
pub const DEFAULT_SECONDARY_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // AI providers
    pub gemini_api_key: String,
    pub tavily_api_key: String,

    // Generation models
    pub primary_model: String,
    pub secondary_model: String,

    // Sinks
    pub discord_webhook_url: String,
    pub notion_api_key: String,
    pub notion_database_id: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: required_env("GEMINI_API_KEY"),
            tavily_api_key: required_env("TAVILY_API_KEY"),
            primary_model: env::var("GEMINI_PRIMARY_MODEL")
                .unwrap_or_else(|_| DEFAULT_PRIMARY_MODEL.to_string()),
            secondary_model: env::var("GEMINI_SECONDARY_MODEL")
                .unwrap_or_else(|_| DEFAULT_SECONDARY_MODEL.to_string()),
            discord_webhook_url: required_env("DISCORD_WEBHOOK_URL"),
            notion_api_key: required_env("NOTION_API_KEY"),
            notion_database_id: required_env("NOTION_DATABASE_ID"),
        }
    }

    /// Log which credentials are present without echoing their values.
    pub fn log_redacted(&self) {
        tracing::info!(
            gemini_api_key = %redact(&self.gemini_api_key),
            tavily_api_key = %redact(&self.tavily_api_key),
            primary_model = %self.primary_model,
            secondary_model = %self.secondary_model,
            discord_webhook = %redact(&self.discord_webhook_url),
            notion_api_key = %redact(&self.notion_api_key),
            notion_database_id = %self.notion_database_id,
            "Configuration loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "(empty)"
    } else {
        "(set)"
    }
}
