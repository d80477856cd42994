use std::time::Duration;

use crate::error::{Result, UploadError};
use crate::response::ResponseSchema;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/upload";
pub const DEFAULT_FIGURES_PATH: &str = "/static/figures/";
pub const DEFAULT_SUMMARY_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_FIGURES_DELAY: Duration = Duration::from_millis(1000);

/// Settings for the upload controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub endpoint: String,
    pub static_figures_path: String,
    pub schema: ResponseSchema,
    /// Delay before the summary panel is revealed
    pub summary_delay: Duration,
    /// Delay before the figures panel is revealed, when there are figures
    pub figures_delay: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            static_figures_path: DEFAULT_FIGURES_PATH.to_string(),
            schema: ResponseSchema::Auto,
            summary_delay: DEFAULT_SUMMARY_DELAY,
            figures_delay: DEFAULT_FIGURES_DELAY,
        }
    }
}

impl UploadConfig {
    /// Load settings from `SUMMARIZER_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("SUMMARIZER_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(path) = lookup("SUMMARIZER_FIGURES_PATH") {
            config.static_figures_path = path;
        }
        if let Some(schema) = lookup("SUMMARIZER_SCHEMA") {
            config.schema = schema.parse()?;
        }
        if let Some(ms) = lookup("SUMMARIZER_SUMMARY_DELAY_MS") {
            config.summary_delay = parse_millis("SUMMARIZER_SUMMARY_DELAY_MS", &ms)?;
        }
        if let Some(ms) = lookup("SUMMARIZER_FIGURES_DELAY_MS") {
            config.figures_delay = parse_millis("SUMMARIZER_FIGURES_DELAY_MS", &ms)?;
        }

        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_delays(mut self, summary: Duration, figures: Duration) -> Self {
        self.summary_delay = summary;
        self.figures_delay = figures;
        self
    }
}

fn parse_millis(key: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| UploadError::Config(format!("{} must be milliseconds: {}", key, e)))
}
