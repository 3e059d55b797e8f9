use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use super::price::Lookback;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a financial analyst providing detailed stock insights.";

/// Runtime configuration for the whole library.
///
/// Built with `Default` for tests, or from the environment with
/// [`Settings::from_env`] in a real host. Nothing secret has a default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub insight: InsightSettings,
    pub refresh: RefreshSettings,

    /// History window used by every interactive action.
    pub lookback: Lookback,
}

/// Text-generation endpoint settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct InsightSettings {
    /// Bearer key for the chat-completions endpoint. `None` means insight
    /// requests fail softly with an error string.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

// Hand-written so the key never shows up in logs.
impl std::fmt::Debug for InsightSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: 200,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

impl InsightSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Background price refresh settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSettings {
    pub interval_secs: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

impl RefreshSettings {
    /// Refresh period; clamped to at least one second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_str(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env_opt(name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Settings {
    /// Read settings from `STOCK_INSIGHT_*` environment variables.
    ///
    /// Missing or unparseable values fall back to the defaults; the API key
    /// also accepts `DEEPSEEK_API_KEY`.
    pub fn from_env() -> Self {
        let defaults = InsightSettings::default();
        let insight = InsightSettings {
            api_key: env_opt("STOCK_INSIGHT_API_KEY").or_else(|| env_opt("DEEPSEEK_API_KEY")),
            base_url: env_str("STOCK_INSIGHT_BASE_URL", &defaults.base_url),
            model: env_str("STOCK_INSIGHT_MODEL", &defaults.model),
            system_prompt: defaults.system_prompt,
            max_tokens: env_parse("STOCK_INSIGHT_MAX_TOKENS", defaults.max_tokens),
            temperature: env_parse("STOCK_INSIGHT_TEMPERATURE", defaults.temperature),
            timeout_secs: env_parse("STOCK_INSIGHT_TIMEOUT_SECS", defaults.timeout_secs),
        };
        let refresh = RefreshSettings {
            interval_secs: env_parse(
                "STOCK_INSIGHT_REFRESH_SECS",
                RefreshSettings::default().interval_secs,
            ),
        };

        Self {
            insight,
            refresh,
            lookback: Lookback::default(),
        }
    }
}
