use thiserror::Error;

/// Unified error type for the entire stock-insight-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Market data ─────────────────────────────────────────────────
    /// The provider returned no rows or failed for any reason.
    /// Cause is deliberately not distinguished: bad symbol and
    /// unreachable network look the same to callers.
    #[error("Could not fetch data for {ticker}")]
    DataNotFound { ticker: String },

    // ── Indicators ──────────────────────────────────────────────────
    #[error("Insufficient data: need {required} data points, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Insight service error: {0}")]
    InsightService(String),

    // ── Configuration / Input ───────────────────────────────────────
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors often carry the full request URL; strip the query
        // string so keys passed as parameters never end up in messages.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
