use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::price::{Lookback, PriceSeries};

/// Trait abstraction for market data sources (Dependency Inversion).
///
/// The services only see this trait, so the live Yahoo implementation can
/// be swapped for another feed, or for a mock in tests, without touching
/// anything else.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Daily OHLCV history for `ticker` over `lookback`.
    ///
    /// An empty series is a valid return; `MarketDataSource` decides what
    /// that means.
    async fn get_history(&self, ticker: &str, lookback: Lookback)
        -> Result<PriceSeries, CoreError>;
}

/// Role of one message in a chat-style completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// One non-streaming completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Trait abstraction for text-generation backends.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// Send one request and return the generated text.
    async fn generate(&self, request: &CompletionRequest) -> Result<String, CoreError>;
}
