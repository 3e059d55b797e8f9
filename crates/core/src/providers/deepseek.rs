use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::CoreError;
use crate::models::settings::InsightSettings;
use super::traits::{ChatMessage, CompletionRequest, TextGenerator};

const PROVIDER: &str = "DeepSeek";

/// DeepSeek text-generation provider.
///
/// - **Requires**: API key (settings `api_key`, env `STOCK_INSIGHT_API_KEY`).
/// - **Protocol**: OpenAI-compatible `POST {base_url}/chat/completions`,
///   so any compatible endpoint works by changing `base_url` and `model`.
/// - **Mode**: non-streaming, one request per call, no retry.
pub struct DeepSeekClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl DeepSeekClient {
    pub fn new(settings: &InsightSettings) -> Self {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

// ── Chat-completions wire types ─────────────────────────────────────

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Pull the generated text out of a raw response body.
pub(crate) fn parse_completion(body: &str) -> Result<String, CoreError> {
    let resp: ChatCompletionResponse = serde_json::from_str(body)?;
    let content = resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| CoreError::InsightService("Response contained no choices".into()))?;
    Ok(content.trim().to_string())
}

#[async_trait]
impl TextGenerator for DeepSeekClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn generate(&self, request: &CompletionRequest) -> Result<String, CoreError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            CoreError::Configuration("No API key configured for the insight service".into())
        })?;

        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            stream: false,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        debug!(%status, bytes = text.len(), "completion response");

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message,
            });
        }

        parse_completion(&text)
    }
}
