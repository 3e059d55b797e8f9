use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::settings::InsightSettings;
use crate::providers::traits::{ChatMessage, CompletionRequest, TextGenerator};

/// Prefix on every failure string, so the UI can style it.
pub const ERROR_PREFIX: &str = "Error: ";

/// Turns a prompt into natural-language commentary.
///
/// Never fails: any error from the backend (auth, network, quota,
/// malformed body) comes back as text starting with [`ERROR_PREFIX`], so
/// the numeric part of a report is still shown.
#[derive(Clone)]
pub struct InsightService {
    generator: Arc<dyn TextGenerator>,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
}

impl InsightService {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: &InsightSettings) -> Self {
        Self {
            generator,
            system_prompt: settings.system_prompt.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }

    /// Build the request sent for `prompt`: fixed persona, then the user turn.
    pub fn build_request(&self, prompt: &str) -> CompletionRequest {
        CompletionRequest {
            messages: vec![
                ChatMessage::system(self.system_prompt.clone()),
                ChatMessage::user(prompt),
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// One request, one response; no retry, no streaming.
    #[instrument(skip_all, fields(generator = self.generator.name()))]
    pub async fn request_insight(&self, prompt: &str) -> String {
        let request = self.build_request(prompt);
        match self.generator.generate(&request).await {
            Ok(text) => {
                info!(chars = text.len(), "insight generated");
                text
            }
            Err(e) => {
                warn!(error = %e, "insight request failed");
                format!("{ERROR_PREFIX}insight request failed - {e}")
            }
        }
    }
}

/// True if `text` is a failure string produced by [`InsightService`].
pub fn is_error_text(text: &str) -> bool {
    text.starts_with(ERROR_PREFIX)
}
