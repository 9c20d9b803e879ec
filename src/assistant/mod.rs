//! Chat assistant gateway.
//!
//! Hides the hosted language model behind a single `send_message` call. The
//! caller always gets an [`AssistantReply`]: either the model's answer or a
//! fixed offline reply, tagged with why the assistant degraded.

mod gemini;

pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::limits::{MAX_HISTORY_TURNS, MAX_MESSAGE_LEN};
use crate::observability;

/// Shown whenever the assistant cannot produce a real answer.
pub const OFFLINE_REPLY: &str =
    "The seat assistant is offline right now. Please try again in a little while.";

pub const SYSTEM_INSTRUCTION: &str = "You are the help desk assistant of a library seat \
reservation service. Users can browse seats by floor, reserve one seat at a time for up to \
four hours, cancel a reservation, and review their reservation history. Answer briefly and \
politely, and only about using the library and this service.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub turns: &'a [Turn],
    pub system_instruction: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("upstream reply contained no text")]
    EmptyReply,
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The external generative-text provider.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerateRequest<'_>) -> Result<String, AssistantError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No API key configured.
    MissingCredential,
    /// Empty or oversized message; the provider was not called.
    InvalidMessage,
    /// The provider call failed.
    Upstream,
}

impl FallbackReason {
    fn label(self) -> &'static str {
        match self {
            FallbackReason::MissingCredential => "missing_credential",
            FallbackReason::InvalidMessage => "invalid_message",
            FallbackReason::Upstream => "upstream",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantReply {
    Answer(String),
    Fallback {
        reason: FallbackReason,
        text: &'static str,
    },
}

impl AssistantReply {
    fn fallback(reason: FallbackReason) -> Self {
        AssistantReply::Fallback {
            reason,
            text: OFFLINE_REPLY,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            AssistantReply::Answer(text) => text,
            AssistantReply::Fallback { text, .. } => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, AssistantReply::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            AssistantReply::Answer(_) => None,
            AssistantReply::Fallback { reason, .. } => Some(*reason),
        }
    }
}

pub struct Assistant {
    generator: Option<Arc<dyn TextGenerator>>,
    model: String,
}

impl Assistant {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    /// An assistant with no provider; every message gets the offline reply.
    pub fn offline() -> Self {
        Self::new(None, DEFAULT_MODEL)
    }

    /// Builds the Gemini client when an API key is configured.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, AssistantError> {
        let generator = match config.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => {
                let client =
                    GeminiClient::new(config.base_url.clone(), key.to_string(), config.timeout)?;
                Some(Arc::new(client) as Arc<dyn TextGenerator>)
            }
            None => None,
        };
        Ok(Self::new(generator, config.model.clone()))
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Append `message` to `history` and ask the model. Never fails; see [`AssistantReply`].
    pub async fn send_message(&self, message: &str, history: &[Turn]) -> AssistantReply {
        let reply = self.ask(message, history).await;
        let outcome = reply.fallback_reason().map_or("answer", FallbackReason::label);
        metrics::counter!(observability::ASSISTANT_REPLIES_TOTAL, "outcome" => outcome)
            .increment(1);
        reply
    }

    async fn ask(&self, message: &str, history: &[Turn]) -> AssistantReply {
        let Some(generator) = &self.generator else {
            return AssistantReply::fallback(FallbackReason::MissingCredential);
        };
        let message = message.trim();
        if message.is_empty() || message.len() > MAX_MESSAGE_LEN {
            return AssistantReply::fallback(FallbackReason::InvalidMessage);
        }

        let kept = history.len().saturating_sub(MAX_HISTORY_TURNS);
        let mut turns = history[kept..].to_vec();
        turns.push(Turn::user(message));

        let request = GenerateRequest {
            model: &self.model,
            turns: &turns,
            system_instruction: SYSTEM_INSTRUCTION,
        };
        match generator.generate(request).await {
            Ok(text) => AssistantReply::Answer(text),
            Err(e) => {
                warn!(model = %self.model, "assistant call failed: {e}");
                AssistantReply::fallback(FallbackReason::Upstream)
            }
        }
    }
}
