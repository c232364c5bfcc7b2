//! Chat reply providers.

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Replies used by [`CannedResponder`].
pub const CANNED_REPLIES: [&str; 5] = [
    "Thank you for sharing that. Could you tell me how long you have been experiencing these symptoms?",
    "That's a good question. Based on what you've described, I'd recommend keeping a daily log of your symptoms.",
    "I understand your concern. Many people experience something similar, and there are several options we can explore.",
    "It's important to stay hydrated and get enough rest. Have you noticed anything that makes it better or worse?",
    "I'd suggest discussing this with your primary care physician as well, so they can examine you in person.",
];

/// A simulated doctor the user is chatting with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

impl Persona {
    /// Reject personas missing an id or a name.
    pub fn validate(&self) -> Result<(), ChatError> {
        if self.id.trim().is_empty() {
            return Err(ChatError::InvalidPersona("id must not be empty".into()));
        }
        if self.name.trim().is_empty() {
            return Err(ChatError::InvalidPersona("name must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message must not be empty")]
    EmptyMessage,

    #[error("invalid persona: {0}")]
    InvalidPersona(String),

    #[error("invalid chat request: {0}")]
    InvalidRequest(String),

    #[error("response provider failed: {0}")]
    Provider(String),
}

/// Produces the persona's next reply.
///
/// Implementations see the whole conversation, latest user message last.
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    async fn respond(&self, persona: &Persona, history: &[ChatMessage]) -> Result<String, ChatError>;
}

/// Stand-in provider: one of [`CANNED_REPLIES`] after a random delay.
#[derive(Debug, Clone)]
pub struct CannedResponder {
    min_delay: Duration,
    max_delay: Duration,
}

impl CannedResponder {
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            min_delay,
            max_delay: max_delay.max(min_delay),
        }
    }
}

#[async_trait]
impl ResponseProvider for CannedResponder {
    async fn respond(&self, persona: &Persona, _history: &[ChatMessage]) -> Result<String, ChatError> {
        let (delay, reply) = {
            let mut rng = rand::thread_rng();
            let delay_ms = rng.gen_range(self.min_delay.as_millis()..=self.max_delay.as_millis());
            let reply = CANNED_REPLIES
                .choose(&mut rng)
                .copied()
                .unwrap_or(CANNED_REPLIES[0]);
            (Duration::from_millis(delay_ms as u64), reply)
        };

        tracing::debug!(persona = %persona.id, delay_ms = delay.as_millis() as u64, "Simulating reply");
        tokio::time::sleep(delay).await;
        Ok(reply.to_string())
    }
}
