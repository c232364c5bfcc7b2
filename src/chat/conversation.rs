//! Conversation state container.

use crate::chat::provider::{ChatError, ChatMessage, Persona, ResponseProvider};

/// Oldest messages are dropped beyond this many.
pub const MAX_HISTORY: usize = 50;

/// Ordered messages exchanged with a single persona.
#[derive(Debug, Clone)]
pub struct Conversation {
    persona: Persona,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(persona: Persona) -> Self {
        Self {
            persona,
            messages: Vec::new(),
        }
    }

    /// Resume from messages the client already holds.
    pub fn with_history(persona: Persona, mut history: Vec<ChatMessage>) -> Self {
        if history.len() > MAX_HISTORY {
            history.drain(..history.len() - MAX_HISTORY);
        }
        Self {
            persona,
            messages: history,
        }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }

    /// Append the user's message, wait for the reply and append it.
    ///
    /// On provider failure the user message stays so the client can retry.
    pub async fn send(&mut self, provider: &dyn ResponseProvider, text: &str) -> Result<String, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.push(ChatMessage::user(text));
        let reply = provider.respond(&self.persona, &self.messages).await?;
        self.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    fn push(&mut self, message: ChatMessage) {
        if self.messages.len() == MAX_HISTORY {
            self.messages.remove(0);
        }
        self.messages.push(message);
    }
}
