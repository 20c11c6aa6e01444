//! Conversational session against the generative API
//!
//! One session per app lifetime, created lazily by the assistant panel.
//! Prior turns are replayed on every round trip; the session holds the
//! only copy of the conversation.

use crate::generate::{Content, GenerateContentRequest, GenerationClient, Part};
use crate::Result;

/// System instruction seeded into every round trip
const SYSTEM_INSTRUCTION: &str = "You are a helpful and friendly AI assistant \
    for the Lumen Assist app. Keep your answers concise and helpful.";

/// Greeting pre-populated into the local log without a round trip
const GREETING: &str = "Hi! I'm your Lumen assistant. How can I help you today?";

/// Uniform reply appended when a round trip fails
const ERROR_REPLY: &str = "Sorry, I'm having trouble connecting right now.";

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Role string on the wire
    const fn wire_name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "model",
        }
    }
}

/// One entry in the local conversation log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// Multi-turn chat session with a local ordered log
#[derive(Debug)]
pub struct ChatSession {
    client: GenerationClient,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Create a session seeded with the assistant greeting
    #[must_use]
    pub fn new(client: GenerationClient) -> Self {
        tracing::debug!("chat session created");
        Self {
            client,
            messages: vec![ChatMessage {
                role: ChatRole::Assistant,
                text: GREETING.to_string(),
            }],
        }
    }

    /// Ordered conversation log, greeting first
    #[must_use]
    pub fn history(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send one message and append the reply to the log
    ///
    /// The user message is appended before the round trip; on failure a
    /// uniform error reply is appended instead of the assistant's answer.
    /// The returned string is whatever was appended.
    pub async fn send_message(&mut self, text: &str) -> String {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: text.to_string(),
        });

        let reply = match self.round_trip().await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "chat round trip failed");
                ERROR_REPLY.to_string()
            }
        };

        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            text: reply.clone(),
        });
        reply
    }

    async fn round_trip(&self) -> Result<String> {
        let contents = self
            .messages
            .iter()
            .map(|m| Content {
                role: Some(m.role.wire_name().to_string()),
                parts: vec![Part::text(&m.text)],
            })
            .collect();

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text(SYSTEM_INSTRUCTION)],
            }),
            generation_config: None,
        };

        let model = self.client.config().text_model.clone();
        self.client
            .post_generate(&model, &request)
            .await?
            .into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn session() -> ChatSession {
        let client = GenerationClient::new(Config::with_api_key("test-key".to_string())).unwrap();
        ChatSession::new(client)
    }

    #[test]
    fn new_session_starts_with_greeting_only() {
        let session = session();
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].role, ChatRole::Assistant);
        assert!(session.history()[0].text.contains("How can I help"));
    }

    #[test]
    fn roles_map_to_wire_names() {
        assert_eq!(ChatRole::User.wire_name(), "user");
        assert_eq!(ChatRole::Assistant.wire_name(), "model");
    }
}
