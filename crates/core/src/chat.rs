//! Conversation transcript between the user and the advisory engine.

use serde::Serialize;

use crate::advisory::{AdvisoryEngine, GREETING};

/// Reply recorded when the engine fails to answer.
pub const FAILURE_REPLY: &str = "Sorry, I couldn't process your request. Please try again.";

/// Quick prompts offered below the conversation.
pub const SUGGESTIONS: [&str; 3] = [
    "How can I improve my funnel?",
    "What's a good headline?",
    "How many form fields should I use?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTranscript {
    /// A transcript opening with the assistant's greeting.
    pub fn new() -> Self {
        let mut transcript = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        transcript.push(Sender::Ai, GREETING.to_string());
        transcript
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, sender: Sender, text: String) -> ChatMessage {
        let message = ChatMessage {
            id: self.next_id,
            text,
            sender,
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }

    /// Record the user's message. Blank input is ignored and yields `None`.
    pub fn push_user(&mut self, input: &str) -> Option<ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }
        Some(self.push(Sender::User, input.to_string()))
    }

    /// Record the assistant's answer, substituting [`FAILURE_REPLY`] when
    /// the engine failed.
    pub fn push_reply<E: std::fmt::Display>(&mut self, reply: Result<String, E>) -> ChatMessage {
        let text = match reply {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "Advisory reply failed");
                FAILURE_REPLY.to_string()
            }
        };
        self.push(Sender::Ai, text)
    }

    /// Send `input` to `engine` and record both sides of the exchange.
    /// Returns the assistant's message, or `None` for blank input.
    pub async fn send(&mut self, engine: &AdvisoryEngine, input: &str) -> Option<ChatMessage> {
        self.push_user(input)?;
        let reply = engine.respond(input).await;
        Some(self.push_reply(reply))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::advisory::{DEFAULT_TIP, MAX_MESSAGE_CHARS};

    fn engine() -> AdvisoryEngine {
        AdvisoryEngine::new(Duration::ZERO, StdRng::seed_from_u64(3))
    }

    #[test]
    fn starts_with_greeting() {
        let transcript = ChatTranscript::new();
        assert_eq!(transcript.messages().len(), 1);
        assert_eq!(transcript.messages()[0].sender, Sender::Ai);
        assert_eq!(transcript.messages()[0].text, GREETING);
    }

    #[tokio::test]
    async fn send_records_question_and_reply() {
        let mut transcript = ChatTranscript::new();
        let reply = transcript.send(&engine(), "pricing?").await.unwrap();

        assert_eq!(reply.text, DEFAULT_TIP);
        let senders: Vec<_> = transcript.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::Ai, Sender::User, Sender::Ai]);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut transcript = ChatTranscript::new();
        assert!(transcript.send(&engine(), "   ").await.is_none());
        assert_eq!(transcript.messages().len(), 1);
    }

    #[tokio::test]
    async fn engine_failure_records_apology() {
        let mut transcript = ChatTranscript::new();
        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        let reply = transcript.send(&engine(), &long).await.unwrap();
        assert_eq!(reply.text, FAILURE_REPLY);
    }

    #[test]
    fn message_ids_increase() {
        let mut transcript = ChatTranscript::new();
        transcript.push_user("one");
        transcript.push_user("two");
        let ids: Vec<_> = transcript.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
