//! Conversation controller
//!
//! Keeps the transcript and the running context, and decides per message
//! whether to classify, generate or just answer. A small-talk reply that
//! mentions "playlist" arms *request mode*: the next message is taken as
//! the playlist request without classification.

use crate::assistant::{Assistant, Generated};
use serde::{Deserialize, Serialize};
use tunesmith_core::{export, ErrorKind, Playlist};

/// Opening message of every conversation
pub const GREETING: &str =
    "Hi! I can help you create the perfect playlist. What kind of music are you in the mood for?";

/// Reply when the model could not be reached at all
pub const GENERATION_UNAVAILABLE: &str =
    "Sorry, I couldn't generate a playlist at this time. Please try again with a different request.";

/// Who wrote a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

/// One transcript line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Outcome of one user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTurn {
    /// Conversational answer
    Reply(String),

    /// A playlist was generated (possibly the placeholder)
    PlaylistCreated {
        playlist: Playlist,
        announcement: String,
        failure: Option<ErrorKind>,
    },

    /// Generation was attempted but the model was unreachable
    GenerationUnavailable(String),
}

impl ChatTurn {
    /// Text shown to the user for this turn
    pub fn text(&self) -> &str {
        match self {
            ChatTurn::Reply(text) | ChatTurn::GenerationUnavailable(text) => text,
            ChatTurn::PlaylistCreated { announcement, .. } => announcement,
        }
    }
}

/// Stateful chat session
#[derive(Debug, Clone)]
pub struct ChatSession {
    assistant: Assistant,
    transcript: Vec<ChatMessage>,
    context: Vec<String>,
    request_mode: bool,
}

impl ChatSession {
    /// Start a conversation with the greeting
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant,
            transcript: vec![ChatMessage {
                role: Role::Assistant,
                content: GREETING.to_string(),
            }],
            context: Vec::new(),
            request_mode: false,
        }
    }

    /// Handle a user message
    ///
    /// Blank messages are ignored.
    pub async fn send(&mut self, message: &str) -> Option<ChatTurn> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }

        self.record(Role::User, message);
        self.context.push(message.to_string());

        let turn = if self.request_mode {
            self.request_mode = false;
            self.generate(message, "your request").await
        } else {
            let intent = self
                .assistant
                .classify_intent(message, &self.context)
                .await;
            if intent.is_playlist_request {
                self.generate(message, "your request").await
            } else {
                if intent.reply.to_lowercase().contains("playlist") {
                    tracing::debug!("Entering playlist request mode");
                    self.request_mode = true;
                }
                ChatTurn::Reply(intent.reply)
            }
        };

        self.record(Role::Assistant, turn.text());
        Some(turn)
    }

    /// Generate from the whole conversation
    ///
    /// Only available in request mode.
    pub async fn create_from_conversation(&mut self) -> Option<ChatTurn> {
        if !self.request_mode {
            return None;
        }
        let query = self.context.join(" ");
        let turn = self.generate(&query, "our conversation").await;
        if matches!(turn, ChatTurn::PlaylistCreated { .. }) {
            self.request_mode = false;
        }
        self.record(Role::Assistant, turn.text());
        Some(turn)
    }

    /// Short review of a playlist
    pub async fn summarize(&self, playlist: &Playlist) -> String {
        self.assistant.summarize(playlist).await
    }

    async fn generate(&mut self, query: &str, basis: &str) -> ChatTurn {
        match self.assistant.generate_playlist(query, &self.context).await {
            Ok(Generated { playlist, failure }) => ChatTurn::PlaylistCreated {
                announcement: announcement(&playlist, basis),
                playlist,
                failure,
            },
            Err(_) => ChatTurn::GenerationUnavailable(GENERATION_UNAVAILABLE.to_string()),
        }
    }

    fn record(&mut self, role: Role, content: &str) {
        self.transcript.push(ChatMessage {
            role,
            content: content.to_string(),
        });
    }

    /// Whether the next message is taken as a playlist request
    pub fn is_request_mode(&self) -> bool {
        self.request_mode
    }

    /// All messages so far, greeting first
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// User messages so far
    pub fn context(&self) -> &[String] {
        &self.context
    }
}

fn announcement(playlist: &Playlist, basis: &str) -> String {
    format!(
        "Based on {}, I've created \"{}\" with {} songs:\n\n{}",
        basis,
        playlist.name,
        playlist.len(),
        export::song_list(&playlist.songs)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunesmith_core::Song;

    #[test]
    fn announcement_lists_songs() {
        let playlist = Playlist::new("Focus", vec![Song::new("Weightless", "Marconi Union")]);
        assert_eq!(
            announcement(&playlist, "your request"),
            "Based on your request, I've created \"Focus\" with 1 songs:\n\n\
             1. \"Weightless\" by Marconi Union"
        );
    }
}
