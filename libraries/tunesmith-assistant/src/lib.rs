//! Tunesmith Assistant
//!
//! Conversational playlist generation over a text language model.
//!
//! # Features
//!
//! - **Intent**: decide whether a chat message asks for a playlist
//! - **Generation**: a named 15-song playlist, or a placeholder on failure
//! - **Summary**: a short review of an existing playlist
//! - **Chat**: transcript, context and request mode in [`ChatSession`]
//!
//! The default backend is [`GeminiClient`]; anything implementing
//! [`LanguageModel`] can stand in for it.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tunesmith_assistant::{Assistant, ChatSession, GeminiClient, GeminiConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let model = GeminiClient::new(GeminiConfig {
//!         api_key: std::env::var("GEMINI_API_KEY").ok(),
//!         ..GeminiConfig::default()
//!     })?;
//!     let mut chat = ChatSession::new(Assistant::new(Arc::new(model)));
//!
//!     if let Some(turn) = chat.send("music for a rainy afternoon").await {
//!         println!("{}", turn.text());
//!     }
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod chat;
pub mod error;
pub mod model;
pub mod parse;
pub mod prompt;

pub use assistant::{Assistant, Generated, Intent, INTENT_FALLBACK_REPLY, SUMMARY_FALLBACK};
pub use chat::{ChatMessage, ChatSession, ChatTurn, Role, GENERATION_UNAVAILABLE, GREETING};
pub use error::{AssistantError, Result};
pub use model::{GeminiClient, GeminiConfig, LanguageModel};
