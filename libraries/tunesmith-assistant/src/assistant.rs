//! Intent classification, playlist generation and summaries.
//!
//! Every operation degrades to a deterministic answer when the model
//! misbehaves, so the conversation always moves forward.

use crate::error::Result;
use crate::model::LanguageModel;
use crate::parse::{parse_embedded, IntentResponse, PlaylistResponse};
use crate::prompt;
use std::sync::Arc;
use tracing::{info, warn};
use tunesmith_core::{ErrorKind, Playlist};

/// Reply used when classification fails
pub const INTENT_FALLBACK_REPLY: &str = "I'll create a playlist for you.";

/// Summary used when the model cannot produce one
pub const SUMMARY_FALLBACK: &str = "Unable to generate AI summary at this time.";

/// Classification of a chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    /// Whether to generate a playlist now
    pub is_playlist_request: bool,
    /// Conversational reply
    pub reply: String,
    /// Set when the fallback was used
    pub failure: Option<ErrorKind>,
}

impl Intent {
    fn fallback() -> Self {
        Self {
            is_playlist_request: true,
            reply: INTENT_FALLBACK_REPLY.to_string(),
            failure: Some(ErrorKind::IntentClassificationFailure),
        }
    }
}

/// A generated playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// The playlist (a placeholder on failure)
    pub playlist: Playlist,
    /// Set when the placeholder was used
    pub failure: Option<ErrorKind>,
}

/// Playlist assistant over a [`LanguageModel`]
#[derive(Clone)]
pub struct Assistant {
    model: Arc<dyn LanguageModel>,
}

impl Assistant {
    /// Create an assistant
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Decide whether `message` asks for a playlist
    ///
    /// Any failure counts as a playlist request.
    pub async fn classify_intent(&self, message: &str, context: &[String]) -> Intent {
        let prompt = prompt::intent_prompt(message, context);
        let parsed = match self.model.generate(&prompt).await {
            Ok(text) => parse_embedded::<IntentResponse>(&text),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(intent) => {
                info!(
                    is_playlist_request = intent.is_playlist_request,
                    "Intent classified"
                );
                Intent {
                    is_playlist_request: intent.is_playlist_request,
                    reply: intent.response,
                    failure: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "Intent classification failed, treating as playlist request");
                Intent::fallback()
            }
        }
    }

    /// Generate a playlist for `query`
    ///
    /// Malformed output or a missing credential yields the single-song
    /// placeholder playlist. Transport failures are returned as errors: no
    /// playlist is created for them.
    pub async fn generate_playlist(&self, query: &str, context: &[String]) -> Result<Generated> {
        let prompt = prompt::playlist_prompt(query, context);
        let parsed = match self.model.generate(&prompt).await {
            Ok(text) => parse_embedded::<PlaylistResponse>(&text),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(response) => {
                let name = response
                    .playlist_name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| Playlist::fallback_name(query));
                let playlist = Playlist::new(name, response.songs.unwrap_or_default());
                info!(
                    playlist_id = %playlist.id,
                    name = %playlist.name,
                    songs = playlist.len(),
                    "Playlist generated"
                );
                Ok(Generated {
                    playlist,
                    failure: None,
                })
            }
            Err(e) if e.is_transport() => {
                warn!(error = %e, "Playlist generation unavailable");
                Err(e)
            }
            Err(e) => {
                warn!(error = %e, "Playlist generation failed, using placeholder");
                Ok(Generated {
                    playlist: Playlist::placeholder(query),
                    failure: Some(e.kind()),
                })
            }
        }
    }

    /// Short review of `playlist`
    pub async fn summarize(&self, playlist: &Playlist) -> String {
        match self.model.generate(&prompt::summary_prompt(playlist)).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!(error = %e, playlist_id = %playlist.id, "Summary failed");
                SUMMARY_FALLBACK.to_string()
            }
        }
    }
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant").finish_non_exhaustive()
    }
}

