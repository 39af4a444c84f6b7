//! Parsing of model output.
//!
//! Models wrap JSON in prose or code fences; the object is taken from the
//! first `{` to the last `}`.

use crate::error::{AssistantError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tunesmith_core::Song;

/// Intent classification answer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResponse {
    pub is_playlist_request: bool,
    #[serde(default)]
    pub response: String,
}

/// Playlist generation answer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResponse {
    #[serde(default, alias = "name")]
    pub playlist_name: Option<String>,
    #[serde(default)]
    pub songs: Option<Vec<Song>>,
}

/// Slice of `text` from the first `{` to the last `}`.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Extract and deserialize the JSON object embedded in `text`.
pub fn parse_embedded<T: DeserializeOwned>(text: &str) -> Result<T> {
    let json = extract_json(text)
        .ok_or_else(|| AssistantError::MalformedOutput("no JSON object found".into()))?;
    serde_json::from_str(json).map_err(|e| AssistantError::MalformedOutput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fenced_json() {
        let text = "Sure!\n```json\n{\"isPlaylistRequest\": true, \"response\": \"ok\"}\n```";
        let intent: IntentResponse = parse_embedded(text).unwrap();
        assert!(intent.is_playlist_request);
        assert_eq!(intent.response, "ok");
    }

    #[test]
    fn no_braces_is_malformed() {
        let result: Result<IntentResponse> = parse_embedded("I cannot do that.");
        assert!(matches!(result, Err(AssistantError::MalformedOutput(_))));
    }

    #[test]
    fn reversed_braces_is_none() {
        assert!(extract_json("} nope {").is_none());
    }

    #[test]
    fn playlist_fields_optional() {
        let parsed: PlaylistResponse = parse_embedded("{}").unwrap();
        assert!(parsed.playlist_name.is_none());
        assert!(parsed.songs.is_none());
    }
}
