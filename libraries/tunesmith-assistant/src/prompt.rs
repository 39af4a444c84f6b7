//! Prompt templates.

use tunesmith_core::Playlist;

/// Number of songs requested per playlist
pub const PLAYLIST_SIZE: usize = 15;

/// Classify `message` as playlist request or conversation.
pub fn intent_prompt(message: &str, context: &[String]) -> String {
    format!(
        r#"Analyze this user message in the context of a music playlist creation app:
"{message}"

Previous conversation context:
{context}

Determine if this is:
1. A request for a music playlist (e.g., "Make me a workout playlist", "I need music for studying")
2. A question or conversation about music that doesn't explicitly request a playlist

If it's #1, respond with:
{{"isPlaylistRequest": true, "response": "I'll create a playlist based on your request."}}

If it's #2, respond with:
{{"isPlaylistRequest": false, "response": "YOUR CONVERSATIONAL RESPONSE THAT EVENTUALLY LEADS TOWARD SUGGESTING A PLAYLIST"}}

Return ONLY valid JSON."#,
        message = message,
        context = context.join("\n"),
    )
}

/// Ask for a named playlist of [`PLAYLIST_SIZE`] songs.
pub fn playlist_prompt(query: &str, context: &[String]) -> String {
    format!(
        r#"Create a playlist of {size} songs based on this request and conversation context:
"{query}"

Previous conversation context:
{context}

Return ONLY the songs in a structured JSON format with no additional text.
Format:
{{
  "playlistName": "A catchy name for this playlist based on the request",
  "songs": [
    {{"title": "Song Title 1", "artist": "Artist Name 1"}},
    {{"title": "Song Title 2", "artist": "Artist Name 2"}},
    ...and so on for all {size} songs
  ]
}}"#,
        size = PLAYLIST_SIZE,
        query = query,
        context = context.join("\n"),
    )
}

/// Short review of a playlist with a rating and similar songs.
pub fn summary_prompt(playlist: &Playlist) -> String {
    let songs = playlist
        .songs
        .iter()
        .map(|s| format!("\"{}\" by {}", s.title, s.artist))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Provide a brief summary of this playlist, rate its quality on a scale of 1-10, \
         and suggest 2-3 similar songs.\n\
         Playlist name: {}\n\
         Songs: {}\n\n\
         Keep your response concise (3-4 sentences maximum).",
        playlist.name, songs
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunesmith_core::Song;

    #[test]
    fn playlist_prompt_asks_for_fifteen() {
        let prompt = playlist_prompt("rainy day jazz", &["hi".to_string()]);
        assert!(prompt.contains("playlist of 15 songs"));
        assert!(prompt.contains("\"rainy day jazz\""));
        assert!(prompt.contains("\"playlistName\""));
    }

    #[test]
    fn intent_prompt_includes_context() {
        let context = vec!["first".to_string(), "second".to_string()];
        let prompt = intent_prompt("second", &context);
        assert!(prompt.contains("first\nsecond"));
    }

    #[test]
    fn summary_prompt_lists_songs() {
        let playlist = Playlist::new("Mix", vec![Song::new("A", "B"), Song::new("C", "D")]);
        assert!(summary_prompt(&playlist).contains("\"A\" by B, \"C\" by D"));
    }
}
