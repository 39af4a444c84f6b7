//! Tests for playlist generation and the chat flow.
//!
//! The Gemini client is exercised against a mock server; the chat flow runs
//! on a scripted model.

use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tunesmith_assistant::{
    Assistant, AssistantError, ChatSession, ChatTurn, GeminiClient, GeminiConfig, LanguageModel,
    Role, GENERATION_UNAVAILABLE, GREETING, SUMMARY_FALLBACK,
};
use tunesmith_core::{ErrorKind, Playlist, Song};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn gemini_for(server: &MockServer, api_key: Option<&str>) -> Assistant {
    let model = GeminiClient::new(GeminiConfig {
        api_key: api_key.map(str::to_string),
        base_url: server.uri(),
        ..GeminiConfig::default()
    })
    .unwrap();
    Assistant::new(Arc::new(model))
}

fn candidate(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
}

async fn mount_reply(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(text)))
        .mount(server)
        .await;
}

/// Model answering from a fixed script, then failing with a 503.
struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> tunesmith_assistant::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(AssistantError::Service {
                status: 503,
                message: "overloaded".into(),
            })
    }
}

const PLAYLIST_JSON: &str = r#"{"playlistName": "Rainy Jazz", "songs": [
    {"title": "Blue in Green", "artist": "Miles Davis"},
    {"title": "Naima", "artist": "John Coltrane"}
]}"#;

// =============================================================================
// Gemini Backend Tests
// =============================================================================

mod gemini {
    use super::*;

    #[tokio::test]
    async fn test_generate_valid_playlist() {
        let server = MockServer::start().await;
        mount_reply(&server, PLAYLIST_JSON).await;

        let generated = gemini_for(&server, Some("test-key"))
            .generate_playlist("rainy day jazz", &[])
            .await
            .unwrap();

        assert!(generated.failure.is_none());
        assert_eq!(generated.playlist.name, "Rainy Jazz");
        assert_eq!(
            generated.playlist.songs,
            vec![
                Song::new("Blue in Green", "Miles Davis"),
                Song::new("Naima", "John Coltrane"),
            ]
        );
    }

    #[tokio::test]
    async fn test_generate_fenced_json() {
        let server = MockServer::start().await;
        let fenced = format!("Here you go!\n```json\n{}\n```", PLAYLIST_JSON);
        mount_reply(&server, &fenced).await;

        let generated = gemini_for(&server, Some("test-key"))
            .generate_playlist("jazz", &[])
            .await
            .unwrap();

        assert_eq!(generated.playlist.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_name_uses_query() {
        let server = MockServer::start().await;
        mount_reply(&server, r#"{"songs": [{"title": "So What", "artist": "Miles Davis"}]}"#).await;

        let generated = gemini_for(&server, Some("test-key"))
            .generate_playlist("jazz", &[])
            .await
            .unwrap();

        assert_eq!(generated.playlist.name, "Playlist for \"jazz\"");
    }

    #[tokio::test]
    async fn test_prose_reply_gives_placeholder() {
        let server = MockServer::start().await;
        mount_reply(&server, "I'm sorry, I can't help with that.").await;

        let generated = gemini_for(&server, Some("test-key"))
            .generate_playlist("lofi beats", &[])
            .await
            .unwrap();

        assert_eq!(generated.failure, Some(ErrorKind::PlaylistGenerationFailure));
        assert_eq!(generated.playlist.songs, vec![Song::placeholder()]);
        assert_eq!(generated.playlist.name, "Playlist for \"lofi beats\"");
    }

    #[tokio::test]
    async fn test_missing_key_never_calls_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate(PLAYLIST_JSON)))
            .expect(0)
            .mount(&server)
            .await;

        let generated = gemini_for(&server, None)
            .generate_playlist("jazz", &[])
            .await
            .unwrap();

        assert_eq!(generated.failure, Some(ErrorKind::PlaylistGenerationFailure));
        assert_eq!(generated.playlist.songs, vec![Song::placeholder()]);
    }

    #[tokio::test]
    async fn test_server_error_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = gemini_for(&server, Some("test-key"))
            .generate_playlist("jazz", &[])
            .await;

        match result {
            Err(AssistantError::Service { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("Expected Service error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_candidates_falls_back_for_intent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let intent = gemini_for(&server, Some("test-key"))
            .classify_intent("hello", &[])
            .await;

        assert!(intent.is_playlist_request);
        assert_eq!(intent.failure, Some(ErrorKind::IntentClassificationFailure));
    }

    #[tokio::test]
    async fn test_summary_trimmed() {
        let server = MockServer::start().await;
        mount_reply(&server, "  A mellow mix. 8/10.  \n").await;

        let playlist = Playlist::new("Mix", vec![Song::new("A", "B")]);
        let summary = gemini_for(&server, Some("test-key"))
            .summarize(&playlist)
            .await;

        assert_eq!(summary, "A mellow mix. 8/10.");
    }

    #[tokio::test]
    async fn test_summary_fallback() {
        let server = MockServer::start().await;
        let playlist = Playlist::new("Mix", vec![Song::new("A", "B")]);

        let summary = gemini_for(&server, None).summarize(&playlist).await;

        assert_eq!(summary, SUMMARY_FALLBACK);
    }
}

// =============================================================================
// Chat Flow Tests
// =============================================================================

mod chat_flow {
    use super::*;

    #[tokio::test]
    async fn test_starts_with_greeting() {
        let chat = ChatSession::new(Assistant::new(ScriptedModel::new(&[])));

        assert_eq!(chat.transcript().len(), 1);
        assert_eq!(chat.transcript()[0].role, Role::Assistant);
        assert_eq!(chat.transcript()[0].content, GREETING);
    }

    #[tokio::test]
    async fn test_blank_message_ignored() {
        let model = ScriptedModel::new(&[]);
        let mut chat = ChatSession::new(Assistant::new(model.clone()));

        assert!(chat.send("   ").await.is_none());
        assert!(model.prompts().is_empty());
        assert!(chat.context().is_empty());
    }

    #[tokio::test]
    async fn test_playlist_request_generates() {
        let model = ScriptedModel::new(&[
            r#"{"isPlaylistRequest": true, "response": "On it."}"#,
            PLAYLIST_JSON,
        ]);
        let mut chat = ChatSession::new(Assistant::new(model.clone()));

        let turn = chat.send("make me a jazz playlist").await.unwrap();

        match turn {
            ChatTurn::PlaylistCreated {
                playlist,
                announcement,
                failure,
            } => {
                assert_eq!(playlist.name, "Rainy Jazz");
                assert!(failure.is_none());
                assert!(announcement.starts_with(
                    "Based on your request, I've created \"Rainy Jazz\" with 2 songs:"
                ));
                assert!(announcement.contains("1. \"Blue in Green\" by Miles Davis"));
            }
            other => panic!("Expected PlaylistCreated, got {:?}", other),
        }
        assert_eq!(model.prompts().len(), 2);
        assert_eq!(chat.transcript().len(), 3);
    }

    #[tokio::test]
    async fn test_reply_mentioning_playlist_arms_request_mode() {
        let model = ScriptedModel::new(&[
            r#"{"isPlaylistRequest": false, "response": "Jazz is great! Want a Playlist of it?"}"#,
            PLAYLIST_JSON,
        ]);
        let mut chat = ChatSession::new(Assistant::new(model.clone()));

        let turn = chat.send("do you like jazz?").await.unwrap();
        assert!(matches!(turn, ChatTurn::Reply(_)));
        assert!(chat.is_request_mode());

        // Taken as the request without classification
        let turn = chat.send("yes, something mellow").await.unwrap();
        assert!(matches!(turn, ChatTurn::PlaylistCreated { .. }));
        assert!(!chat.is_request_mode());

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].starts_with("Create a playlist of 15 songs"));
        assert!(prompts[1].contains("do you like jazz?\nyes, something mellow"));
    }

    #[tokio::test]
    async fn test_plain_reply_stays_conversational() {
        let model = ScriptedModel::new(&[
            r#"{"isPlaylistRequest": false, "response": "Coltrane is a legend."}"#,
        ]);
        let mut chat = ChatSession::new(Assistant::new(model));

        let turn = chat.send("who is coltrane?").await.unwrap();

        assert_eq!(turn, ChatTurn::Reply("Coltrane is a legend.".into()));
        assert!(!chat.is_request_mode());
        assert!(chat.create_from_conversation().await.is_none());
    }

    #[tokio::test]
    async fn test_create_from_conversation() {
        let model = ScriptedModel::new(&[
            r#"{"isPlaylistRequest": false, "response": "Shall I build a playlist?"}"#,
            PLAYLIST_JSON,
        ]);
        let mut chat = ChatSession::new(Assistant::new(model.clone()));
        chat.send("I like late night jazz").await.unwrap();

        let turn = chat.create_from_conversation().await.unwrap();

        assert!(turn
            .text()
            .starts_with("Based on our conversation, I've created \"Rainy Jazz\""));
        assert!(!chat.is_request_mode());
        assert!(model.prompts()[1].contains("\"I like late night jazz\""));
    }

    #[tokio::test]
    async fn test_unreachable_model_apologizes() {
        let model = ScriptedModel::new(&[r#"{"isPlaylistRequest": true, "response": "Sure"}"#]);
        let mut chat = ChatSession::new(Assistant::new(model));

        let turn = chat.send("workout mix").await.unwrap();

        assert_eq!(
            turn,
            ChatTurn::GenerationUnavailable(GENERATION_UNAVAILABLE.into())
        );
        let last = chat.transcript().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, GENERATION_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_failed_classification_generates() {
        let model = ScriptedModel::new(&["not json at all", PLAYLIST_JSON]);
        let mut chat = ChatSession::new(Assistant::new(model));

        let turn = chat.send("something upbeat").await.unwrap();

        assert!(matches!(turn, ChatTurn::PlaylistCreated { .. }));
    }
}
