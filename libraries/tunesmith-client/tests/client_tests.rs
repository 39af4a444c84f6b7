//! Tests for the media service client.
//!
//! These tests use mock servers to verify client behavior without
//! requiring a running media service.

use tunesmith_client::{ClientError, MediaServiceClient, ServiceConfig};
use tunesmith_core::{CoreError, MediaService, DEFAULT_THUMBNAIL};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> MediaServiceClient {
    MediaServiceClient::new(ServiceConfig::new(server.uri())).unwrap()
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_valid_http_url() {
        assert!(MediaServiceClient::new(ServiceConfig::new("http://localhost:4000")).is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        match MediaServiceClient::new(ServiceConfig::new("")) {
            Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected InvalidUrl error, got {:?}", other),
        }
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        let result = MediaServiceClient::new(ServiceConfig::new("localhost:4000"));
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_url_normalization_trailing_slash() {
        let client = MediaServiceClient::new(ServiceConfig::new("http://localhost:4000/")).unwrap();
        assert_eq!(client.url(), "http://localhost:4000");
        assert_eq!(
            client.media_url("a.mp3"),
            "http://localhost:4000/media/a.mp3"
        );
    }
}

// =============================================================================
// Search Tests
// =============================================================================

mod search {
    use super::*;

    #[tokio::test]
    async fn test_search_results_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(serde_json::json!({"query": "lofi"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    ["Lofi Girl Radio", "https://www.youtube.com/watch?v=jfKfPfyJRdk", "https://i.ytimg.com/a.jpg"]
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let hits = client_for(&server).await.search("lofi").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Lofi Girl Radio");
        assert_eq!(hits[0].thumbnail, "https://i.ytimg.com/a.jpg");
    }

    #[tokio::test]
    async fn test_search_legacy_output_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(serde_json::json!({"query_user": "jazz"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": [["Take Five", "https://youtu.be/vmDDOFXSgAs", ""]]
            })))
            .mount(&server)
            .await;

        let hits = client_for(&server).await.search("jazz").await.unwrap();
        assert_eq!(hits[0].thumbnail, DEFAULT_THUMBNAIL);
    }

    #[tokio::test]
    async fn test_search_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": []
            })))
            .mount(&server)
            .await;

        let hits = client_for(&server).await.search("lofi").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_server_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "message": "Failed to process request",
                "error": "quota exceeded"
            })))
            .mount(&server)
            .await;

        match client_for(&server).await.search("lofi").await {
            Err(ClientError::Service { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Failed to process request: quota exceeded");
            }
            other => panic!("Expected Service error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client_for(&server).await.search("lofi").await;
        assert!(matches!(result, Err(ClientError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
            .mount(&server)
            .await;

        let result = client_for(&server).await.search("lofi").await;
        assert!(matches!(
            result,
            Err(ClientError::RateLimited {
                retry_after_secs: 12
            })
        ));
    }
}

// =============================================================================
// Resolve Tests
// =============================================================================

mod resolve {
    use super::*;

    #[tokio::test]
    async fn test_resolve_local_file_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resolve"))
            .and(body_partial_json(
                serde_json::json!({"sourceUrl": "https://youtu.be/abc"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "localFile": "song_1700000000.mp3"
            })))
            .mount(&server)
            .await;

        let media = client_for(&server)
            .await
            .resolve("https://youtu.be/abc")
            .await
            .unwrap();
        assert_eq!(media.local_file, "song_1700000000.mp3");
    }

    #[tokio::test]
    async fn test_resolve_legacy_file_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resolve"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Download successful",
                "file": "song_1.mp3",
                "size": 4096,
                "title": "Take Five"
            })))
            .mount(&server)
            .await;

        let media = client_for(&server)
            .await
            .resolve("https://www.youtube.com/watch?v=vmDDOFXSgAs")
            .await
            .unwrap();
        assert_eq!(media.local_file, "song_1.mp3");
        assert_eq!(media.title.as_deref(), Some("Take Five"));
        assert_eq!(media.size, Some(4096));
    }

    #[tokio::test]
    async fn test_invalid_source_url_never_hits_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resolve"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .await
            .resolve("https://vimeo.com/123")
            .await;
        assert!(matches!(result, Err(ClientError::InvalidSourceUrl(_))));
    }

    #[tokio::test]
    async fn test_resolve_failure_maps_to_core_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resolve"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "message": "Audio conversion failed."
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = MediaService::resolve(&client, "https://youtu.be/abc").await;
        match result {
            Err(CoreError::Service(msg)) => assert!(msg.contains("Audio conversion failed.")),
            other => panic!("Expected Service error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Nothing listens on port 9 (discard) in the test environment
        let client = MediaServiceClient::new(ServiceConfig::new("http://127.0.0.1:9")).unwrap();
        let result = client.resolve("https://youtu.be/abc").await;
        assert!(matches!(
            result,
            Err(ClientError::ServiceUnreachable(_)) | Err(ClientError::Request(_))
        ));
    }
}

// =============================================================================
// Download Tests
// =============================================================================

mod download {
    use super::*;

    #[tokio::test]
    async fn test_download_media_to_disk() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/media/song_1.mp3"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 2048]))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("cache").join("song_1.mp3");
        let mut last_progress = 0.0;

        let size = client_for(&server)
            .await
            .download_media("song_1.mp3", &dest, |p| last_progress = p.progress)
            .await
            .unwrap();

        assert_eq!(size, 2048);
        assert_eq!(std::fs::read(&dest).unwrap().len(), 2048);
        assert!((last_progress - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_download_missing_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/media/missing.mp3"))
            .respond_with(ResponseTemplate::new(404).set_body_string("File not found"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let result = client_for(&server)
            .await
            .download_media("missing.mp3", &dir.path().join("missing.mp3"), |_| {})
            .await;

        match result {
            Err(ClientError::Service { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "File not found");
            }
            other => panic!("Expected Service error, got {:?}", other),
        }
    }
}
