use openai_assistants::types::audio::{SpeechRequest, TranscriptionModel, Voice};
use openai_assistants::types::{
    CreateMessageRequest, CreateRunRequest, ListMessagesQuery, RunStatus,
};
use openai_assistants::{ApiError, AssistantsApi, Client, Config};
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    let config = Config::builder()
        .with_base_url(&format!("{}/v1", server.uri()))
        .with_api_key("sk-test")
        .build();
    Client::new(config).unwrap()
}

#[tokio::test]
async fn create_thread_sends_auth_and_beta_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/threads"))
        .and(header("authorization", "Bearer sk-test"))
        .and(header("openai-beta", "assistants=v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "thread_abc",
            "object": "thread",
            "created_at": 1699012949,
            "metadata": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let thread = client_for(&server).create_thread().await.unwrap();

    assert_eq!(thread.id(), "thread_abc");
    assert_eq!(thread.created_at(), 1699012949);
}

#[tokio::test]
async fn create_message_and_run_post_expected_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_abc/messages"))
        .and(body_json(json!({ "role": "user", "content": "Hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "thread_id": "thread_abc",
            "role": "user",
            "content": [ { "type": "text", "text": { "value": "Hello", "annotations": [] } } ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_abc/runs"))
        .and(body_json(json!({ "assistant_id": "asst_1", "instructions": "Be brief." })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "run_1",
            "thread_id": "thread_abc",
            "assistant_id": "asst_1",
            "status": "queued"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let message = client
        .create_message("thread_abc", CreateMessageRequest::user("Hello"))
        .await
        .unwrap();
    let run = client
        .create_run(
            "thread_abc",
            CreateRunRequest::new("asst_1").with_instructions("Be brief."),
        )
        .await
        .unwrap();

    assert_eq!(message.content()[0].as_text(), Some("Hello"));
    assert_eq!(run.status(), RunStatus::Queued);
}

#[tokio::test]
async fn list_messages_requests_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/threads/thread_abc/messages"))
        .and(query_param("order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{
                "id": "msg_2",
                "thread_id": "thread_abc",
                "role": "assistant",
                "content": [
                    { "type": "text", "text": { "value": "Hi there", "annotations": [] } }
                ]
            }],
            "first_id": "msg_2",
            "last_id": "msg_2",
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let list = client_for(&server)
        .list_messages("thread_abc", ListMessagesQuery::new())
        .await
        .unwrap();

    assert_eq!(list.first_text(), Some("Hi there"));
}

#[tokio::test]
async fn error_envelope_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/threads/thread_abc/runs/run_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "message": "No run found with id 'run_missing'.",
                "type": "invalid_request_error",
                "param": null,
                "code": null
            }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .retrieve_run("thread_abc", "run_missing")
        .await
        .unwrap_err();

    match err {
        ApiError::Api { status, ref message, .. } => {
            assert_eq!(status, 404);
            assert_eq!(message, "No run found with id 'run_missing'.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn non_json_error_body_is_kept_as_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/threads"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server).create_thread().await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::Api { status: 502, ref message, .. } if message == "bad gateway"
    ));
}

#[tokio::test]
async fn transcribe_uploads_file_as_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .and(body_string_contains("whisper-1"))
        .and(body_string_contains("fake-mp3-bytes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "Hello" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
    file.write_all(b"fake-mp3-bytes").unwrap();

    let transcription = client_for(&server)
        .transcribe(file.path(), TranscriptionModel::Whisper)
        .await
        .unwrap();

    assert_eq!(transcription.text(), "Hello");
}

#[tokio::test]
async fn transcribe_missing_file_is_io_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let err = client_for(&server)
        .transcribe(&dir.path().join("missing.mp3"), TranscriptionModel::Whisper)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Io { .. }));
}

#[tokio::test]
async fn synthesize_speech_returns_raw_audio() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_json(json!({
            "model": "tts-1",
            "input": "Hi there",
            "voice": "nova",
            "response_format": "mp3"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFFu8, 0xFB, 0x90, 0x00]))
        .expect(1)
        .mount(&server)
        .await;

    let audio = client_for(&server)
        .synthesize_speech(SpeechRequest::new("Hi there").with_voice(Voice::Nova))
        .await
        .unwrap();

    assert_eq!(audio, vec![0xFF, 0xFB, 0x90, 0x00]);
}
