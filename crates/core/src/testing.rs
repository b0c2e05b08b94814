// Shared test doubles for the `AssistantsApi` seam.

use async_trait::async_trait;
use mockall::mock;
use openai_assistants::types::audio::{SpeechRequest, Transcription, TranscriptionModel};
use openai_assistants::types::{
    Assistant, CreateMessageRequest, CreateRunRequest, ListMessagesQuery, MessageList, Run,
    Thread, ThreadMessage,
};
use openai_assistants::{ApiError, AssistantsApi};
use serde_json::json;
use std::path::Path;

mock! {
    pub AssistantsApi {}
    #[async_trait]
    impl AssistantsApi for AssistantsApi {
        async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant, ApiError>;
        async fn create_thread(&self) -> Result<Thread, ApiError>;
        async fn create_message(
            &self,
            thread_id: &str,
            request: CreateMessageRequest,
        ) -> Result<ThreadMessage, ApiError>;
        async fn create_run(
            &self,
            thread_id: &str,
            request: CreateRunRequest,
        ) -> Result<Run, ApiError>;
        async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ApiError>;
        async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ApiError>;
        async fn list_messages(
            &self,
            thread_id: &str,
            query: ListMessagesQuery,
        ) -> Result<MessageList, ApiError>;
        async fn transcribe(
            &self,
            audio_path: &Path,
            model: TranscriptionModel,
        ) -> Result<Transcription, ApiError>;
        async fn synthesize_speech(&self, request: SpeechRequest) -> Result<Vec<u8>, ApiError>;
    }
}

pub fn api_error(status: u16, message: &str) -> ApiError {
    ApiError::Api {
        status,
        message: message.to_string(),
        code: None,
    }
}

pub fn assistant(id: &str, instructions: Option<&str>) -> Assistant {
    serde_json::from_value(json!({
        "id": id,
        "model": "gpt-4o",
        "name": "Test assistant",
        "instructions": instructions
    }))
    .unwrap()
}

pub fn run(id: &str, status: &str) -> Run {
    serde_json::from_value(json!({
        "id": id,
        "thread_id": "thread_1",
        "assistant_id": "asst_1",
        "status": status
    }))
    .unwrap()
}

pub fn user_message(thread_id: &str, text: &str) -> ThreadMessage {
    serde_json::from_value(json!({
        "id": "msg_user",
        "thread_id": thread_id,
        "role": "user",
        "content": [ { "type": "text", "text": { "value": text, "annotations": [] } } ]
    }))
    .unwrap()
}

/// A newest-first list whose first message is the assistant saying `text`.
pub fn reply_list(text: &str) -> MessageList {
    serde_json::from_value(json!({
        "object": "list",
        "data": [
            {
                "id": "msg_reply",
                "thread_id": "thread_1",
                "role": "assistant",
                "run_id": "run_1",
                "content": [ { "type": "text", "text": { "value": text, "annotations": [] } } ]
            },
            {
                "id": "msg_user",
                "thread_id": "thread_1",
                "role": "user",
                "content": [ { "type": "text", "text": { "value": "earlier", "annotations": [] } } ]
            }
        ],
        "has_more": false
    }))
    .unwrap()
}
