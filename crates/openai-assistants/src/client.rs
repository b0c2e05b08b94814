use crate::types::audio::{SpeechRequest, Transcription, TranscriptionModel};
use crate::types::{
    Assistant, CreateMessageRequest, CreateRunRequest, ListMessagesQuery, MessageList, Run,
    Thread, ThreadMessage,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::path::Path;

pub mod config;
mod consts;
mod error;
mod utils;

pub use error::ApiError;

/// The calls the bridge makes against the assistants service.
///
/// `Client` is the HTTP implementation; tests substitute a mock so the
/// orchestration can run without network access.
#[async_trait]
pub trait AssistantsApi: Send + Sync {
    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant, ApiError>;

    async fn create_thread(&self) -> Result<Thread, ApiError>;

    /// Appends a message to the thread.
    async fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> Result<ThreadMessage, ApiError>;

    async fn create_run(&self, thread_id: &str, request: CreateRunRequest) -> Result<Run, ApiError>;

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ApiError>;

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ApiError>;

    async fn list_messages(
        &self,
        thread_id: &str,
        query: ListMessagesQuery,
    ) -> Result<MessageList, ApiError>;

    /// Speech to text for the audio file at `audio_path`.
    async fn transcribe(
        &self,
        audio_path: &Path,
        model: TranscriptionModel,
    ) -> Result<Transcription, ApiError>;

    /// Text to speech; returns the encoded audio bytes.
    async fn synthesize_speech(&self, request: SpeechRequest) -> Result<Vec<u8>, ApiError>;
}

// Holds the HTTP client with auth headers baked in, plus the configuration it was built from.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: config::Config,
}

impl Client {
    pub fn new(config: config::Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .default_headers(utils::build_headers(&config)?)
            .timeout(config.timeout())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &config::Config {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url(), path)
    }
}

#[async_trait]
impl AssistantsApi for Client {
    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant, ApiError> {
        tracing::debug!("retrieving assistant {}", assistant_id);
        let response = self
            .http
            .get(self.url(&format!("assistants/{assistant_id}")))
            .send()
            .await?;
        utils::decode_json(response).await
    }

    async fn create_thread(&self) -> Result<Thread, ApiError> {
        let response = self
            .http
            .post(self.url("threads"))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let thread: Thread = utils::decode_json(response).await?;
        tracing::debug!("created thread {}", thread.id());
        Ok(thread)
    }

    async fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> Result<ThreadMessage, ApiError> {
        let response = self
            .http
            .post(self.url(&format!("threads/{thread_id}/messages")))
            .json(&request)
            .send()
            .await?;
        utils::decode_json(response).await
    }

    async fn create_run(
        &self,
        thread_id: &str,
        request: CreateRunRequest,
    ) -> Result<Run, ApiError> {
        let response = self
            .http
            .post(self.url(&format!("threads/{thread_id}/runs")))
            .json(&request)
            .send()
            .await?;
        let run: Run = utils::decode_json(response).await?;
        tracing::debug!("created run {} on thread {}", run.id(), thread_id);
        Ok(run)
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("threads/{thread_id}/runs/{run_id}")))
            .send()
            .await?;
        utils::decode_json(response).await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ApiError> {
        let response = self
            .http
            .post(self.url(&format!("threads/{thread_id}/runs/{run_id}/cancel")))
            .send()
            .await?;
        utils::decode_json(response).await
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        query: ListMessagesQuery,
    ) -> Result<MessageList, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("threads/{thread_id}/messages")))
            .query(&query)
            .send()
            .await?;
        utils::decode_json(response).await
    }

    async fn transcribe(
        &self,
        audio_path: &Path,
        model: TranscriptionModel,
    ) -> Result<Transcription, ApiError> {
        let audio = tokio::fs::read(audio_path)
            .await
            .map_err(|source| ApiError::Io {
                path: audio_path.to_path_buf(),
                source,
            })?;
        let file_name = audio_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("audio.mp3")
            .to_string();
        tracing::debug!("transcribing {} bytes from {}", audio.len(), file_name);

        let form = Form::new()
            .part("file", Part::bytes(audio).file_name(file_name))
            .text("model", model.to_string());

        let response = self
            .http
            .post(self.url("audio/transcriptions"))
            .multipart(form)
            .send()
            .await?;
        utils::decode_json(response).await
    }

    async fn synthesize_speech(&self, request: SpeechRequest) -> Result<Vec<u8>, ApiError> {
        let response = self
            .http
            .post(self.url("audio/speech"))
            .json(&request)
            .send()
            .await?;
        let response = utils::check_status(response).await?;
        let audio = response.bytes().await?;
        tracing::debug!("synthesized {} bytes of speech", audio.len());
        Ok(audio.to_vec())
    }
}

