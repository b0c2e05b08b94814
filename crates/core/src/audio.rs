//! Voice notes: speech to text, through the assistant, and back to speech.

use crate::bridge::ChatBridge;
use crate::error::BridgeError;
use crate::poller::cancellable;
use openai_assistants::AssistantsApi;
use openai_assistants::types::audio::{
    SpeechFormat, SpeechModel, SpeechRequest, TranscriptionModel, Voice,
};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
pub struct AudioOptions {
    transcription_model: TranscriptionModel,
    speech_model: SpeechModel,
    voice: Voice,
    format: SpeechFormat,
    // Used for the staged clip when the input carries no extension of its own.
    input_extension: String,
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            transcription_model: TranscriptionModel::default(),
            speech_model: SpeechModel::default(),
            voice: Voice::default(),
            format: SpeechFormat::default(),
            input_extension: "mp3".to_string(),
        }
    }
}

impl AudioOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transcription_model(mut self, model: TranscriptionModel) -> Self {
        self.transcription_model = model;
        self
    }

    pub fn with_speech_model(mut self, model: SpeechModel) -> Self {
        self.speech_model = model;
        self
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_format(mut self, format: SpeechFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_input_extension(mut self, extension: &str) -> Self {
        self.input_extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn transcription_model(&self) -> &TranscriptionModel {
        &self.transcription_model
    }

    pub fn speech_model(&self) -> &SpeechModel {
        &self.speech_model
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }

    pub fn format(&self) -> SpeechFormat {
        self.format
    }

    pub fn input_extension(&self) -> &str {
        &self.input_extension
    }
}

/// The result of a voice exchange.
#[derive(Debug, Clone)]
pub struct SpeechReply {
    transcript: String,
    text: String,
    audio: Vec<u8>,
    format: SpeechFormat,
}

impl SpeechReply {
    pub fn new(transcript: &str, text: &str, audio: Vec<u8>, format: SpeechFormat) -> Self {
        Self {
            transcript: transcript.to_string(),
            text: text.to_string(),
            audio,
            format,
        }
    }

    /// What the user said, as transcribed.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// The assistant's reply text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The reply voiced in [`Self::format`].
    pub fn audio(&self) -> &[u8] {
        &self.audio
    }

    pub fn format(&self) -> SpeechFormat {
        self.format
    }

    pub fn into_audio(self) -> Vec<u8> {
        self.audio
    }
}

impl<A: AssistantsApi> ChatBridge<A> {
    /// Transcribes `audio`, runs the transcript through [`Self::handle_text`] and
    /// voices the reply.
    ///
    /// The clip is staged in a uniquely named temporary file that is removed when
    /// this returns, whether or not the exchange succeeded. The service infers the
    /// codec from the file name, so `extension` (or the configured default) should
    /// match the container.
    pub async fn handle_audio(
        &self,
        chat_id: &str,
        audio: &[u8],
        extension: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<SpeechReply, BridgeError> {
        if cancel.is_cancelled() {
            return Err(BridgeError::Cancelled);
        }
        let options = self.options.audio();
        let extension = extension
            .map(|ext| ext.trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .unwrap_or(options.input_extension());

        let staged = tempfile::Builder::new()
            .prefix("chat-bridge-")
            .suffix(&format!(".{extension}"))
            .tempfile()
            .map_err(BridgeError::TempFile)?;
        tokio::fs::write(staged.path(), audio)
            .await
            .map_err(BridgeError::TempFile)?;
        tracing::debug!(
            "chat {}: staged {} bytes of audio at {}",
            chat_id,
            audio.len(),
            staged.path().display()
        );

        let model = options.transcription_model().clone();
        let transcript = cancellable(cancel, self.api.transcribe(staged.path(), model))
            .await?
            .into_text();
        if transcript.trim().is_empty() {
            return Err(BridgeError::EmptyTranscript);
        }

        let text = self.handle_text(chat_id, &transcript, cancel).await?;

        let request = SpeechRequest::new(&text)
            .with_model(options.speech_model().clone())
            .with_voice(options.voice().clone())
            .with_response_format(options.format());
        let speech = cancellable(cancel, self.api.synthesize_speech(request)).await?;

        staged.close().map_err(BridgeError::TempFile)?;

        Ok(SpeechReply::new(&transcript, &text, speech, options.format()))
    }
}
