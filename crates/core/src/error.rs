use openai_assistants::ApiError;
use openai_assistants::types::RunStatus;

/// Everything that can go wrong while bridging a chat input to the assistant.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("no session for chat {0}")]
    SessionNotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(
        "run {run_id} ended with status {status}: {}",
        .reason.as_deref().unwrap_or("no reason given")
    )]
    RunFailed {
        run_id: String,
        status: RunStatus,
        reason: Option<String>,
    },

    #[error("run {run_id} did not complete after {attempts} status checks")]
    RunTimedOut { run_id: String, attempts: u32 },

    #[error("exchange cancelled")]
    Cancelled,

    #[error("run {0} produced no text reply")]
    EmptyReply(String),

    #[error("transcription produced no text")]
    EmptyTranscript,

    #[error("temporary audio file: {0}")]
    TempFile(#[source] std::io::Error),
}
