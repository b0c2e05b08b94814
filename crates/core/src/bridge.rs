use crate::audio::AudioOptions;
use crate::error::BridgeError;
use crate::poller::{self, PollPolicy, cancellable};
use crate::session::{Session, SessionStore};
use crate::{Input, Reply};
use openai_assistants::AssistantsApi;
use openai_assistants::types::{Assistant, CreateMessageRequest, CreateRunRequest};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct BridgeOptions {
    assistant_id: String,
    poll: PollPolicy,
    audio: AudioOptions,
}

impl BridgeOptions {
    pub fn new(assistant_id: &str) -> Self {
        Self {
            assistant_id: assistant_id.to_string(),
            poll: PollPolicy::default(),
            audio: AudioOptions::default(),
        }
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_audio(mut self, audio: AudioOptions) -> Self {
        self.audio = audio;
        self
    }

    pub fn assistant_id(&self) -> &str {
        &self.assistant_id
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.poll
    }

    pub fn audio(&self) -> &AudioOptions {
        &self.audio
    }
}

/// Routes chat inputs to the assistant and returns its replies.
///
/// One bridge serves every chat. It is `Send + Sync` and meant to be shared
/// behind an `Arc`; exchanges for different chats run concurrently while those
/// for the same chat are taken one at a time.
pub struct ChatBridge<A: AssistantsApi> {
    pub(crate) api: Arc<A>,
    sessions: SessionStore,
    assistant: OnceCell<Assistant>,
    pub(crate) options: BridgeOptions,
}

impl<A: AssistantsApi> ChatBridge<A> {
    pub fn new(api: Arc<A>, options: BridgeOptions) -> Self {
        Self {
            api,
            sessions: SessionStore::new(),
            assistant: OnceCell::new(),
            options,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    /// The configured assistant, fetched on first use.
    pub async fn assistant(&self) -> Result<&Assistant, BridgeError> {
        let assistant = self
            .assistant
            .get_or_try_init(|| self.api.retrieve_assistant(&self.options.assistant_id))
            .await?;
        Ok(assistant)
    }

    /// Makes sure `chat_id` has a thread, creating one on first contact.
    pub async fn ensure_session(&self, chat_id: &str) -> Result<Arc<Session>, BridgeError> {
        self.sessions
            .get_or_create(chat_id, || async {
                let thread = self.api.create_thread().await?;
                Ok::<_, BridgeError>(thread.id().to_string())
            })
            .await
    }

    /// Dispatches on the shape of `input`.
    pub async fn handle_input(
        &self,
        chat_id: &str,
        input: Input,
        cancel: &CancellationToken,
    ) -> Result<Reply, BridgeError> {
        match input {
            Input::Text(text) => {
                let reply = self.handle_text(chat_id, &text, cancel).await?;
                Ok(Reply::Text(reply))
            }
            Input::Audio { data, extension } => {
                let reply = self
                    .handle_audio(chat_id, &data, extension.as_deref(), cancel)
                    .await?;
                Ok(Reply::Speech(reply))
            }
            Input::Unsupported { kind } => {
                tracing::warn!("chat {}: unsupported input type '{}'", chat_id, kind);
                Err(BridgeError::UnsupportedInput(kind))
            }
        }
    }

    /// Sends `text` to the chat's thread and returns the assistant's reply.
    ///
    /// The chat must already have a session (see [`Self::ensure_session`]).
    /// The appended message is not rolled back if the run later fails.
    pub async fn handle_text(
        &self,
        chat_id: &str,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<String, BridgeError> {
        let session = self
            .sessions
            .get(chat_id)
            .ok_or_else(|| BridgeError::SessionNotFound(chat_id.to_string()))?;
        if cancel.is_cancelled() {
            return Err(BridgeError::Cancelled);
        }
        let assistant = cancellable(cancel, self.assistant()).await?;

        let _exchange = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(BridgeError::Cancelled),
            guard = session.lock_exchange() => guard,
        };
        let thread_id = session.thread_id();

        cancellable(
            cancel,
            self.api.create_message(thread_id, CreateMessageRequest::user(text)),
        )
        .await?;

        let mut request = CreateRunRequest::new(assistant.id());
        if let Some(instructions) = assistant.instructions() {
            request = request.with_instructions(instructions);
        }
        let run = cancellable(cancel, self.api.create_run(thread_id, request)).await?;
        tracing::debug!("chat {}: started run {}", chat_id, run.id());

        let messages = poller::wait_for_completion(
            self.api.as_ref(),
            &self.options.poll,
            thread_id,
            run.id(),
            cancel,
        )
        .await?;

        messages
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| BridgeError::EmptyReply(run.id().to_string()))
    }
}
