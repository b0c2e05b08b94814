pub mod audio;
pub mod bridge;
pub mod error;
pub mod poller;
pub mod session;

#[cfg(test)]
mod testing;

pub use audio::{AudioOptions, SpeechReply};
pub use bridge::{BridgeOptions, ChatBridge};
pub use error::BridgeError;
pub use poller::PollPolicy;
pub use session::{Session, SessionStore};
pub use tokio_util::sync::CancellationToken;

/// What a chat user sent.
///
/// The chat front end classifies the payload; the bridge only routes it.
#[derive(Debug, Clone)]
pub enum Input {
    /// A plain text message.
    Text(String),
    /// An encoded audio clip (voice note), with the file extension of its
    /// container when the front end knows it.
    Audio {
        data: Vec<u8>,
        extension: Option<String>,
    },
    /// Anything else the front end received, ex: an image or a sticker.
    Unsupported { kind: String },
}

impl Input {
    pub fn kind(&self) -> &str {
        match self {
            Input::Text(_) => "text",
            Input::Audio { .. } => "audio",
            Input::Unsupported { kind } => kind,
        }
    }
}

/// What the bridge hands back for an [`Input`].
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Speech(SpeechReply),
}

impl Reply {
    /// The assistant's reply text, regardless of whether it was also voiced.
    pub fn text(&self) -> &str {
        match self {
            Reply::Text(text) => text,
            Reply::Speech(speech) => speech.text(),
        }
    }
}
