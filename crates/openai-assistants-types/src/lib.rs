//now people using the types library can use these types
pub mod assistant;
pub mod audio;
pub mod error;
pub mod message;
pub mod run;
pub mod thread;

//re-export types for easier access
pub use assistant::Assistant;
pub use audio::{SpeechFormat, SpeechModel, SpeechRequest, Transcription, TranscriptionModel, Voice};
pub use error::{ErrorDetails, ErrorResponse};
pub use message::{
    CreateMessageRequest, ListMessagesQuery, MessageContent, MessageList, MessageRole,
    SortOrder, TextContent, ThreadMessage,
};
pub use run::{CreateRunRequest, Run, RunError, RunStatus};
pub use thread::Thread;
