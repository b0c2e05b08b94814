use std::fmt;

/// Lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    /// A status this crate does not know about yet.
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }

    /// True while the run may still reach `completed` without client action.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling | RunStatus::Unknown
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RunError {
    code: String,
    message: String,
}

impl RunError {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Run {
    id: String,

    thread_id: String,

    #[serde(default)]
    assistant_id: Option<String>,

    status: RunStatus,

    /// Populated when the run ends in `failed`.
    #[serde(default)]
    last_error: Option<RunError>,
}

impl Run {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn assistant_id(&self) -> Option<&str> {
        self.assistant_id.as_deref()
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&RunError> {
        self.last_error.as_ref()
    }
}

/// Body of `POST /threads/{thread_id}/runs`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateRunRequest {
    assistant_id: String,

    /// Overrides the assistant's instructions for this run.
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<String>,
}

impl CreateRunRequest {
    pub fn new(assistant_id: &str) -> Self {
        Self {
            assistant_id: assistant_id.to_string(),
            instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: &str) -> Self {
        self.instructions = Some(instructions.to_string());
        self
    }

    pub fn assistant_id(&self) -> &str {
        &self.assistant_id
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }
}
