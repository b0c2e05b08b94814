#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Body of `POST /threads/{thread_id}/messages`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateMessageRequest {
    /// The role of the message sender: "user" or "assistant"
    role: MessageRole,

    /// The text content of the message
    content: String,
}

impl CreateMessageRequest {
    pub fn user(content: &str) -> Self {
        Self {
            role: MessageRole::User,
            content: content.to_string(),
        }
    }

    pub fn with_role(mut self, role: MessageRole) -> Self {
        self.role = role;
        self
    }

    pub fn role(&self) -> MessageRole {
        self.role.clone()
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// One item of a message's content list.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    ImageFile { image_file: serde_json::Value },
    ImageUrl { image_url: serde_json::Value },
    Refusal { refusal: String },
    #[serde(other)]
    Unknown,
}

impl MessageContent {
    pub fn text(value: &str) -> Self {
        Self::Text {
            text: TextContent {
                value: value.to_string(),
                annotations: Vec::new(),
            },
        }
    }

    /// The text value, if this is a text item.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text.value()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TextContent {
    value: String,

    #[serde(default)]
    annotations: Vec<serde_json::Value>,
}

impl TextContent {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn annotations(&self) -> &[serde_json::Value] {
        &self.annotations
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ThreadMessage {
    id: String,

    thread_id: String,

    role: MessageRole,

    content: Vec<MessageContent>,

    /// Set on messages written by the assistant during a run.
    #[serde(default)]
    run_id: Option<String>,
}

impl ThreadMessage {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn role(&self) -> MessageRole {
        self.role.clone()
    }

    pub fn content(&self) -> &[MessageContent] {
        &self.content
    }

    pub fn run_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }
}

/// A page of messages from `GET /threads/{thread_id}/messages`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MessageList {
    data: Vec<ThreadMessage>,

    #[serde(default)]
    first_id: Option<String>,

    #[serde(default)]
    last_id: Option<String>,

    #[serde(default)]
    has_more: bool,
}

impl MessageList {
    pub fn data(&self) -> &[ThreadMessage] {
        &self.data
    }

    pub fn first_id(&self) -> Option<&str> {
        self.first_id.as_deref()
    }

    pub fn last_id(&self) -> Option<&str> {
        self.last_id.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// First content item of the first message, when it is text.
    pub fn first_text(&self) -> Option<&str> {
        self.data
            .first()
            .and_then(|message| message.content().first())
            .and_then(MessageContent::as_text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query parameters for listing messages. Defaults to newest first.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ListMessagesQuery {
    order: SortOrder,

    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

impl ListMessagesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }
}
