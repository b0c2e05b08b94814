/// An assistant as returned by `GET /assistants/{assistant_id}`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Assistant {
    id: String,

    /// Unix timestamp (seconds) of creation.
    #[serde(default)]
    created_at: i64,

    name: Option<String>,

    /// The model the assistant runs on, ex: "gpt-4o"
    model: String,

    /// The system instructions the assistant uses.
    instructions: Option<String>,
}

impl Assistant {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }
}
