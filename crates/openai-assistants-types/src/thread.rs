/// A conversation thread. Only the id is needed to talk to it afterwards.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Thread {
    id: String,

    /// Unix timestamp (seconds) of creation.
    #[serde(default)]
    created_at: i64,
}

impl Thread {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            created_at: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}
