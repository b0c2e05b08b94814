/// The `{"error": {...}}` envelope returned with non-2xx responses.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    error: ErrorDetails,
}

impl ErrorResponse {
    pub fn error(&self) -> &ErrorDetails {
        &self.error
    }

    pub fn into_error(self) -> ErrorDetails {
        self.error
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetails {
    #[serde(rename = "type", default)]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<String>,
    message: String,
    #[serde(default)]
    param: Option<String>,
}

impl ErrorDetails {
    pub fn new(message: &str) -> Self {
        Self {
            error_type: None,
            code: None,
            message: message.to_string(),
            param: None,
        }
    }

    pub fn error_type(&self) -> Option<&str> {
        self.error_type.as_deref()
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }
}
