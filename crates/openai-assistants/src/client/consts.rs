pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

pub const BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const OPENAI_BETA_HEADER: &str = "openai-beta";
pub const ASSISTANTS_BETA: &str = "assistants=v2";
