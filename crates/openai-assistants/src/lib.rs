mod client;

pub use openai_assistants_types as types;
pub use client::{
    ApiError, AssistantsApi, Client,
    config::{Config, ConfigBuilder},
};
