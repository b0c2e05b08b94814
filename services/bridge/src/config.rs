//! Application Configuration Module
//!
//! This module centralizes the configuration for the chat bridge service.
//! It loads settings from environment variables and turns them into the
//! client and bridge settings used by the rest of the application.

use chat_bridge_core::{AudioOptions, BridgeOptions, PollPolicy};
use openai_assistants::types::audio::{SpeechFormat, SpeechModel, TranscriptionModel, Voice};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// Holds all configuration loaded from the environment.
#[derive(Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub assistant_id: String,
    pub base_url: Option<String>,
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
    pub poll_deadline: Option<Duration>,
    pub transcription_model: TranscriptionModel,
    pub speech_model: SpeechModel,
    pub voice: Voice,
    pub speech_format: SpeechFormat,
    pub audio_input_format: String,
    pub speech_output_dir: PathBuf,
    pub log_level: Level,
}

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// *   `OPENAI_API_KEY`: Your secret key for the OpenAI API. `OPENAI_KEY` is accepted as a fallback.
    /// *   `OPENAI_ASSISTANT`: The id of the assistant that answers the chats.
    /// *   `OPENAI_BASE_URL`: (Optional) API base url. Defaults to "https://api.openai.com/v1".
    /// *   `POLL_INTERVAL_MS`: (Optional) Delay between run status checks. Defaults to 3000.
    /// *   `POLL_MAX_ATTEMPTS`: (Optional) Status checks before giving up on a run. Defaults to 100.
    /// *   `POLL_DEADLINE_SECS`: (Optional) Overall time limit for one run.
    /// *   `TRANSCRIPTION_MODEL`: (Optional) Defaults to "whisper-1".
    /// *   `TTS_MODEL`: (Optional) Defaults to "tts-1".
    /// *   `TTS_VOICE`: (Optional) Defaults to "alloy".
    /// *   `TTS_FORMAT`: (Optional) Format of voiced replies. Defaults to "mp3".
    /// *   `AUDIO_INPUT_FORMAT`: (Optional) Extension assumed for audio without one. Defaults to "mp3".
    /// *   `SPEECH_OUTPUT_DIR`: (Optional) Where voiced replies are written. Defaults to the system temp dir.
    /// *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file. This is useful for local development and is ignored if not present.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = lookup("OPENAI_API_KEY")
            .or_else(|| lookup("OPENAI_KEY"))
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))?;

        let assistant_id = lookup("OPENAI_ASSISTANT")
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_ASSISTANT".to_string()))?;

        let base_url = lookup("OPENAI_BASE_URL").filter(|url| !url.is_empty());

        let poll_interval =
            Duration::from_millis(parse_or(&lookup, "POLL_INTERVAL_MS", 3000u64)?);
        let poll_max_attempts = parse_or(&lookup, "POLL_MAX_ATTEMPTS", 100u32)?;
        if poll_max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "POLL_MAX_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let poll_deadline = match lookup("POLL_DEADLINE_SECS") {
            Some(raw) => Some(Duration::from_secs(parse("POLL_DEADLINE_SECS", &raw)?)),
            None => None,
        };

        let transcription_model =
            parse_or(&lookup, "TRANSCRIPTION_MODEL", TranscriptionModel::default())?;
        let speech_model = parse_or(&lookup, "TTS_MODEL", SpeechModel::default())?;
        let voice = parse_or(&lookup, "TTS_VOICE", Voice::default())?;
        let speech_format = parse_or(&lookup, "TTS_FORMAT", SpeechFormat::default())?;
        let audio_input_format =
            lookup("AUDIO_INPUT_FORMAT").unwrap_or_else(|| "mp3".to_string());

        let speech_output_dir = lookup("SPEECH_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir);

        // Configure logging level from RUST_LOG, with a sensible default.
        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            openai_api_key,
            assistant_id,
            base_url,
            poll_interval,
            poll_max_attempts,
            poll_deadline,
            transcription_model,
            speech_model,
            voice,
            speech_format,
            audio_input_format,
            speech_output_dir,
            log_level,
        })
    }

    pub fn client_config(&self) -> openai_assistants::Config {
        let mut builder = openai_assistants::Config::builder().with_api_key(&self.openai_api_key);
        if let Some(base_url) = &self.base_url {
            builder = builder.with_base_url(base_url);
        }
        builder.build()
    }

    pub fn bridge_options(&self) -> BridgeOptions {
        let mut poll = PollPolicy::new()
            .with_interval(self.poll_interval)
            .with_max_attempts(self.poll_max_attempts);
        if let Some(deadline) = self.poll_deadline {
            poll = poll.with_deadline(deadline);
        }

        let audio = AudioOptions::new()
            .with_transcription_model(self.transcription_model.clone())
            .with_speech_model(self.speech_model.clone())
            .with_voice(self.voice.clone())
            .with_format(self.speech_format)
            .with_input_extension(&self.audio_input_format);

        BridgeOptions::new(&self.assistant_id)
            .with_poll_policy(poll)
            .with_audio(audio)
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string()))
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => parse(key, &raw),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn unset_optional_vars_use_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_ASSISTANT", "asst_1"),
        ]))
        .unwrap();

        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.poll_max_attempts, 100);
        assert_eq!(config.poll_deadline, None);
        assert_eq!(config.transcription_model, TranscriptionModel::Whisper);
        assert_eq!(config.speech_model, SpeechModel::Tts1);
        assert_eq!(config.voice, Voice::Alloy);
        assert_eq!(config.speech_format, SpeechFormat::Mp3);
        assert_eq!(config.log_level, Level::INFO);

        let options = config.bridge_options();
        assert_eq!(options.assistant_id(), "asst_1");
        assert_eq!(options.poll_policy(), &PollPolicy::default());
    }

    #[test]
    fn legacy_key_variable_is_accepted() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_KEY", "sk-legacy"),
            ("OPENAI_ASSISTANT", "asst_1"),
        ]))
        .unwrap();

        assert_eq!(config.openai_api_key, "sk-legacy");
    }

    #[test]
    fn missing_assistant_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")]))
            .err()
            .unwrap();

        assert!(matches!(err, ConfigError::MissingVar(ref var) if var == "OPENAI_ASSISTANT"));
    }

    #[test]
    fn invalid_poll_settings_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_ASSISTANT", "asst_1"),
            ("POLL_INTERVAL_MS", "soon"),
        ]))
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "POLL_INTERVAL_MS"));

        let err = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_ASSISTANT", "asst_1"),
            ("POLL_MAX_ATTEMPTS", "0"),
        ]))
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "POLL_MAX_ATTEMPTS"));
    }

    #[test]
    fn overrides_flow_into_bridge_options() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_ASSISTANT", "asst_1"),
            ("POLL_INTERVAL_MS", "500"),
            ("POLL_MAX_ATTEMPTS", "10"),
            ("POLL_DEADLINE_SECS", "30"),
            ("TTS_VOICE", "nova"),
            ("TTS_FORMAT", "opus"),
            ("AUDIO_INPUT_FORMAT", "ogg"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();

        let options = config.bridge_options();
        let poll = options.poll_policy();
        assert_eq!(poll.interval(), Duration::from_millis(500));
        assert_eq!(poll.max_attempts(), 10);
        assert_eq!(poll.deadline(), Some(Duration::from_secs(30)));
        assert_eq!(options.audio().voice(), &Voice::Nova);
        assert_eq!(options.audio().format(), SpeechFormat::Opus);
        assert_eq!(options.audio().input_extension(), "ogg");
        assert_eq!(config.log_level, Level::DEBUG);
    }
}
