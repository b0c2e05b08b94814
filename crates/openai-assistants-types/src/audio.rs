use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

// Open string enums: known values get a variant, anything else is kept verbatim
// so newer voices and models pass through untouched.
macro_rules! open_string_enum {
    ($name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $($variant,)+
            Custom(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $value,)+
                    $name::Custom(s) => s,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(match s {
                    $($value => $name::$variant,)+
                    _ => $name::Custom(s.to_string()),
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                let Ok(value) = $name::from_str(&s);
                Ok(value)
            }
        }
    };
}

open_string_enum!(Voice {
    Alloy => "alloy",
    Ash => "ash",
    Coral => "coral",
    Echo => "echo",
    Fable => "fable",
    Onyx => "onyx",
    Nova => "nova",
    Sage => "sage",
    Shimmer => "shimmer",
});

open_string_enum!(TranscriptionModel {
    Whisper => "whisper-1",
    Gpt4oTranscribe => "gpt-4o-transcribe",
    Gpt4oMiniTranscribe => "gpt-4o-mini-transcribe",
});

open_string_enum!(SpeechModel {
    Tts1 => "tts-1",
    Tts1Hd => "tts-1-hd",
    Gpt4oMiniTts => "gpt-4o-mini-tts",
});

impl Default for Voice {
    fn default() -> Self {
        Voice::Alloy
    }
}

impl Default for TranscriptionModel {
    fn default() -> Self {
        TranscriptionModel::Whisper
    }
}

impl Default for SpeechModel {
    fn default() -> Self {
        SpeechModel::Tts1
    }
}

/// Container format of synthesized speech.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechFormat {
    #[default]
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
    Pcm,
}

impl SpeechFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            SpeechFormat::Mp3 => "mp3",
            SpeechFormat::Opus => "opus",
            SpeechFormat::Aac => "aac",
            SpeechFormat::Flac => "flac",
            SpeechFormat::Wav => "wav",
            SpeechFormat::Pcm => "pcm",
        }
    }
}

impl FromStr for SpeechFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mp3" => Ok(SpeechFormat::Mp3),
            "opus" => Ok(SpeechFormat::Opus),
            "aac" => Ok(SpeechFormat::Aac),
            "flac" => Ok(SpeechFormat::Flac),
            "wav" => Ok(SpeechFormat::Wav),
            "pcm" => Ok(SpeechFormat::Pcm),
            other => Err(format!("unsupported speech format '{other}'")),
        }
    }
}

/// Body of `POST /audio/speech`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SpeechRequest {
    model: SpeechModel,

    /// The text to synthesize.
    input: String,

    voice: Voice,

    response_format: SpeechFormat,

    /// Playback speed between 0.25 and 4.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
}

impl SpeechRequest {
    pub fn new(input: &str) -> Self {
        Self {
            model: SpeechModel::default(),
            input: input.to_string(),
            voice: Voice::default(),
            response_format: SpeechFormat::default(),
            speed: None,
        }
    }

    pub fn with_model(mut self, model: SpeechModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_response_format(mut self, format: SpeechFormat) -> Self {
        self.response_format = format;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn model(&self) -> &SpeechModel {
        &self.model
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }

    pub fn response_format(&self) -> SpeechFormat {
        self.response_format
    }

    pub fn speed(&self) -> Option<f32> {
        self.speed
    }
}

/// Response of `POST /audio/transcriptions` with the default json format.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Transcription {
    text: String,
}

impl Transcription {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
