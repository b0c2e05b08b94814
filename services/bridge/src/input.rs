use anyhow::{Context, Result};
use chat_bridge_core::Input;
use std::path::Path;

/// Containers the transcription endpoint accepts.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "flac", "m4a", "mp3", "mp4", "mpeg", "mpga", "oga", "ogg", "wav", "webm",
];

const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Turns a file the user attached into an [`Input`] based on its extension.
///
/// Audio files become voice notes, text files become messages, everything else
/// is passed along as unsupported so the bridge can reject it.
pub async fn from_file(path: &Path) -> Result<Input> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some(ext) if AUDIO_EXTENSIONS.contains(&ext) => {
            let data = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read audio file: {}", path.display()))?;
            Ok(Input::Audio {
                data,
                extension: Some(ext.to_string()),
            })
        }
        Some(ext) if TEXT_EXTENSIONS.contains(&ext) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read text file: {}", path.display()))?;
            Ok(Input::Text(text.trim().to_string()))
        }
        Some(ext) => Ok(Input::Unsupported {
            kind: ext.to_string(),
        }),
        None => Ok(Input::Unsupported {
            kind: "file".to_string(),
        }),
    }
}
