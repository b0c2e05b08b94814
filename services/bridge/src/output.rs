use anyhow::{Context, Result};
use chat_bridge_core::SpeechReply;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes a voiced reply into `dir` under a fresh name and returns its path.
///
/// Names never collide, so concurrent replies for different chats are safe.
pub fn save_speech(dir: &Path, chat_id: &str, reply: &SpeechReply) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create speech output dir: {}", dir.display()))?;

    let prefix: String = chat_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let mut file = tempfile::Builder::new()
        .prefix(&format!("reply-{prefix}-"))
        .suffix(&format!(".{}", reply.format().extension()))
        .tempfile_in(dir)
        .context("Failed to create speech output file")?;
    file.write_all(reply.audio())
        .context("Failed to write speech output")?;

    let (_, path) = file.keep().context("Failed to persist speech output")?;
    Ok(path)
}
