use anyhow::{Context, Result};
use chat_bridge::config::Config;
use chat_bridge::{input, output};
use chat_bridge_core::{CancellationToken, ChatBridge, Input, Reply};
use clap::{Parser, Subcommand};
use openai_assistants::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::fmt::time::ChronoLocal;

#[derive(Parser)]
#[command(version, about = "Talk to an OpenAI assistant from the terminal")]
struct Cli {
    /// Conversation the inputs belong to. Each chat id gets its own thread.
    #[arg(long, default_value = "local")]
    chat_id: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send one text message and print the reply
    Text { message: String },
    /// Send one voice note and save the voiced reply
    Audio { file: PathBuf },
    /// Interactive chat. `/send <FILE>` attaches a file, `/quit` exits.
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    // --- 3. Parse Command-Line Arguments ---
    let args = Cli::parse();

    // --- 4. Initialize API Client and Bridge ---
    let client = Client::new(config.client_config()).context("Failed to build OpenAI client")?;
    let bridge = Arc::new(ChatBridge::new(Arc::new(client), config.bridge_options()));
    tracing::info!(
        "Bridge ready for assistant {} (chat {}).",
        config.assistant_id,
        args.chat_id
    );

    // --- 5. Cancel in-flight exchanges on Ctrl-C ---
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling.");
            on_signal.cancel();
        }
    });

    bridge
        .ensure_session(&args.chat_id)
        .await
        .context("Failed to start a conversation thread")?;

    // --- 6. Run ---
    match args.command {
        Command::Text { message } => {
            let reply = bridge
                .handle_input(&args.chat_id, Input::Text(message), &cancel)
                .await?;
            present(&config, &args.chat_id, &reply)?;
        }
        Command::Audio { file } => {
            let reply = send_file(&bridge, &args.chat_id, &file, &cancel).await?;
            present(&config, &args.chat_id, &reply)?;
        }
        Command::Chat => chat(&config, &bridge, &args.chat_id, &cancel).await?,
    }

    Ok(())
}

async fn send_file(
    bridge: &ChatBridge<Client>,
    chat_id: &str,
    path: &Path,
    cancel: &CancellationToken,
) -> Result<Reply> {
    let input = input::from_file(path).await?;
    let reply = bridge.handle_input(chat_id, input, cancel).await?;
    Ok(reply)
}

async fn chat(
    config: &Config,
    bridge: &ChatBridge<Client>,
    chat_id: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line.context("Failed to read from stdin")?,
        };
        let Some(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = if line == "/quit" {
            break;
        } else if let Some(path) = line.strip_prefix("/send ") {
            send_file(bridge, chat_id, Path::new(path.trim()), cancel).await
        } else {
            bridge
                .handle_input(chat_id, Input::Text(line.to_string()), cancel)
                .await
                .map_err(Into::into)
        };

        match result {
            Ok(reply) => present(config, chat_id, &reply)?,
            Err(e) if cancel.is_cancelled() => {
                tracing::info!("Exchange cancelled: {:#}", e);
                break;
            }
            Err(e) => tracing::error!("Exchange failed: {:#}", e),
        }
    }

    Ok(())
}

fn present(config: &Config, chat_id: &str, reply: &Reply) -> Result<()> {
    match reply {
        Reply::Text(text) => println!("{text}"),
        Reply::Speech(speech) => {
            println!("> {}", speech.transcript());
            println!("{}", speech.text());
            let path = output::save_speech(&config.speech_output_dir, chat_id, speech)?;
            tracing::info!("Saved voiced reply to {}", path.display());
        }
    }
    Ok(())
}
