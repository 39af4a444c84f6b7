//! Tunesmith - chat your way to a playlist, then play it

mod app;
mod audio;
mod config;
mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tunesmith_assistant::{Assistant, ChatSession, GeminiClient, GeminiConfig};
use tunesmith_client::{MediaServiceClient, ServiceConfig};
use tunesmith_core::KeyValueStore;
use tunesmith_playback::{MediaOutput, NullOutput, PlaybackConfig, Player};
use tunesmith_storage::{MemoryStore, PlaylistLibrary, SqliteStore};

use crate::app::App;
use crate::audio::RodioOutput;
use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "tunesmith")]
#[command(about = "Chat-driven playlist maker and player", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path (default: ./tunesmith.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Media service URL, overrides the configuration
    #[arg(long, env = "TUNESMITH_SERVICE_URL")]
    service_url: Option<String>,

    /// Language model API key, overrides the configuration
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Play nothing; useful without an audio device
    #[arg(long)]
    silent: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tunesmith=info,tunesmith_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.service_url {
        config.service.base_url = url;
    }
    if cli.api_key.is_some() {
        config.assistant.api_key = cli.api_key;
    }
    config.validate()?;

    tracing::info!(service = %config.service.base_url, "Starting Tunesmith");

    let client = MediaServiceClient::new(
        ServiceConfig::new(config.service.base_url.clone())
            .with_timeout(config.request_timeout())
            .with_media_path(config.service.media_path.clone()),
    )
    .context("Failed to create media service client")?;

    let library = PlaylistLibrary::load(open_store(&config).await).await;

    if config.assistant.api_key.is_none() {
        tracing::warn!("No assistant API key configured, playlists will be placeholders");
    }
    let model = GeminiClient::new(GeminiConfig {
        api_key: config.assistant.api_key.clone(),
        model: config.assistant.model.clone(),
        base_url: config.assistant.base_url.clone(),
        ..GeminiConfig::default()
    })
    .context("Failed to create language model client")?;
    let chat = ChatSession::new(Assistant::new(Arc::new(model)));

    let (output_tx, output_rx) = mpsc::unbounded_channel();
    let output: Box<dyn MediaOutput> = if cli.silent {
        Box::new(NullOutput::new())
    } else {
        match RodioOutput::open(
            client.clone(),
            config.storage.media_cache_dir.clone(),
            output_tx,
        ) {
            Ok(output) => Box::new(output),
            Err(e) => {
                tracing::warn!(error = %e, "No audio output, continuing silently");
                Box::new(NullOutput::new())
            }
        }
    };

    let player = Player::new(
        Arc::new(client),
        output,
        PlaybackConfig {
            resolve_timeout: config.resolve_timeout(),
            ..PlaybackConfig::default()
        },
    );
    tokio::spawn(audio::forward_events(player.clone(), output_rx));
    tokio::spawn(print_events(player.subscribe()));

    let mut app = App::new(player, chat, library);
    println!("{}", tunesmith_assistant::GREETING);
    app.restore().await;

    run(&mut app).await
}

async fn run(app: &mut App) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read input")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        match repl::parse(&line) {
            None => {}
            Some(Err(e)) => println!("{}", e),
            Some(Ok(command)) => {
                if !app.handle(command).await {
                    break;
                }
            }
        }
    }

    tracing::info!("Goodbye");
    Ok(())
}

/// SQLite store, or an in-memory one when the database cannot be opened
async fn open_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    match SqliteStore::open(&config.storage.database_path).await {
        Ok(store) => {
            tracing::info!(path = %config.storage.database_path.display(), "Database opened");
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %config.storage.database_path.display(),
                "Database unavailable, playlists will not be saved"
            );
            Arc::new(MemoryStore::new())
        }
    }
}

async fn print_events(mut events: broadcast::Receiver<tunesmith_playback::PlaybackEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Some(line) = app::describe(&event) {
                    println!("{}", line);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Event printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
