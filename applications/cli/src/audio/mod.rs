//! Speaker output
//!
//! [`RodioOutput`] implements the player's `MediaOutput` by forwarding
//! commands to a dedicated audio thread that owns the `rodio` stream.
//! Media is downloaded from the service into a local cache before it is
//! decoded. Readiness, progress, end of track and failures come back as
//! [`OutputEvent`]s; [`forward_events`] feeds them into the player.

mod cache;
mod error;
mod sink;
mod thread;
mod types;

use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tunesmith_client::MediaServiceClient;
use tunesmith_playback::{MediaOutput, Player};

use cache::MediaCache;
use thread::{spawn_audio_thread, ThreadContext};
use types::AudioCmd;
pub use error::{OutputError, Result};
pub use types::OutputEvent;

pub struct RodioOutput {
    tx: Sender<AudioCmd>,
    thread: Option<JoinHandle<()>>,
}

impl RodioOutput {
    /// Open the default audio device
    ///
    /// Must be called inside a Tokio runtime; downloads run on it.
    pub fn open(
        client: MediaServiceClient,
        cache_dir: PathBuf,
        events: UnboundedSender<OutputEvent>,
    ) -> Result<Self> {
        let cache = MediaCache::create(cache_dir)?;

        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        let ctx = ThreadContext {
            client,
            cache,
            runtime: Handle::current(),
            events,
            commands: tx.clone(),
        };
        let thread = spawn_audio_thread(ctx, rx, ready_tx);

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                tx,
                thread: Some(thread),
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(OutputError::ThreadGone),
        }
    }

    fn send(&self, cmd: AudioCmd) -> tunesmith_playback::Result<()> {
        self.tx
            .send(cmd)
            .map_err(|_| OutputError::ThreadGone.into())
    }
}

impl MediaOutput for RodioOutput {
    fn load(&mut self, media_url: &str, generation: u64) -> tunesmith_playback::Result<()> {
        self.send(AudioCmd::Load {
            url: media_url.to_string(),
            generation,
        })
    }

    fn play(&mut self) -> tunesmith_playback::Result<()> {
        self.send(AudioCmd::Play)
    }

    fn pause(&mut self) -> tunesmith_playback::Result<()> {
        self.send(AudioCmd::Pause)
    }

    fn seek(&mut self, position: Duration) -> tunesmith_playback::Result<()> {
        self.send(AudioCmd::Seek(position))
    }

    fn stop(&mut self) -> tunesmith_playback::Result<()> {
        self.send(AudioCmd::Stop)
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        let _ = self.tx.send(AudioCmd::Quit);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Feed output reports into the player until the output goes away
pub async fn forward_events(player: Player, mut events: UnboundedReceiver<OutputEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            OutputEvent::Ready {
                generation,
                duration_seconds,
            } => player.on_media_ready(generation, duration_seconds).await,
            OutputEvent::Progress {
                generation,
                position_seconds,
            } => player.on_progress(generation, position_seconds).await,
            OutputEvent::Ended { generation } => player.on_track_ended(generation).await,
            OutputEvent::Failed {
                generation,
                message,
            } => player.on_media_error(generation, message).await,
        }
    }
}
