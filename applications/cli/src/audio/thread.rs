use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use tunesmith_client::MediaServiceClient;

use super::cache::MediaCache;
use super::error::OutputError;
use super::sink::create_sink_at;
use super::types::{AudioCmd, OutputEvent};

/// How often the thread checks for end of track
const TICK: Duration = Duration::from_millis(250);

/// How often a position update is reported
const PROGRESS_EVERY: Duration = Duration::from_secs(1);

/// Everything the audio thread needs besides the device
pub(super) struct ThreadContext {
    pub client: MediaServiceClient,
    pub cache: MediaCache,
    pub runtime: Handle,
    pub events: UnboundedSender<OutputEvent>,
    pub commands: Sender<AudioCmd>,
}

/// Media the thread is working on
struct Current {
    generation: u64,
    path: Option<PathBuf>,
    sink: Option<Sink>,
    want_play: bool,
    started_at: Option<Instant>,
    accumulated: Duration,
    last_progress: Instant,
}

impl Current {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            path: None,
            sink: None,
            want_play: false,
            started_at: None,
            accumulated: Duration::ZERO,
            last_progress: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn start(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
            if self.started_at.is_none() {
                self.started_at = Some(Instant::now());
            }
        }
    }

    fn halt(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }
}

impl Drop for Current {
    fn drop(&mut self) {
        if let Some(sink) = &self.sink {
            sink.stop();
        }
    }
}

/// Spawn the audio thread
///
/// The output stream is opened on the thread itself; the result of opening
/// it is reported once through `ready`.
pub(super) fn spawn_audio_thread(
    ctx: ThreadContext,
    rx: Receiver<AudioCmd>,
    ready: SyncSender<Result<(), OutputError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready.send(Err(OutputError::Device(e)));
                return;
            }
        };
        // rodio logs to stderr when the stream is dropped
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut current: Option<Current> = None;

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Load { url, generation }) => {
                    current = Some(Current::new(generation));
                    fetch(&ctx, url, generation);
                }

                Ok(AudioCmd::Fetched { generation, path }) => {
                    let Some(cur) = current.as_mut().filter(|c| c.generation == generation) else {
                        debug!(generation, "Dropping media for a replaced load");
                        continue;
                    };
                    match create_sink_at(&stream, &path, Duration::ZERO) {
                        Ok((sink, duration)) => {
                            cur.sink = Some(sink);
                            cur.path = Some(path);
                            let _ = ctx.events.send(OutputEvent::Ready {
                                generation,
                                duration_seconds: duration.map(|d| d.as_secs_f64()),
                            });
                            if cur.want_play {
                                cur.start();
                            }
                        }
                        Err(e) => {
                            if matches!(e, OutputError::Decode { .. }) {
                                ctx.cache.evict(&path);
                            }
                            let _ = ctx.events.send(OutputEvent::Failed {
                                generation,
                                message: e.to_string(),
                            });
                        }
                    }
                }

                Ok(AudioCmd::FetchFailed {
                    generation,
                    message,
                }) => {
                    if current.as_ref().is_some_and(|c| c.generation == generation) {
                        current = None;
                        let _ = ctx.events.send(OutputEvent::Failed {
                            generation,
                            message,
                        });
                    }
                }

                Ok(AudioCmd::Play) => {
                    if let Some(cur) = current.as_mut() {
                        cur.want_play = true;
                        cur.start();
                    }
                }

                Ok(AudioCmd::Pause) => {
                    if let Some(cur) = current.as_mut() {
                        cur.want_play = false;
                        cur.halt();
                    }
                }

                Ok(AudioCmd::Seek(position)) => {
                    let Some(cur) = current.as_mut() else {
                        continue;
                    };
                    let Some(path) = cur.path.clone() else {
                        continue;
                    };
                    // Rebuild the sink and skip into the file
                    match create_sink_at(&stream, &path, position) {
                        Ok((sink, _)) => {
                            if let Some(old) = cur.sink.replace(sink) {
                                old.stop();
                            }
                            cur.accumulated = position;
                            cur.started_at = None;
                            if cur.want_play {
                                cur.start();
                            }
                        }
                        Err(e) => {
                            let _ = ctx.events.send(OutputEvent::Failed {
                                generation: cur.generation,
                                message: e.to_string(),
                            });
                        }
                    }
                }

                Ok(AudioCmd::Stop) => {
                    current = None;
                }

                Ok(AudioCmd::Quit) | Err(RecvTimeoutError::Disconnected) => break,

                Err(RecvTimeoutError::Timeout) => {
                    let Some(cur) = current.as_mut() else {
                        continue;
                    };
                    let Some(sink) = &cur.sink else {
                        continue;
                    };
                    if cur.started_at.is_none() {
                        continue;
                    }

                    if sink.empty() {
                        let generation = cur.generation;
                        current = None;
                        let _ = ctx.events.send(OutputEvent::Ended { generation });
                    } else if cur.last_progress.elapsed() >= PROGRESS_EVERY {
                        cur.last_progress = Instant::now();
                        let _ = ctx.events.send(OutputEvent::Progress {
                            generation: cur.generation,
                            position_seconds: cur.elapsed().as_secs_f64(),
                        });
                    }
                }
            }
        }
    })
}

/// Download `url` into the cache on the runtime, reporting back as a command
fn fetch(ctx: &ThreadContext, url: String, generation: u64) {
    if let Some(path) = ctx.cache.cached(&url) {
        debug!(path = %path.display(), "Media cache hit");
        let _ = ctx.commands.send(AudioCmd::Fetched { generation, path });
        return;
    }

    let client = ctx.client.clone();
    let cache = ctx.cache.clone();
    let commands = ctx.commands.clone();
    ctx.runtime.spawn(async move {
        let cmd = match cache.fetch(&client, &url).await {
            Ok(path) => AudioCmd::Fetched { generation, path },
            Err(e) => {
                warn!(url = %url, error = %e, "Media download failed");
                AudioCmd::FetchFailed {
                    generation,
                    message: e.to_string(),
                }
            }
        };
        let _ = commands.send(cmd);
    });
}
