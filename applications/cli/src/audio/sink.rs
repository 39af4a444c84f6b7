//! Building `rodio` sinks from downloaded media files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::error::{OutputError, Result};

/// Create a paused `Sink` for the file at `path`, starting at `start_at`.
///
/// Also returns the decoded duration when the format reports one.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>)> {
    let file = File::open(path).map_err(|source| OutputError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|source| OutputError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let duration = decoder.total_duration();

    // `skip_duration` is the seeking primitive; Duration::ZERO is a no-op
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, duration))
}
