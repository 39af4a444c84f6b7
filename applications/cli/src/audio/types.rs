use std::path::PathBuf;
use std::time::Duration;

/// Commands handled by the audio thread
#[derive(Debug)]
pub(super) enum AudioCmd {
    Load { url: String, generation: u64 },
    Fetched { generation: u64, path: PathBuf },
    FetchFailed { generation: u64, message: String },
    Play,
    Pause,
    Seek(Duration),
    Stop,
    Quit,
}

/// Reports from the audio thread, tagged with the load generation
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    Ready {
        generation: u64,
        duration_seconds: Option<f64>,
    },
    Progress {
        generation: u64,
        position_seconds: f64,
    },
    Ended {
        generation: u64,
    },
    Failed {
        generation: u64,
        message: String,
    },
}
