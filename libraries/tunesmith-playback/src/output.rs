//! Platform-agnostic media output
//!
//! The single audio device/element the player drives. Only the
//! [`Player`](crate::Player) calls into it; implementations report
//! readiness, progress, end of track and failures back through the
//! player's `on_*` methods, tagged with the generation given to
//! [`MediaOutput::load`].

use crate::error::Result;
use std::time::Duration;

/// Audio output owned by the player
pub trait MediaOutput: Send {
    /// Open a media URL, replacing whatever was loaded
    ///
    /// # Arguments
    /// * `media_url` - URL of the resolved media file
    /// * `generation` - Tag to attach to every callback about this media
    fn load(&mut self, media_url: &str, generation: u64) -> Result<()>;

    /// Start or resume
    fn play(&mut self) -> Result<()>;

    /// Pause, keeping the position
    fn pause(&mut self) -> Result<()>;

    /// Jump to an absolute position
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Stop and unload
    fn stop(&mut self) -> Result<()>;
}

/// Output that plays nothing
///
/// Accepts every command; useful headless and in tests.
#[derive(Debug, Default)]
pub struct NullOutput {
    loaded: Option<(String, u64)>,
}

impl NullOutput {
    /// Create a silent output
    pub fn new() -> Self {
        Self::default()
    }

    /// Last loaded URL and its generation
    pub fn loaded(&self) -> Option<(&str, u64)> {
        self.loaded.as_ref().map(|(url, g)| (url.as_str(), *g))
    }
}

impl MediaOutput for NullOutput {
    fn load(&mut self, media_url: &str, generation: u64) -> Result<()> {
        self.loaded = Some((media_url.to_string(), generation));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        Ok(())
    }

    fn seek(&mut self, _position: Duration) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.loaded = None;
        Ok(())
    }
}
