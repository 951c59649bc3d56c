//! Audio output
//!
//! The controller talks to the audio engine through [`AudioPlayer`], which
//! mirrors the four calls it needs: load a file, play it, fade it out, and
//! ask whether anything is still sounding.

#[cfg(feature = "playback")]
mod rodio_player;

#[cfg(feature = "playback")]
pub use rodio_player::RodioPlayer;

use std::path::Path;
use std::time::Duration;

/// Number of volume steps used for a fade-out
pub const FADE_STEPS: u32 = 20;

/// Playback engine driven by the controller
///
/// Commands are fire-and-forget: the controller never retries and learns
/// about the outcome only through [`AudioPlayer::is_busy`] on later ticks.
pub trait AudioPlayer {
    /// Prepare `path` for the next [`AudioPlayer::play`]
    fn load(&mut self, path: &Path) -> crate::Result<()>;

    /// Start the loaded file from the beginning
    fn play(&mut self) -> crate::Result<()>;

    /// Ramp the volume down over `duration`, then stop
    ///
    /// Does nothing when nothing is playing.
    fn fadeout(&mut self, duration: Duration);

    /// Whether audio is still sounding, including during a fade-out
    fn is_busy(&self) -> bool;
}

impl<P: AudioPlayer + ?Sized> AudioPlayer for Box<P> {
    fn load(&mut self, path: &Path) -> crate::Result<()> {
        (**self).load(path)
    }

    fn play(&mut self) -> crate::Result<()> {
        (**self).play()
    }

    fn fadeout(&mut self, duration: Duration) {
        (**self).fadeout(duration)
    }

    fn is_busy(&self) -> bool {
        (**self).is_busy()
    }
}

/// Volume for step `step` of a [`FADE_STEPS`]-step fade starting at `start`
pub fn fade_volume(start: f32, step: u32) -> f32 {
    let remaining = FADE_STEPS.saturating_sub(step) as f32 / FADE_STEPS as f32;
    start * remaining
}
