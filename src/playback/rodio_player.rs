//! Playback through the default output device using rodio

use super::{fade_volume, AudioPlayer, FADE_STEPS};
use crate::SoundMotionError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Audio player backed by a rodio output stream
///
/// Every [`AudioPlayer::play`] gets a fresh [`Sink`]; a fade-out runs on a
/// short-lived thread that owns a clone of the sink and stops it at the end.
pub struct RodioPlayer {
    /// The stream must be kept alive for `handle` to remain valid.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    loaded: Option<(PathBuf, Decoder<BufReader<File>>)>,
    sink: Option<Arc<Sink>>,
}

impl RodioPlayer {
    /// Open the system's default output device
    pub fn new() -> crate::Result<Self> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| {
            SoundMotionError::Audio(format!("Failed to open audio output: {e}"))
        })?;

        Ok(Self {
            _stream: stream,
            handle,
            loaded: None,
            sink: None,
        })
    }
}

impl AudioPlayer for RodioPlayer {
    fn load(&mut self, path: &Path) -> crate::Result<()> {
        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| {
            SoundMotionError::Audio(format!("Failed to decode {}: {e}", path.display()))
        })?;
        self.loaded = Some((path.to_path_buf(), source));
        Ok(())
    }

    fn play(&mut self) -> crate::Result<()> {
        let (path, source) = self
            .loaded
            .take()
            .ok_or_else(|| SoundMotionError::Audio("play requested before load".into()))?;

        if let Some(previous) = self.sink.take() {
            previous.stop();
        }

        let sink = Sink::try_new(&self.handle)
            .map_err(|e| SoundMotionError::Audio(format!("Failed to create sink: {e}")))?;
        sink.append(source);
        tracing::debug!(file = %path.display(), "sink started");

        self.sink = Some(Arc::new(sink));
        Ok(())
    }

    fn fadeout(&mut self, duration: Duration) {
        let Some(sink) = self.sink.as_ref().filter(|sink| !sink.empty()) else {
            return;
        };

        if duration.is_zero() {
            sink.stop();
            return;
        }

        let sink = Arc::clone(sink);
        let step = duration / FADE_STEPS;
        thread::spawn(move || {
            let start = sink.volume();
            for i in 1..=FADE_STEPS {
                thread::sleep(step);
                sink.set_volume(fade_volume(start, i));
            }
            sink.stop();
        });
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }
}
