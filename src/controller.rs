//! Presence-driven playback controller
//!
//! One [`PresenceController::tick`] per polling interval. Each tick reads the
//! player's busy flag and the sensor once, then:
//!
//! - **playing**: remembers the tick as the latest moment audio was heard,
//!   resets the motion timer when a listener is present, and fades out once
//!   the time since the last motion exceeds the silence threshold;
//! - **stopped**: starts the file when a listener is present and the pause
//!   threshold has passed since playback last ended, otherwise keeps the
//!   motion timer fresh so the next start is not judged silent right away.
//!
//! All time comes from the injected [`Clock`].

use crate::clock::Clock;
use crate::playback::AudioPlayer;
use crate::sensor::PresenceSensor;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Thresholds and asset used by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    /// File loaded on every start
    pub audio_file: PathBuf,
    /// Longest stretch without motion before playback is faded out
    pub max_silence: Duration,
    /// Shortest gap between the end of playback and a restart
    pub restart_pause: Duration,
    /// Fade-out length passed to the player
    pub fade_out: Duration,
}

/// Outcome of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Listener detected after the pause; file loaded and started
    Started,
    /// Silence threshold exceeded; fade-out issued
    FadingOut,
    /// Audio is sounding (possibly still fading from an earlier tick)
    Playing {
        /// Time since the last detected motion
        silent_for: Duration,
    },
    /// Listener detected but the pause after the last playback is not over
    CoolingDown {
        /// Time left before a start is allowed
        remaining: Duration,
    },
    /// Nothing playing and nobody around
    Idle,
}

impl TickAction {
    /// Whether this tick sent a start or stop command to the player
    pub fn issued_command(&self) -> bool {
        matches!(self, TickAction::Started | TickAction::FadingOut)
    }
}

/// Play/stop state machine over a clock, a sensor and a player
pub struct PresenceController<C, S, P> {
    settings: ControllerSettings,
    clock: C,
    sensor: S,
    player: P,
    /// Last tick with a detected listener
    last_motion: Instant,
    /// Latest known moment audio was sounding; `None` before the first start
    last_stop: Option<Instant>,
    /// Fade-out already issued for the current silence episode
    fade_requested: bool,
}

impl<C: Clock, S: PresenceSensor, P: AudioPlayer> PresenceController<C, S, P> {
    /// Create a controller; the motion timer starts at the current instant
    pub fn new(settings: ControllerSettings, clock: C, sensor: S, player: P) -> Self {
        let now = clock.now();
        Self {
            settings,
            clock,
            sensor,
            player,
            last_motion: now,
            last_stop: None,
            fade_requested: false,
        }
    }

    /// Advance the state machine by one polling step
    ///
    /// Errors from loading or starting the file are returned as-is; nothing
    /// is retried.
    pub fn tick(&mut self) -> crate::Result<TickAction> {
        let now = self.clock.now();
        let playing = self.player.is_busy();
        let listener = self.sensor.listener_present();

        let action = if playing {
            self.tick_playing(now, listener)
        } else {
            self.tick_stopped(now, listener)?
        };

        tracing::debug!(playing, listener, ?action, "tick");
        Ok(action)
    }

    fn tick_playing(&mut self, now: Instant, listener: bool) -> TickAction {
        self.mark_sounding(now);
        if listener {
            self.last_motion = now;
        }

        let silent_for = now.saturating_duration_since(self.last_motion);
        if silent_for <= self.settings.max_silence || self.fade_requested {
            return TickAction::Playing { silent_for };
        }

        tracing::info!(
            silent_secs = silent_for.as_secs_f32(),
            "no motion detected, fading out"
        );
        self.player.fadeout(self.settings.fade_out);
        self.fade_requested = true;
        // The pause starts once the fade has run its course
        self.mark_sounding(now + self.settings.fade_out);
        TickAction::FadingOut
    }

    fn tick_stopped(&mut self, now: Instant, listener: bool) -> crate::Result<TickAction> {
        self.fade_requested = false;
        if !listener {
            return Ok(TickAction::Idle);
        }
        self.last_motion = now;

        if let Some(stopped_at) = self.last_stop {
            let since_stop = now.saturating_duration_since(stopped_at);
            if since_stop <= self.settings.restart_pause {
                return Ok(TickAction::CoolingDown {
                    remaining: self.settings.restart_pause - since_stop,
                });
            }
        }

        tracing::info!(
            file = %self.settings.audio_file.display(),
            "listener detected, starting playback"
        );
        self.player.load(&self.settings.audio_file)?;
        self.player.play()?;
        // A track that ends before the next tick still counts as played
        self.mark_sounding(now);
        Ok(TickAction::Started)
    }

    fn mark_sounding(&mut self, at: Instant) {
        self.last_stop = Some(self.last_stop.map_or(at, |prev| prev.max(at)));
    }

    /// Settings the controller was built with
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Instant of the last detected motion
    pub fn last_motion(&self) -> Instant {
        self.last_motion
    }

    /// Latest known moment audio was sounding, if it ever played
    pub fn last_stop(&self) -> Option<Instant> {
        self.last_stop
    }

    /// Injected clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Injected sensor
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Injected player
    pub fn player(&self) -> &P {
        &self.player
    }

    /// Injected player, mutably
    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }
}
