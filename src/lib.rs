//! Motion-triggered audio playback
//!
//! Polls a PIR motion sensor and drives playback of a single audio file:
//! music starts when a listener shows up after a quiet period and fades out
//! once nobody has moved for a while.
//!
//! # Features
//! - Tick-driven [`PresenceController`] with an injectable [`Clock`]
//! - INI configuration file parsing (`config`)
//! - PIR sensor input through Raspberry Pi GPIO (`sensor`)
//! - Audio file playback with fade-out (`playback`)
//!
//! # Crate feature flags
//! - `playback` (opt-in): Real audio output (enables optional `rodio` dep)
//! - `gpio` (opt-in): PIR sensor on a GPIO pin (enables optional `rppal` dep)
//! - `hardware` (opt-in): `playback` + `gpio`
//!
//! # Quick start
//! ```no_run
//! # #[cfg(all(feature = "playback", feature = "gpio"))]
//! # {
//! use std::path::Path;
//! use sound_motion::{sensor, Config, PresenceController, RodioPlayer, SystemClock};
//!
//! let base = Path::new("/mnt/samba/sound-motion");
//! let config = Config::load(&base.join("sound_motion.cfg"), base).unwrap();
//! let sensor = sensor::from_config(&config).unwrap();
//! let player = RodioPlayer::new().unwrap();
//! let mut controller = PresenceController::new(config.controller_settings(), SystemClock, sensor, player);
//! loop {
//!     controller.tick().unwrap();
//!     std::thread::sleep(config.tick_interval);
//! }
//! # }
//! ```

#![warn(missing_docs)]

pub mod clock; // Time source
pub mod config; // Configuration file
pub mod controller; // Play/stop state machine
pub mod playback; // Audio output
pub mod sensor; // Motion sensor input

/// Error types for sound-motion operations
#[derive(thiserror::Error, Debug)]
pub enum SoundMotionError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Audio file or audio device error
    #[error("Audio error: {0}")]
    Audio(String),

    /// GPIO or sensor setup error
    #[error("Sensor error: {0}")]
    Sensor(String),

    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sound-motion operations
pub type Result<T> = std::result::Result<T, SoundMotionError>;

// Public API exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use controller::{ControllerSettings, PresenceController, TickAction};
pub use playback::AudioPlayer;
#[cfg(feature = "playback")]
pub use playback::RodioPlayer;
#[cfg(feature = "gpio")]
pub use sensor::PirSensor;
pub use sensor::{DisabledSensor, PresenceSensor};
