//! Installation configuration
//!
//! Loaded once at startup from an INI file such as:
//!
//! ```text
//! [General]
//! file_da_riprodurre = music.mp3
//!
//! [Sensor Parameters]
//! sensore_pir_attivo = true
//! tempo_massimo_senza_movimenti_sec = 60
//! tempo_pausa_dopo_riproduzione_sec = 120
//! ```
//!
//! The Italian section names used by older installations (`Generale`,
//! `Parametri Sensori`) are accepted as well.

pub mod ini;

use crate::controller::ControllerSettings;
use ini::IniDocument;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory holding the config file and the audio asset on the device
pub const DEFAULT_BASE_DIR: &str = "/mnt/samba/sound-motion";

/// Config file name inside the base directory
pub const DEFAULT_CONFIG_FILE: &str = "sound_motion.cfg";

/// Accepted names for the general section, preferred first
pub const GENERAL_SECTIONS: [&str; 2] = ["General", "Generale"];

/// Accepted names for the sensor section, preferred first
pub const SENSOR_SECTIONS: [&str; 2] = ["Sensor Parameters", "Parametri Sensori"];

/// Audio file to play, relative to the base directory
pub const KEY_AUDIO_FILE: &str = "file_da_riprodurre";
/// Whether the PIR sensor is read at all
pub const KEY_SENSOR_ENABLED: &str = "sensore_pir_attivo";
/// Seconds without motion before playback is faded out
pub const KEY_MAX_SILENCE: &str = "tempo_massimo_senza_movimenti_sec";
/// Seconds after playback ends before it may start again
pub const KEY_RESTART_PAUSE: &str = "tempo_pausa_dopo_riproduzione_sec";
/// BCM pin number of the PIR sensor
pub const KEY_SENSOR_PIN: &str = "pin_sensore_pir";
/// Polling interval in milliseconds
pub const KEY_TICK_INTERVAL: &str = "intervallo_controllo_ms";
/// Fade-out length in milliseconds
pub const KEY_FADE_OUT: &str = "durata_dissolvenza_ms";

/// Default BCM pin of the PIR sensor
pub const DEFAULT_SENSOR_PIN: u8 = 4;
/// Default polling interval (1.5 s)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1500;
/// Default fade-out length (1 s)
pub const DEFAULT_FADE_OUT_MS: u64 = 1000;

/// Configuration loading errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Line is neither a section, an entry nor a comment
    #[error("line {line}: cannot parse `{content}`")]
    Syntax {
        /// 1-based line number
        line: usize,
        /// Offending line, trimmed
        content: String,
    },

    /// `key = value` line before the first `[section]`
    #[error("line {line}: entry appears before any [section] header")]
    EntryOutsideSection {
        /// 1-based line number
        line: usize,
    },

    /// Required section not present
    #[error("missing section [{section}]")]
    MissingSection {
        /// Section name
        section: String,
    },

    /// Required key not present
    #[error("missing key `{key}` in section [{section}]")]
    MissingKey {
        /// Section name
        section: String,
        /// Key name
        key: String,
    },

    /// Value present but not usable
    #[error("invalid value `{value}` for `{key}` in section [{section}]: expected {expected}")]
    InvalidValue {
        /// Section name
        section: String,
        /// Key name
        key: String,
        /// Raw value
        value: String,
        /// What was expected instead
        expected: &'static str,
    },

    /// Configured audio file does not exist
    #[error("audio file not found: {}", .0.display())]
    AudioFileNotFound(PathBuf),
}

/// Immutable settings for one installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Audio file to play (resolved against the base directory)
    pub audio_file: PathBuf,
    /// Read the PIR sensor; when false no listener is ever detected
    pub sensor_enabled: bool,
    /// BCM pin of the PIR sensor
    pub sensor_pin: u8,
    /// Silence threshold: longest stretch without motion while playing
    pub max_silence: Duration,
    /// Pause threshold: shortest gap between end of playback and a restart
    pub restart_pause: Duration,
    /// Time between two controller ticks
    pub tick_interval: Duration,
    /// Length of the fade-out when playback is stopped
    pub fade_out: Duration,
}

impl Config {
    /// Read and validate the config file
    ///
    /// Relative audio paths are resolved against `base_dir`, and the audio
    /// file must exist.
    pub fn load(config_path: &Path, base_dir: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
            path: config_path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ini(&IniDocument::parse(&text)?, base_dir)?;

        if !config.audio_file.is_file() {
            return Err(ConfigError::AudioFileNotFound(config.audio_file));
        }
        Ok(config)
    }

    /// Build the configuration from an already parsed document
    ///
    /// Does not touch the filesystem.
    pub fn from_ini(doc: &IniDocument, base_dir: &Path) -> Result<Self, ConfigError> {
        let general = resolve_section(doc, &GENERAL_SECTIONS)?;
        let sensor = resolve_section(doc, &SENSOR_SECTIONS)?;

        let audio_value = doc.require(general, KEY_AUDIO_FILE)?;
        if audio_value.is_empty() {
            return Err(ConfigError::InvalidValue {
                section: general.to_string(),
                key: KEY_AUDIO_FILE.to_string(),
                value: String::new(),
                expected: "a file path",
            });
        }

        let tick_ms = doc
            .get_number::<u64>(sensor, KEY_TICK_INTERVAL)?
            .unwrap_or(DEFAULT_TICK_INTERVAL_MS);
        if tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                section: sensor.to_string(),
                key: KEY_TICK_INTERVAL.to_string(),
                value: tick_ms.to_string(),
                expected: "a positive number of milliseconds",
            });
        }

        Ok(Config {
            audio_file: base_dir.join(audio_value),
            sensor_enabled: doc.require_bool(sensor, KEY_SENSOR_ENABLED)?,
            sensor_pin: doc
                .get_number(sensor, KEY_SENSOR_PIN)?
                .unwrap_or(DEFAULT_SENSOR_PIN),
            max_silence: Duration::from_secs(doc.require_number(sensor, KEY_MAX_SILENCE)?),
            restart_pause: Duration::from_secs(doc.require_number(sensor, KEY_RESTART_PAUSE)?),
            tick_interval: Duration::from_millis(tick_ms),
            fade_out: Duration::from_millis(
                doc.get_number(sensor, KEY_FADE_OUT)?
                    .unwrap_or(DEFAULT_FADE_OUT_MS),
            ),
        })
    }

    /// Controller thresholds derived from this configuration
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            audio_file: self.audio_file.clone(),
            max_silence: self.max_silence,
            restart_pause: self.restart_pause,
            fade_out: self.fade_out,
        }
    }
}

/// First of `names` present in the document
fn resolve_section<'a>(doc: &IniDocument, names: &[&'a str]) -> Result<&'a str, ConfigError> {
    names
        .iter()
        .copied()
        .find(|name| doc.has_section(name))
        .ok_or_else(|| ConfigError::MissingSection {
            section: names[0].to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ENGLISH: &str = "\
[General]
file_da_riprodurre = track.mp3

[Sensor Parameters]
sensore_pir_attivo = true
tempo_massimo_senza_movimenti_sec = 60
tempo_pausa_dopo_riproduzione_sec = 120
";

    fn parse(text: &str, base: &Path) -> Result<Config, ConfigError> {
        Config::from_ini(&IniDocument::parse(text).unwrap(), base)
    }

    #[test]
    fn test_required_keys_and_defaults() {
        let config = parse(ENGLISH, Path::new("/srv/sound")).unwrap();
        assert_eq!(config.audio_file, PathBuf::from("/srv/sound/track.mp3"));
        assert!(config.sensor_enabled);
        assert_eq!(config.max_silence, Duration::from_secs(60));
        assert_eq!(config.restart_pause, Duration::from_secs(120));
        assert_eq!(config.sensor_pin, DEFAULT_SENSOR_PIN);
        assert_eq!(config.tick_interval, Duration::from_millis(1500));
        assert_eq!(config.fade_out, Duration::from_millis(1000));
    }

    #[test]
    fn test_italian_sections_and_optional_keys() {
        let text = "\
[Generale]
file_da_riprodurre = /music/brano.ogg
[Parametri Sensori]
sensore_pir_attivo = no
tempo_massimo_senza_movimenti_sec = 5
tempo_pausa_dopo_riproduzione_sec = 0
pin_sensore_pir = 17
intervallo_controllo_ms = 250
durata_dissolvenza_ms = 0
";
        let config = parse(text, Path::new("/srv/sound")).unwrap();
        // Absolute audio paths are kept as-is
        assert_eq!(config.audio_file, PathBuf::from("/music/brano.ogg"));
        assert!(!config.sensor_enabled);
        assert_eq!(config.sensor_pin, 17);
        assert_eq!(config.restart_pause, Duration::ZERO);
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert_eq!(config.fade_out, Duration::ZERO);
    }

    #[test]
    fn test_trailing_comments_on_values() {
        let text = ENGLISH
            .replace("track.mp3", "track.mp3 ; main track")
            .replace("= true", "= true ; PIR")
            .replace("= 60", "= 60  # one minute");
        let config = parse(&text, Path::new("/srv/sound")).unwrap();
        assert_eq!(config.audio_file, PathBuf::from("/srv/sound/track.mp3"));
        assert!(config.sensor_enabled);
        assert_eq!(config.max_silence, Duration::from_secs(60));
    }

    #[test]
    fn test_missing_section_names_preferred_spelling() {
        let err = parse("[General]\nfile_da_riprodurre = a.mp3\n", Path::new("/")).unwrap_err();
        match err {
            ConfigError::MissingSection { section } => assert_eq!(section, "Sensor Parameters"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_threshold_is_reported() {
        let text = ENGLISH.replace("tempo_pausa_dopo_riproduzione_sec = 120\n", "");
        let err = parse(&text, Path::new("/")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { key, .. } if key == KEY_RESTART_PAUSE));
    }

    #[test]
    fn test_rejects_negative_threshold_and_zero_interval() {
        let text = ENGLISH.replace("= 60", "= -5");
        assert!(matches!(
            parse(&text, Path::new("/")),
            Err(ConfigError::InvalidValue { .. })
        ));

        let text = format!("{ENGLISH}intervallo_controllo_ms = 0\n");
        assert!(matches!(
            parse(&text, Path::new("/")),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_audio_path() {
        let text = ENGLISH.replace("track.mp3", "");
        assert!(matches!(
            parse(&text, Path::new("/")),
            Err(ConfigError::InvalidValue { expected: "a file path", .. })
        ));
    }

    #[test]
    fn test_load_checks_audio_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(DEFAULT_CONFIG_FILE);
        let mut file = fs::File::create(&config_path).unwrap();
        file.write_all(ENGLISH.as_bytes()).unwrap();

        let err = Config::load(&config_path, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::AudioFileNotFound(_)));

        fs::write(dir.path().join("track.mp3"), b"ID3").unwrap();
        let config = Config::load(&config_path, dir.path()).unwrap();
        assert_eq!(config.audio_file, dir.path().join("track.mp3"));
    }

    #[test]
    fn test_load_reports_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.cfg"), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.cfg"));
    }

    #[test]
    fn test_controller_settings_carry_thresholds() {
        let config = parse(ENGLISH, Path::new("/srv")).unwrap();
        let settings = config.controller_settings();
        assert_eq!(settings.audio_file, config.audio_file);
        assert_eq!(settings.max_silence, config.max_silence);
        assert_eq!(settings.restart_pause, config.restart_pause);
        assert_eq!(settings.fade_out, config.fade_out);
    }
}
