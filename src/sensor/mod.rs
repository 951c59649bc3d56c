//! Motion sensor input
//!
//! The controller only needs one bit per tick: is somebody there? Read
//! failures are not modelled; a sensor always answers.

#[cfg(feature = "gpio")]
mod pir;

#[cfg(feature = "gpio")]
pub use pir::PirSensor;

use crate::config::Config;

/// Source of "listener detected" readings
pub trait PresenceSensor {
    /// Whether a listener is detected right now
    fn listener_present(&mut self) -> bool;
}

impl<S: PresenceSensor + ?Sized> PresenceSensor for Box<S> {
    fn listener_present(&mut self) -> bool {
        (**self).listener_present()
    }
}

/// Stand-in used when the sensor is switched off in the config
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSensor;

impl PresenceSensor for DisabledSensor {
    fn listener_present(&mut self) -> bool {
        false
    }
}

/// Sensor selected by the configuration
///
/// Returns the GPIO PIR sensor when `sensore_pir_attivo` is set and a
/// [`DisabledSensor`] otherwise.
pub fn from_config(config: &Config) -> crate::Result<Box<dyn PresenceSensor>> {
    if !config.sensor_enabled {
        tracing::warn!("PIR sensor disabled in config, playback will never start");
        return Ok(Box::new(DisabledSensor));
    }

    #[cfg(feature = "gpio")]
    {
        let sensor = PirSensor::new(config.sensor_pin)?;
        tracing::info!(pin = sensor.pin(), "PIR sensor ready");
        Ok(Box::new(sensor))
    }

    #[cfg(not(feature = "gpio"))]
    {
        Err(crate::SoundMotionError::Sensor(format!(
            "sensor on pin {} is enabled but this build lacks the \"gpio\" feature",
            config.sensor_pin
        )))
    }
}
