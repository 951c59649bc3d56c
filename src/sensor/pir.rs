//! PIR sensor on a Raspberry Pi GPIO pin

use super::PresenceSensor;
use crate::SoundMotionError;
use rppal::gpio::{Gpio, InputPin, Level};

/// Passive infrared motion sensor
///
/// The sensor drives its output high while it sees movement.
pub struct PirSensor {
    pin: InputPin,
}

impl PirSensor {
    /// Claim BCM pin `bcm_pin` as an input
    pub fn new(bcm_pin: u8) -> crate::Result<Self> {
        let gpio = Gpio::new()
            .map_err(|e| SoundMotionError::Sensor(format!("Failed to open GPIO: {e}")))?;
        let pin = gpio
            .get(bcm_pin)
            .map_err(|e| SoundMotionError::Sensor(format!("Failed to claim pin {bcm_pin}: {e}")))?
            .into_input();
        Ok(Self { pin })
    }

    /// BCM number of the claimed pin
    pub fn pin(&self) -> u8 {
        self.pin.pin()
    }
}

impl PresenceSensor for PirSensor {
    fn listener_present(&mut self) -> bool {
        self.pin.read() == Level::High
    }
}
