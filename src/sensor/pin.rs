//! GPIO input pin access for the sensor line.
//!
//! Feature-gated so the crate compiles on non-Raspberry Pi systems:
//! with the `gpio` feature the pin is claimed through rppal, without it
//! a mock that refuses to open is used instead.

use crate::error::Result;

/// Trait for reading the sensor's digital input line.
pub trait PinReader: Send {
    /// Read the current level. `true` means the switch is closed
    /// (line pulled to ground against the internal pull-up).
    fn read(&mut self) -> Result<bool>;
}

#[cfg(feature = "gpio")]
mod raspberry_pi {
    use super::*;
    use crate::error::MonitorError;
    use rppal::gpio::{Gpio, InputPin};

    /// Raspberry Pi input pin using rppal.
    pub struct RppalPinReader {
        pin: InputPin,
    }

    impl RppalPinReader {
        /// Claim the given BCM pin as an input with the internal pull-up.
        pub fn open(pin: u8) -> Result<Self> {
            let gpio = Gpio::new().map_err(|e| {
                MonitorError::hardware_init_error(format!("failed to initialize GPIO: {}", e))
            })?;

            let pin = gpio
                .get(pin)
                .map_err(|e| {
                    MonitorError::hardware_init_error(format!(
                        "failed to claim pin {}: {}",
                        pin, e
                    ))
                })?
                .into_input_pullup();

            Ok(Self { pin })
        }
    }

    impl PinReader for RppalPinReader {
        fn read(&mut self) -> Result<bool> {
            // Pull-up wiring: a closed switch shorts the line low.
            Ok(self.pin.is_low())
        }
    }
}

#[cfg(not(feature = "gpio"))]
mod mock {
    use super::*;
    use crate::error::MonitorError;

    /// Mock pin for systems without GPIO support.
    pub struct MockPinReader;

    impl MockPinReader {
        pub fn open(pin: u8) -> Result<Self> {
            Err(MonitorError::hardware_init_error(format!(
                "GPIO not available on this system (attempted to open pin {})",
                pin
            )))
        }
    }

    impl PinReader for MockPinReader {
        fn read(&mut self) -> Result<bool> {
            Err(MonitorError::hardware_error(
                "GPIO not available on this system",
            ))
        }
    }
}

// Re-export the appropriate pin reader
#[cfg(feature = "gpio")]
pub use raspberry_pi::RppalPinReader as DefaultPinReader;

#[cfg(not(feature = "gpio"))]
pub use mock::MockPinReader as DefaultPinReader;

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "gpio"))]
    #[test]
    fn test_mock_pin_refuses_to_open() {
        assert!(DefaultPinReader::open(17).is_err());
    }
}
