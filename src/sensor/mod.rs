//! Sensor sampling and state tracking.
//!
//! This module provides the core functionality for monitoring a single
//! binary sensor on a Raspberry Pi GPIO pin: reading the pin, detecting
//! transitions, publishing the current logical state, and mirroring it
//! onto the board's indicator LEDs.

pub mod config;
pub mod leds;
pub mod pin;
pub mod sampler;
pub mod state;

// Re-export commonly used items
pub use config::SensorConfig;
pub use leds::{Indicator, LedPattern, LedState, SysfsLeds};
pub use pin::{DefaultPinReader, PinReader};
pub use sampler::Sampler;
pub use state::{StateReading, StateStore};
