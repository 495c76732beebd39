//! Indicator LED output for Raspberry Pi onboard LEDs.
//!
//! The board's two status LEDs are driven through the sysfs LED class.
//! Each LED's kernel trigger is disabled once before first use so that
//! heartbeat/activity heuristics don't fight manual control.

use crate::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// The sysfs directories of the two indicator LEDs, in pattern order.
pub const LED_PATHS: [&str; 2] = ["/sys/class/leds/PWR", "/sys/class/leds/ACT"];

/// Desired level of a single indicator LED.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedState {
    /// LED is switched off
    Off,
    /// LED is switched on
    On,
}

impl LedState {
    /// The byte written to the LED's `brightness` file.
    pub fn as_sysfs(&self) -> &'static str {
        match self {
            LedState::Off => "0",
            LedState::On => "1",
        }
    }
}

/// A fixed two-LED output pattern, one [`LedState`] per LED path.
///
/// Parsed from a two-character string of `0`s and `1`s, e.g. `"10"`
/// lights the first LED and darkens the second.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedPattern([LedState; 2]);

impl LedPattern {
    /// Create a pattern directly from per-LED states.
    pub fn new(states: [LedState; 2]) -> Self {
        Self(states)
    }

    /// The per-LED states, index-aligned with [`LED_PATHS`].
    pub fn states(&self) -> &[LedState; 2] {
        &self.0
    }
}

impl FromStr for LedPattern {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return Err(MonitorError::config_error(format!(
                "invalid LED pattern {:?}: expected exactly 2 characters",
                s
            )));
        }

        let mut states = [LedState::Off; 2];
        for (slot, c) in states.iter_mut().zip(chars) {
            *slot = match c {
                '0' => LedState::Off,
                '1' => LedState::On,
                other => {
                    return Err(MonitorError::config_error(format!(
                        "invalid LED pattern {:?}: unexpected character {:?}",
                        s, other
                    )))
                }
            };
        }

        Ok(Self(states))
    }
}

/// Trait for indicator output devices.
pub trait Indicator: Send {
    /// Disable each LED's automatic kernel trigger. Called once before
    /// the first [`apply`](Indicator::apply).
    fn disable_triggers(&mut self) -> Result<()>;

    /// Write a pattern to the LEDs, one state per LED, in order.
    fn apply(&mut self, pattern: &LedPattern) -> Result<()>;
}

/// Indicator driver for the sysfs LED class.
pub struct SysfsLeds {
    leds: [PathBuf; 2],
}

impl SysfsLeds {
    /// Driver for the board's PWR and ACT LEDs.
    pub fn new() -> Self {
        Self::with_paths(LED_PATHS.map(PathBuf::from))
    }

    /// Driver over explicit LED directories.
    pub fn with_paths(leds: [PathBuf; 2]) -> Self {
        Self { leds }
    }
}

impl Default for SysfsLeds {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for SysfsLeds {
    fn disable_triggers(&mut self) -> Result<()> {
        for led in &self.leds {
            fs::write(led.join("trigger"), "none")?;
        }
        Ok(())
    }

    fn apply(&mut self, pattern: &LedPattern) -> Result<()> {
        for (led, state) in self.leds.iter().zip(pattern.states()) {
            fs::write(led.join("brightness"), state.as_sysfs())?;
        }
        Ok(())
    }
}
