//! Sensor configuration.

use crate::error::{MonitorError, Result};
use crate::sensor::leds::LedPattern;
use std::time::Duration;

/// Configuration for the sensor sampler.
#[derive(Debug, Clone)]
pub struct SensorConfig {
    /// BCM number of the input pin
    pub pin: u8,
    /// Delay between consecutive pin polls
    pub poll_interval: Duration,
    /// LED pattern applied when the sensor reads open, if any
    pub open_pattern: Option<LedPattern>,
    /// LED pattern applied when the sensor reads closed, if any
    pub closed_pattern: Option<LedPattern>,
    /// Label reported for the open state
    pub open_label: String,
    /// Label reported for the closed state
    pub closed_label: String,
}

impl SensorConfig {
    /// Create a configuration for the given pin with default labels,
    /// the default poll interval, and no LED mirroring.
    pub fn new(pin: u8) -> Self {
        Self {
            pin,
            poll_interval: Duration::from_secs_f64(crate::DEFAULT_POLL_INTERVAL_SECS),
            open_pattern: None,
            closed_pattern: None,
            open_label: "open".to_string(),
            closed_label: "closed".to_string(),
        }
    }

    /// Set the poll interval from a seconds value.
    ///
    /// Rejects non-positive and non-finite intervals.
    pub fn with_poll_interval_secs(mut self, secs: f64) -> Result<Self> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(MonitorError::config_error(format!(
                "invalid poll interval {}: must be a positive number of seconds",
                secs
            )));
        }
        self.poll_interval = Duration::from_secs_f64(secs);
        Ok(self)
    }

    /// Set the LED pattern for the open state.
    pub fn with_open_pattern(mut self, pattern: Option<LedPattern>) -> Self {
        self.open_pattern = pattern;
        self
    }

    /// Set the LED pattern for the closed state.
    pub fn with_closed_pattern(mut self, pattern: Option<LedPattern>) -> Self {
        self.closed_pattern = pattern;
        self
    }

    /// Set the display labels for the open and closed states.
    pub fn with_labels(mut self, open: impl Into<String>, closed: impl Into<String>) -> Self {
        self.open_label = open.into();
        self.closed_label = closed.into();
        self
    }

    /// Whether any LED pattern is configured.
    pub fn has_indicator(&self) -> bool {
        self.open_pattern.is_some() || self.closed_pattern.is_some()
    }
}
