//! # Doorwatch - Raspberry Pi Door Sensor Monitor
//!
//! A small Rust crate for monitoring a door reed switch on a Raspberry Pi
//! GPIO pin, mirroring the state onto the board's indicator LEDs, and
//! serving it over a minimal web interface.
//!
//! ## Features
//!
//! - **Continuous sampling**: a dedicated thread polls the pin and records
//!   every transition with a timestamp
//! - **LED mirroring**: optional per-state patterns written to the PWR/ACT
//!   LEDs via sysfs
//! - **Web interface**: `/json` and `/prometheus` endpoints, always 200
//! - **Crash over staleness**: a sampler fault aborts the process rather
//!   than serving a state it can no longer verify
//! - **Cross-compilation**: GPIO access is feature-gated, so the crate
//!   builds on non-Pi systems
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doorwatch::{start_web_server, Sampler, SensorConfig, StateStore, WebConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SensorConfig::new(17);
//!     let store = Arc::new(StateStore::new(&config));
//!
//!     let _sampler = Sampler::spawn(config, store.clone())?;
//!
//!     // Serve state on port 8080 until ctrl-c
//!     start_web_server(WebConfig::default(), store).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod sensor;
pub mod web;

// Re-export public API
pub use error::{MonitorError, Result};
pub use sensor::{
    config::SensorConfig,
    leds::{Indicator, LedPattern, LedState, SysfsLeds},
    pin::{DefaultPinReader, PinReader},
    sampler::Sampler,
    state::{StateReading, StateStore},
};
pub use web::{start_web_server, WebConfig};

/// The default poll interval in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: f64 = 1.0;

/// The default web server port
pub const DEFAULT_WEB_PORT: u16 = 8080;
