//! The shared state store: the single source of truth for the sensor's
//! logical state.
//!
//! Mutation is confined to the sampler thread; HTTP handlers only ever
//! call [`StateStore::read`]. The record mutex is held just long enough
//! to swap or copy the record, and LED writes happen outside it so
//! readers never wait on hardware latency.

use crate::error::Result;
use crate::sensor::config::SensorConfig;
use crate::sensor::leds::{Indicator, LedPattern, SysfsLeds};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// The last observed transition: raw level plus the time it was seen.
/// Both fields are unset until the first sample.
#[derive(Debug, Clone, Copy, Default)]
struct TransitionRecord {
    raw: Option<bool>,
    last_transition: Option<f64>,
}

/// A copy of the current state as exposed to readers: the mapped label
/// and the unix timestamp of the last transition, both `None` before
/// the first sample.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateReading {
    /// Current logical state label, if any sample has been taken
    pub state: Option<String>,
    /// Unix timestamp (seconds) of the last transition
    pub ts: Option<f64>,
}

/// Shared cell holding the sensor's current logical state.
pub struct StateStore {
    open_label: String,
    closed_label: String,
    open_pattern: Option<LedPattern>,
    closed_pattern: Option<LedPattern>,
    record: Mutex<TransitionRecord>,
    // Only ever locked by the sampler thread, so readers never contend
    // with LED I/O.
    indicator: Mutex<Box<dyn Indicator>>,
}

impl StateStore {
    /// Create a store driving the board's sysfs LEDs.
    pub fn new(config: &SensorConfig) -> Self {
        Self::with_indicator(config, Box::new(SysfsLeds::new()))
    }

    /// Create a store with a custom indicator device.
    pub fn with_indicator(config: &SensorConfig, indicator: Box<dyn Indicator>) -> Self {
        Self {
            open_label: config.open_label.clone(),
            closed_label: config.closed_label.clone(),
            open_pattern: config.open_pattern,
            closed_pattern: config.closed_pattern,
            record: Mutex::new(TransitionRecord::default()),
            indicator: Mutex::new(indicator),
        }
    }

    /// Map a raw level to its display label. A closed switch pulls the
    /// line active, so `true` is the closed state.
    fn label_for(&self, raw: bool) -> &str {
        if raw {
            &self.closed_label
        } else {
            &self.open_label
        }
    }

    /// Disable the LEDs' kernel triggers, once, if any pattern is
    /// configured. Called by the sampler before its first poll.
    pub fn init_indicator(&self) -> Result<()> {
        if self.open_pattern.is_none() && self.closed_pattern.is_none() {
            return Ok(());
        }
        self.indicator
            .lock()
            .expect("indicator lock poisoned")
            .disable_triggers()
    }

    /// Record a level change: swap in the new state and timestamp under
    /// the record lock, then mirror it to the LEDs outside the lock.
    pub fn transition(&self, raw: bool) -> Result<()> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();

        let previous = {
            let mut record = self.record.lock().expect("state record lock poisoned");
            let previous = record.raw;
            record.raw = Some(raw);
            record.last_transition = Some(now);
            previous
        };

        info!(
            "transition: {} -> {}",
            previous.map_or("None", |p| self.label_for(p)),
            self.label_for(raw)
        );

        let pattern = if raw {
            &self.closed_pattern
        } else {
            &self.open_pattern
        };
        if let Some(pattern) = pattern {
            self.indicator
                .lock()
                .expect("indicator lock poisoned")
                .apply(pattern)?;
        }

        Ok(())
    }

    /// Copy the current state. Never blocks on the sampler beyond the
    /// brief record lock.
    pub fn read(&self) -> StateReading {
        let record = *self.record.lock().expect("state record lock poisoned");
        StateReading {
            state: record.raw.map(|raw| self.label_for(raw).to_string()),
            ts: record.last_transition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    /// Indicator test double recording every call.
    pub(crate) struct RecordingIndicator {
        pub applied: Arc<StdMutex<Vec<LedPattern>>>,
        pub triggers_disabled: Arc<StdMutex<u32>>,
    }

    impl RecordingIndicator {
        pub(crate) fn new() -> (Self, Arc<StdMutex<Vec<LedPattern>>>, Arc<StdMutex<u32>>) {
            let applied = Arc::new(StdMutex::new(Vec::new()));
            let triggers = Arc::new(StdMutex::new(0));
            (
                Self {
                    applied: applied.clone(),
                    triggers_disabled: triggers.clone(),
                },
                applied,
                triggers,
            )
        }
    }

    impl Indicator for RecordingIndicator {
        fn disable_triggers(&mut self) -> Result<()> {
            *self.triggers_disabled.lock().unwrap() += 1;
            Ok(())
        }

        fn apply(&mut self, pattern: &LedPattern) -> Result<()> {
            self.applied.lock().unwrap().push(*pattern);
            Ok(())
        }
    }

    fn store_with_recorder(
        config: &SensorConfig,
    ) -> (StateStore, Arc<StdMutex<Vec<LedPattern>>>, Arc<StdMutex<u32>>) {
        let (indicator, applied, triggers) = RecordingIndicator::new();
        (
            StateStore::with_indicator(config, Box::new(indicator)),
            applied,
            triggers,
        )
    }

    #[test]
    fn test_unset_before_first_sample() {
        let (store, _, _) = store_with_recorder(&SensorConfig::new(17));
        let reading = store.read();
        assert_eq!(reading.state, None);
        assert_eq!(reading.ts, None);
    }

    #[test]
    fn test_state_and_timestamp_set_together() {
        let (store, _, _) = store_with_recorder(&SensorConfig::new(17));
        store.transition(false).unwrap();

        let reading = store.read();
        assert_eq!(reading.state.as_deref(), Some("open"));
        assert!(reading.ts.is_some());
    }

    #[test]
    fn test_label_mapping() {
        let config = SensorConfig::new(17).with_labels("ajar", "shut");
        let (store, _, _) = store_with_recorder(&config);

        store.transition(true).unwrap();
        assert_eq!(store.read().state.as_deref(), Some("shut"));

        store.transition(false).unwrap();
        assert_eq!(store.read().state.as_deref(), Some("ajar"));
    }

    #[test]
    fn test_read_is_idempotent() {
        let (store, _, _) = store_with_recorder(&SensorConfig::new(17));
        store.transition(true).unwrap();

        let first = store.read();
        let second = store.read();
        assert_eq!(first, second);
    }

    #[test]
    fn test_timestamp_advances() {
        let (store, _, _) = store_with_recorder(&SensorConfig::new(17));
        store.transition(false).unwrap();
        let t0 = store.read().ts.unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));
        store.transition(true).unwrap();
        let t1 = store.read().ts.unwrap();

        assert!(t1 > t0);
    }

    #[test]
    fn test_no_patterns_never_touches_indicator() {
        let (store, applied, triggers) = store_with_recorder(&SensorConfig::new(17));

        store.init_indicator().unwrap();
        store.transition(false).unwrap();
        store.transition(true).unwrap();
        store.transition(false).unwrap();

        assert!(applied.lock().unwrap().is_empty());
        assert_eq!(*triggers.lock().unwrap(), 0);
    }

    #[test]
    fn test_patterns_applied_per_state() {
        let open: LedPattern = "10".parse().unwrap();
        let closed: LedPattern = "01".parse().unwrap();
        let config = SensorConfig::new(17)
            .with_open_pattern(Some(open))
            .with_closed_pattern(Some(closed));
        let (store, applied, triggers) = store_with_recorder(&config);

        store.init_indicator().unwrap();
        store.transition(false).unwrap();
        store.transition(true).unwrap();

        assert_eq!(*triggers.lock().unwrap(), 1);
        assert_eq!(applied.lock().unwrap().as_slice(), &[open, closed]);
    }

    #[test]
    fn test_only_configured_pattern_applied() {
        let closed: LedPattern = "01".parse().unwrap();
        let config = SensorConfig::new(17).with_closed_pattern(Some(closed));
        let (store, applied, _) = store_with_recorder(&config);

        store.transition(false).unwrap();
        assert!(applied.lock().unwrap().is_empty());

        store.transition(true).unwrap();
        assert_eq!(applied.lock().unwrap().as_slice(), &[closed]);
    }
}
