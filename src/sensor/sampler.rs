//! The sampler: a dedicated thread polling the sensor pin and driving
//! the state store.
//!
//! Faults after the loop is running (pin reads, LED writes) abort the
//! process outright instead of unwinding; a supervisor is expected to
//! restart the process.

use crate::error::Result;
use crate::sensor::config::SensorConfig;
use crate::sensor::pin::{DefaultPinReader, PinReader};
use crate::sensor::state::StateStore;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{error, info};

/// Handle to the running sampler thread.
///
/// Stopping is cooperative: the flag is checked once per iteration, so
/// worst-case shutdown latency is one poll interval. Dropping the
/// handle stops and joins the thread, so every exit path of the owning
/// scope shuts the sampler down.
pub struct Sampler {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Sampler {
    /// Initialize the indicator, claim the pin, and start polling on a
    /// dedicated thread.
    ///
    /// Setup failures (LED trigger writes, pin claiming) propagate to
    /// the caller before any thread is spawned.
    pub fn spawn(config: SensorConfig, store: Arc<StateStore>) -> Result<Self> {
        store.init_indicator()?;
        let mut reader = DefaultPinReader::open(config.pin)?;

        info!(
            "sampler running (pin={}, interval={:.3}s)",
            config.pin,
            config.poll_interval.as_secs_f64()
        );

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let interval = config.poll_interval;

        let handle = thread::Builder::new()
            .name("doorwatch-sampler".to_string())
            .spawn(move || {
                if let Err(err) = poll_loop(&mut reader, &store, &thread_stop, interval) {
                    error!("sampler fault: {}", err);
                    error!("aborting: refusing to keep serving a stale state");
                    process::abort();
                }
                info!("sampler exiting");
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Signal the thread to stop and wait for it to exit.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The steady-state loop: poll, transition on change, sleep, check stop.
///
/// The last observed level starts out unset, which differs from any
/// real level, so the very first poll always records a transition.
/// That populates the store and exercises the indicator once at
/// startup.
fn poll_loop(
    reader: &mut dyn PinReader,
    store: &StateStore,
    stop: &AtomicBool,
    interval: Duration,
) -> Result<()> {
    let mut last: Option<bool> = None;

    loop {
        let level = reader.read()?;
        if Some(level) != last {
            store.transition(level)?;
            last = Some(level);
        }

        thread::sleep(interval);
        if stop.load(Ordering::Relaxed) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonitorError;
    use crate::sensor::leds::{Indicator, LedPattern};
    use std::sync::Mutex;

    /// Pin reader fed from a fixed script. Once the script is
    /// exhausted it keeps returning the last level and raises the stop
    /// flag so the loop winds down deterministically.
    struct ScriptedPin {
        script: Vec<bool>,
        pos: usize,
        stop: Arc<AtomicBool>,
    }

    impl ScriptedPin {
        fn new(script: Vec<bool>, stop: Arc<AtomicBool>) -> Self {
            Self {
                script,
                pos: 0,
                stop,
            }
        }
    }

    impl PinReader for ScriptedPin {
        fn read(&mut self) -> Result<bool> {
            if self.pos + 1 >= self.script.len() {
                self.stop.store(true, Ordering::Relaxed);
            }
            let level = self.script[self.pos.min(self.script.len() - 1)];
            self.pos += 1;
            Ok(level)
        }
    }

    /// Pin reader that fails after a number of good reads.
    struct FailingPin {
        good_reads: Vec<bool>,
        pos: usize,
    }

    impl PinReader for FailingPin {
        fn read(&mut self) -> Result<bool> {
            if self.pos < self.good_reads.len() {
                let level = self.good_reads[self.pos];
                self.pos += 1;
                Ok(level)
            } else {
                Err(MonitorError::hardware_error("pin read failed"))
            }
        }
    }

    struct CountingIndicator {
        applied: Arc<Mutex<Vec<LedPattern>>>,
    }

    impl Indicator for CountingIndicator {
        fn disable_triggers(&mut self) -> Result<()> {
            Ok(())
        }

        fn apply(&mut self, pattern: &LedPattern) -> Result<()> {
            self.applied.lock().unwrap().push(*pattern);
            Ok(())
        }
    }

    fn counting_store(config: &SensorConfig) -> (Arc<StateStore>, Arc<Mutex<Vec<LedPattern>>>) {
        let applied = Arc::new(Mutex::new(Vec::new()));
        let indicator = CountingIndicator {
            applied: applied.clone(),
        };
        (
            Arc::new(StateStore::with_indicator(config, Box::new(indicator))),
            applied,
        )
    }

    fn run_script(script: Vec<bool>) -> (Arc<StateStore>, Arc<Mutex<Vec<LedPattern>>>) {
        let config = SensorConfig::new(17)
            .with_open_pattern(Some("10".parse().unwrap()))
            .with_closed_pattern(Some("01".parse().unwrap()));
        let (store, applied) = counting_store(&config);

        let stop = Arc::new(AtomicBool::new(false));
        let mut pin = ScriptedPin::new(script, stop.clone());
        poll_loop(&mut pin, &store, &stop, Duration::from_millis(1)).unwrap();

        (store, applied)
    }

    #[test]
    fn test_first_sample_always_transitions() {
        let (store, applied) = run_script(vec![false, false, false]);
        assert_eq!(store.read().state.as_deref(), Some("open"));
        // One forced transition, no level changes afterwards.
        assert_eq!(applied.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_transition_count_matches_level_changes() {
        // 1 forced + changes at positions false->true, true->false.
        let (store, applied) = run_script(vec![false, false, true, true, false]);
        assert_eq!(store.read().state.as_deref(), Some("open"));
        assert_eq!(applied.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_patterns_follow_levels() {
        let open: LedPattern = "10".parse().unwrap();
        let closed: LedPattern = "01".parse().unwrap();

        let (_, applied) = run_script(vec![false, true]);
        assert_eq!(applied.lock().unwrap().as_slice(), &[open, closed]);
    }

    #[test]
    fn test_read_failure_stops_the_loop() {
        let (store, applied) = counting_store(
            &SensorConfig::new(17).with_closed_pattern(Some("01".parse().unwrap())),
        );

        let stop = Arc::new(AtomicBool::new(false));
        let mut pin = FailingPin {
            good_reads: vec![true],
            pos: 0,
        };

        let result = poll_loop(&mut pin, &store, &stop, Duration::from_millis(1));
        assert!(matches!(result, Err(MonitorError::Hardware(_))));

        // The one good read transitioned; nothing was recorded after
        // the failure.
        assert_eq!(applied.lock().unwrap().len(), 1);
        let reading = store.read();
        assert_eq!(reading.state.as_deref(), Some("closed"));
    }

    #[test]
    fn test_led_write_failure_stops_the_loop() {
        struct BrokenIndicator;

        impl Indicator for BrokenIndicator {
            fn disable_triggers(&mut self) -> Result<()> {
                Ok(())
            }

            fn apply(&mut self, _pattern: &LedPattern) -> Result<()> {
                Err(MonitorError::hardware_error("LED write failed"))
            }
        }

        let config = SensorConfig::new(17).with_open_pattern(Some("10".parse().unwrap()));
        let store = Arc::new(StateStore::with_indicator(&config, Box::new(BrokenIndicator)));

        let stop = Arc::new(AtomicBool::new(false));
        let mut pin = ScriptedPin::new(vec![false, false], stop.clone());

        let result = poll_loop(&mut pin, &store, &stop, Duration::from_millis(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_stop_flag_ends_the_loop() {
        let config = SensorConfig::new(17);
        let (store, _) = counting_store(&config);

        let stop = Arc::new(AtomicBool::new(false));
        let stop_thread = stop.clone();
        let store_thread = store.clone();

        let handle = thread::spawn(move || {
            struct SteadyPin;
            impl PinReader for SteadyPin {
                fn read(&mut self) -> Result<bool> {
                    Ok(true)
                }
            }
            let mut pin = SteadyPin;
            poll_loop(&mut pin, &store_thread, &stop_thread, Duration::from_millis(1))
        });

        stop.store(true, Ordering::Relaxed);
        assert!(handle.join().unwrap().is_ok());
        assert_eq!(store.read().state.as_deref(), Some("closed"));
    }
}
