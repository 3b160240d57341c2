//! In-memory pins, ADC and clock for driver unit tests.
//!
//! Every mock is a cheap handle around shared state, so a test can keep one
//! clone to steer or inspect the peripheral after handing another clone to
//! a driver (or to a worker thread).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin, StatefulOutputPin};

use crate::app::ports::{AnalogInput, Clock};
use crate::error::{Error, SensorError};

// ── Input pin ────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockInputPin {
    low: Arc<AtomicBool>,
    fail: Arc<AtomicBool>,
}

impl MockInputPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self) {
        self.low.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.low.store(false, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl ErrorType for MockInputPin {
    type Error = ErrorKind;
}

impl InputPin for MockInputPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ErrorKind::Other);
        }
        Ok(self.low.load(Ordering::SeqCst))
    }
}

// ── Output pin ───────────────────────────────────────────────

#[derive(Default)]
struct PinLog {
    high: bool,
    toggles: usize,
    writes: usize,
}

#[derive(Clone, Default)]
pub struct MockOutputPin {
    log: Arc<Mutex<PinLog>>,
}

impl MockOutputPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_lit(&self) -> bool {
        self.log.lock().unwrap().high
    }

    pub fn toggles(&self) -> usize {
        self.log.lock().unwrap().toggles
    }

    pub fn writes(&self) -> usize {
        self.log.lock().unwrap().writes
    }
}

impl ErrorType for MockOutputPin {
    type Error = ErrorKind;
}

impl OutputPin for MockOutputPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut log = self.log.lock().unwrap();
        log.high = false;
        log.writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut log = self.log.lock().unwrap();
        log.high = true;
        log.writes += 1;
        Ok(())
    }
}

impl StatefulOutputPin for MockOutputPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.log.lock().unwrap().high)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.log.lock().unwrap().high)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        let mut log = self.log.lock().unwrap();
        log.high = !log.high;
        log.toggles += 1;
        log.writes += 1;
        Ok(())
    }
}

// ── Analog input ─────────────────────────────────────────────

#[derive(Clone)]
pub struct MockAnalog {
    volts: Arc<Mutex<Option<f32>>>,
}

impl MockAnalog {
    pub fn new(volts: f32) -> Self {
        Self {
            volts: Arc::new(Mutex::new(Some(volts))),
        }
    }

    pub fn set_volts(&self, volts: f32) {
        *self.volts.lock().unwrap() = Some(volts);
    }

    /// Make subsequent reads fail as if the I2C link dropped.
    pub fn disconnect(&self) {
        *self.volts.lock().unwrap() = None;
    }
}

impl AnalogInput for MockAnalog {
    fn voltage(&mut self) -> Result<f32, Error> {
        self.volts
            .lock()
            .unwrap()
            .ok_or(Error::Sensor(SensorError::AdcBusFailed))
    }
}

// ── Clock ────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
