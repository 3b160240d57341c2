//! Mock hardware for integration tests.
//!
//! Pins, dial and LED port are handles over shared state: a test keeps one
//! clone to steer or inspect while a strategy (possibly on other threads)
//! owns another.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use blinkpace::app::events::AppEvent;
use blinkpace::app::ports::{AnalogInput, EventSink, LedPort};
use blinkpace::config::SystemConfig;
use blinkpace::drivers::button::ButtonDriver;
use blinkpace::drivers::pot::Potentiometer;
use blinkpace::error::{Error, SensorError};
use blinkpace::strategies::{LedPin, Peripherals};
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin, StatefulOutputPin};

// ── LED output pin ────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct SimLed {
    high: Arc<AtomicBool>,
    toggles: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl SimLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_lit(&self) -> bool {
        self.high.load(Ordering::SeqCst)
    }

    pub fn toggles(&self) -> usize {
        self.toggles.load(Ordering::SeqCst)
    }
}

impl ErrorType for SimLed {
    type Error = ErrorKind;
}

impl OutputPin for SimLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl StatefulOutputPin for SimLed {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.is_lit())
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_lit())
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.high.fetch_xor(true, Ordering::SeqCst);
        self.toggles.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ── Button input pin (active low) ─────────────────────────────

#[derive(Clone, Default)]
pub struct SimButton {
    low: Arc<AtomicBool>,
}

impl SimButton {
    pub fn press(&self) {
        self.low.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.low.store(false, Ordering::SeqCst);
    }
}

impl ErrorType for SimButton {
    type Error = ErrorKind;
}

impl InputPin for SimButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.low.load(Ordering::SeqCst))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.low.load(Ordering::SeqCst))
    }
}

// ── Potentiometer wiper ───────────────────────────────────────

#[derive(Clone)]
pub struct SimDial {
    volts: Arc<Mutex<Option<f32>>>,
}

#[allow(dead_code)]
impl SimDial {
    pub fn new(volts: f32) -> Self {
        Self {
            volts: Arc::new(Mutex::new(Some(volts))),
        }
    }

    pub fn turn_to(&self, volts: f32) {
        *self.volts.lock().unwrap() = Some(volts);
    }

    pub fn disconnect(&self) {
        *self.volts.lock().unwrap() = None;
    }
}

impl AnalogInput for SimDial {
    fn voltage(&mut self) -> Result<f32, Error> {
        self.volts
            .lock()
            .unwrap()
            .ok_or(Error::Sensor(SensorError::AdcBusFailed))
    }
}

// ── Recording ports ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum LedCall {
    One(usize, f32),
    All(f32),
}

pub struct RecordingLeds {
    pub count: usize,
    pub calls: Vec<LedCall>,
}

impl RecordingLeds {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            calls: Vec::new(),
        }
    }
}

impl LedPort for RecordingLeds {
    fn led_count(&self) -> usize {
        self.count
    }

    fn set_rate(&mut self, index: usize, rate_secs: f32) {
        self.calls.push(LedCall::One(index, rate_secs));
    }

    fn set_rate_all(&mut self, rate_secs: f32) {
        self.calls.push(LedCall::All(rate_secs));
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Test rig ──────────────────────────────────────────────────

/// Config with short intervals so strategies react within milliseconds.
pub fn fast_config() -> SystemConfig {
    let mut cfg = SystemConfig::default();
    cfg.timing.loop_sleep_ms = 2;
    cfg.timing.led_slice_ms = 2;
    cfg.pot.poll_ms = 5;
    cfg.button.debounce_ms = 4;
    cfg.button.hold_ms = 200;
    cfg
}

pub struct Rig {
    pub leds: Vec<SimLed>,
    pub button: SimButton,
    pub dial: SimDial,
}

/// Peripherals for `cfg`, plus the handles that steer them.
pub fn rig(cfg: &SystemConfig, volts: f32) -> (Peripherals<SimLed, SimButton, SimDial>, Rig) {
    let leds: Vec<SimLed> = cfg.leds.iter().map(|_| SimLed::new()).collect();
    let button = SimButton::default();
    let dial = SimDial::new(volts);

    let peripherals = Peripherals {
        leds: cfg
            .leds
            .iter()
            .zip(&leds)
            .map(|(c, pin)| LedPin {
                name: c.name.clone(),
                gpio: c.gpio,
                pin: pin.clone(),
            })
            .collect(),
        button: ButtonDriver::new(
            button.clone(),
            cfg.button.gpio,
            cfg.button.hold_ms,
            cfg.button.debounce_ms,
        ),
        pot: Potentiometer::new(dial.clone(), &cfg.pot),
    };

    (peripherals, Rig { leds, button, dial })
}
