//! Blinking LED driven by its own worker thread.
//!
//! Used by the thread-per-peripheral and pub-sub strategies. The worker
//! owns the pin while it runs: it toggles, then sleeps in short slices,
//! re-reading the shared rate after every slice so a new rate takes effect
//! within one slice instead of one full period.
//!
//! Stopping clears the `blinking` flag; the worker notices within a slice,
//! drives the pin LOW and returns it through its `JoinHandle`, so the pin
//! is back in the LED's hands after [`ThreadedLed::stop`].
//!
//! ```text
//!  ThreadedLed ──set_rate(r>0)──▶ spawn worker(pin) ──▶ toggle · sleep…
//!       ▲                                                    │
//!       └──────────── join() returns pin ◀── blinking=false ─┘
//! ```

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use embedded_hal::digital::StatefulOutputPin;
use log::{debug, error, warn};

use super::led::{drive, rate_to_ms};
use crate::app::ports::LedPort;
use crate::error::{ActuatorError, Error};

/// State shared between the LED handle and its worker.
struct Shared {
    rate_ms: AtomicU64,
    blinking: AtomicBool,
}

pub struct ThreadedLed<P: StatefulOutputPin + Send + 'static> {
    name: String,
    gpio: u8,
    slice: Duration,
    shared: Arc<Shared>,
    /// Present whenever no worker holds the pin.
    pin: Option<P>,
    worker: Option<JoinHandle<P>>,
}

impl<P: StatefulOutputPin + Send + 'static> ThreadedLed<P> {
    /// Take ownership of an output pin and drive it LOW. No thread runs
    /// until a positive rate is set.
    pub fn new(mut pin: P, name: impl Into<String>, gpio: u8, slice: Duration) -> Self {
        drive(&mut pin, gpio, false);
        Self {
            name: name.into(),
            gpio,
            slice,
            shared: Arc::new(Shared {
                rate_ms: AtomicU64::new(0),
                blinking: AtomicBool::new(false),
            }),
            pin: Some(pin),
            worker: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gpio(&self) -> u8 {
        self.gpio
    }

    pub fn rate_secs(&self) -> f32 {
        self.shared.rate_ms.load(Ordering::Acquire) as f32 / 1000.0
    }

    pub fn is_blinking(&self) -> bool {
        self.shared.blinking.load(Ordering::Acquire)
    }

    /// A worker exists and has not been told to stop.
    fn worker_running(&self) -> bool {
        self.is_blinking() && self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    /// Set the half-period. A rate `<= 0` tells the worker to stop (it
    /// turns the LED off on its way out); a positive rate either updates
    /// the running worker in place or starts a new one.
    pub fn set_rate(&mut self, rate_secs: f32) {
        let rate_ms = rate_to_ms(rate_secs);
        debug!("LED {} on GPIO {}: rate {} ms", self.name, self.gpio, rate_ms);
        self.shared.rate_ms.store(rate_ms, Ordering::Release);

        if rate_ms == 0 {
            self.shared.blinking.store(false, Ordering::Release);
            if let Some(pin) = self.pin.as_mut() {
                drive(pin, self.gpio, false);
            }
        } else if !self.worker_running() {
            self.start();
        }
    }

    /// Stop the worker and wait for it to hand the pin back, LED off.
    pub fn stop(&mut self) {
        self.shared.blinking.store(false, Ordering::Release);
        self.reclaim();
        if let Some(pin) = self.pin.as_mut() {
            drive(pin, self.gpio, false);
        }
    }

    fn start(&mut self) {
        self.reclaim();

        let Some(pin) = self.pin.take() else {
            warn!("LED {} on GPIO {}: pin lost, cannot blink", self.name, self.gpio);
            return;
        };

        self.shared.blinking.store(true, Ordering::Release);
        let shared = Arc::clone(&self.shared);
        let slice = self.slice;
        let gpio = self.gpio;

        match thread::Builder::new()
            .name(format!("led-gpio{}", self.gpio))
            .spawn(move || blink_worker(pin, gpio, &shared, slice))
        {
            Ok(handle) => {
                debug!("LED {} on GPIO {}: blinking thread started", self.name, self.gpio);
                self.worker = Some(handle);
            }
            Err(e) => {
                self.shared.blinking.store(false, Ordering::Release);
                error!("LED {} on GPIO {}: thread spawn failed: {}", self.name, self.gpio, e);
            }
        }
    }

    /// Join a stopped worker and take the pin back.
    fn reclaim(&mut self) {
        if let Some(handle) = self.worker.take() {
            match handle.join() {
                Ok(pin) => self.pin = Some(pin),
                Err(_) => error!(
                    "LED {} on GPIO {}: {}",
                    self.name,
                    self.gpio,
                    Error::from(ActuatorError::WorkerLost)
                ),
            }
        }
    }
}

impl<P: StatefulOutputPin + Send + 'static> Drop for ThreadedLed<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<P: StatefulOutputPin + Send + 'static> fmt::Display for ThreadedLed<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blinking() {
            write!(
                f,
                "LED on GPIO {} is blinking at a rate of {} seconds",
                self.gpio,
                self.rate_secs()
            )
        } else {
            write!(f, "LED on GPIO {} is Off", self.gpio)
        }
    }
}

fn blink_worker<P: StatefulOutputPin>(mut pin: P, gpio: u8, shared: &Shared, slice: Duration) -> P {
    let slice_ms = slice.as_millis().max(1) as u64;

    while shared.blinking.load(Ordering::Acquire) {
        if let Err(e) = pin.toggle() {
            warn!("LED on GPIO {}: toggle failed: {:?}", gpio, e);
        }

        let mut waited_ms = 0;
        while shared.blinking.load(Ordering::Acquire)
            && waited_ms < shared.rate_ms.load(Ordering::Acquire)
        {
            thread::sleep(slice);
            waited_ms += slice_ms;
        }
    }

    drive(&mut pin, gpio, false);
    debug!("LED on GPIO {}: blinking thread finished", gpio);
    pin
}

// ───────────────────────────────────────────────────────────────
// ThreadedLedBank
// ───────────────────────────────────────────────────────────────

/// A set of threaded LEDs.
pub struct ThreadedLedBank<P: StatefulOutputPin + Send + 'static> {
    leds: Vec<ThreadedLed<P>>,
}

impl<P: StatefulOutputPin + Send + 'static> ThreadedLedBank<P> {
    pub fn new(leds: Vec<ThreadedLed<P>>) -> Self {
        Self { leds }
    }

    pub fn leds(&self) -> &[ThreadedLed<P>] {
        &self.leds
    }

    /// Stop and join every worker; every LED ends up off.
    pub fn stop_all(&mut self) {
        for led in &mut self.leds {
            led.stop();
        }
    }
}

impl<P: StatefulOutputPin + Send + 'static> LedPort for ThreadedLedBank<P> {
    fn led_count(&self) -> usize {
        self.leds.len()
    }

    fn set_rate(&mut self, index: usize, rate_secs: f32) {
        match self.leds.get_mut(index) {
            Some(led) => led.set_rate(rate_secs),
            None => warn!("LED bank: no LED at index {}", index),
        }
    }

    /// Turn every LED off, wait for every worker to finish, then start
    /// them all again. The workers start within microseconds of each
    /// other, which is what keeps them in unison.
    fn set_rate_all(&mut self, rate_secs: f32) {
        for led in &mut self.leds {
            led.set_rate(0.0);
        }
        self.stop_all();
        for led in &mut self.leds {
            led.set_rate(rate_secs);
        }
    }
}
