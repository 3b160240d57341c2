//! Polled blinking LED and the bank that drives several in phase.
//!
//! Used by the strategies that never block: the busy-poll event loop and
//! the cooperative executor. Each LED keeps a toggle deadline; whoever owns
//! it calls [`PolledLed::poll`] often (every loop iteration or every task
//! wake-up) and the LED flips when the deadline passes.
//!
//! ```text
//!  set_rate(r) ──▶ ON, toggle_at = now + r
//!  poll(now ≥ toggle_at) ──▶ toggle, toggle_at += r
//!  set_rate(0) ──▶ OFF, no deadline
//! ```

use core::fmt;

use embedded_hal::digital::{OutputPin, StatefulOutputPin};
use log::{debug, warn};

use crate::app::ports::{Clock, LedPort};
use crate::error::{ActuatorError, Error};

/// Convert a rate in seconds to whole milliseconds. Anything that rounds
/// to zero (or is negative / NaN) means "off".
pub fn rate_to_ms(rate_secs: f32) -> u64 {
    if rate_secs > 0.0 {
        (rate_secs * 1000.0).round() as u64
    } else {
        0
    }
}

/// Drive a pin to a level, logging instead of failing.
pub(crate) fn drive<P: OutputPin>(pin: &mut P, gpio: u8, on: bool) {
    let result = if on { pin.set_high() } else { pin.set_low() };
    if let Err(e) = result {
        warn!(
            "LED on GPIO {}: {} ({:?})",
            gpio,
            Error::from(ActuatorError::GpioWriteFailed),
            e
        );
    }
}

// ───────────────────────────────────────────────────────────────
// PolledLed
// ───────────────────────────────────────────────────────────────

pub struct PolledLed<P> {
    pin: P,
    name: String,
    gpio: u8,
    rate_ms: u64,
    /// `None` while the LED is off.
    toggle_at_ms: Option<u64>,
}

impl<P: StatefulOutputPin> PolledLed<P> {
    /// Take ownership of an output pin and drive it LOW (off by default).
    pub fn new(mut pin: P, name: impl Into<String>, gpio: u8) -> Self {
        drive(&mut pin, gpio, false);
        Self {
            pin,
            name: name.into(),
            gpio,
            rate_ms: 0,
            toggle_at_ms: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gpio(&self) -> u8 {
        self.gpio
    }

    pub fn is_blinking(&self) -> bool {
        self.toggle_at_ms.is_some()
    }

    pub fn rate_secs(&self) -> f32 {
        self.rate_ms as f32 / 1000.0
    }

    /// Next scheduled toggle, if blinking.
    pub fn toggle_at_ms(&self) -> Option<u64> {
        self.toggle_at_ms
    }

    /// Current pin level as last driven.
    pub fn is_lit(&mut self) -> bool {
        self.pin.is_set_high().unwrap_or(false)
    }

    /// Set the half-period. A rate `<= 0` turns the LED off; otherwise the
    /// LED turns on now and first toggles one period later.
    pub fn set_rate(&mut self, rate_secs: f32, now_ms: u64) {
        self.rate_ms = rate_to_ms(rate_secs);
        debug!(
            "LED {} on GPIO {}: rate {} ms",
            self.name, self.gpio, self.rate_ms
        );

        if self.rate_ms == 0 {
            self.toggle_at_ms = None;
            drive(&mut self.pin, self.gpio, false);
        } else {
            self.toggle_at_ms = Some(now_ms.saturating_add(self.rate_ms));
            drive(&mut self.pin, self.gpio, true);
        }
    }

    /// Toggle if the deadline has passed. Returns `true` when it toggled.
    ///
    /// After a stall longer than a whole period the deadline restarts from
    /// `now` instead of toggling repeatedly to catch up.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let Some(at) = self.toggle_at_ms else {
            return false;
        };
        if now_ms < at {
            return false;
        }

        if let Err(e) = self.pin.toggle() {
            warn!("LED on GPIO {}: toggle failed: {:?}", self.gpio, e);
        }
        let next = at.saturating_add(self.rate_ms);
        self.toggle_at_ms = Some(if next <= now_ms {
            now_ms.saturating_add(self.rate_ms)
        } else {
            next
        });
        true
    }

    pub fn off(&mut self) {
        self.rate_ms = 0;
        self.toggle_at_ms = None;
        drive(&mut self.pin, self.gpio, false);
    }
}

impl<P> fmt::Display for PolledLed<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.toggle_at_ms.is_some() {
            write!(
                f,
                "LED on GPIO {} is blinking at a rate of {} seconds",
                self.gpio,
                self.rate_ms as f32 / 1000.0
            )
        } else {
            write!(f, "LED on GPIO {} is Off", self.gpio)
        }
    }
}

// ───────────────────────────────────────────────────────────────
// PolledLedBank
// ───────────────────────────────────────────────────────────────

/// A set of polled LEDs sharing one clock.
pub struct PolledLedBank<P, C> {
    leds: Vec<PolledLed<P>>,
    clock: C,
}

impl<P: StatefulOutputPin, C: Clock> PolledLedBank<P, C> {
    pub fn new(leds: Vec<PolledLed<P>>, clock: C) -> Self {
        Self { leds, clock }
    }

    pub fn leds(&self) -> &[PolledLed<P>] {
        &self.leds
    }

    /// Poll every LED against a single timestamp.
    pub fn poll_all(&mut self) {
        let now = self.clock.now_ms();
        for led in &mut self.leds {
            led.poll(now);
        }
    }

    /// Poll one LED (the cooperative strategy runs one task per LED).
    pub fn poll_one(&mut self, index: usize) -> bool {
        let now = self.clock.now_ms();
        self.leds.get_mut(index).is_some_and(|led| led.poll(now))
    }

    pub fn all_off(&mut self) {
        for led in &mut self.leds {
            led.off();
        }
    }
}

impl<P: StatefulOutputPin, C: Clock> LedPort for PolledLedBank<P, C> {
    fn led_count(&self) -> usize {
        self.leds.len()
    }

    fn set_rate(&mut self, index: usize, rate_secs: f32) {
        let now = self.clock.now_ms();
        match self.leds.get_mut(index) {
            Some(led) => led.set_rate(rate_secs, now),
            None => warn!("LED bank: no LED at index {}", index),
        }
    }

    /// All off, then all on with one shared deadline: the LEDs blink in
    /// unison from here on.
    fn set_rate_all(&mut self, rate_secs: f32) {
        let now = self.clock.now_ms();
        for led in &mut self.leds {
            led.set_rate(0.0, now);
        }
        for led in &mut self.leds {
            led.set_rate(rate_secs, now);
        }
    }
}
