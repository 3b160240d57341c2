//! Debounced push-button driver with press, release and hold detection.
//!
//! ## Hardware
//!
//! Active-low momentary switch; the GPIO's internal pull-up holds the line
//! HIGH until the button shorts it to GND. The `tick()` method is called
//! by whichever strategy owns the button (event loop iteration, button
//! thread, or button task) and runs the debounce + hold state machine.
//!
//! ## Events
//!
//! | Event      | Condition                                        |
//! |------------|--------------------------------------------------|
//! | `Pressed`  | line LOW and stable for `debounce_ms`            |
//! | `Hold`     | still pressed `hold_ms` after `Pressed` (once)   |
//! | `Released` | line HIGH and stable for `debounce_ms`           |

use core::fmt;

use embedded_hal::digital::InputPin;
use log::{debug, warn};

use crate::error::{Error, SensorError};

/// Button events, in the order a full press-and-hold produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
    Hold,
    Released,
}

impl ButtonEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pressed => "PRESSED",
            Self::Hold => "HOLD",
            Self::Released => "RELEASED",
        }
    }
}

impl fmt::Display for ButtonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
    Released,
    Pressed { since_ms: u64 },
    Held,
}

pub struct ButtonDriver<P> {
    pin: P,
    gpio: u8,
    hold_ms: u64,
    debounce_ms: u64,
    state: PressState,
    /// Last raw level seen (true = LOW = pressed) and when it started.
    raw_low: bool,
    raw_since_ms: u64,
    /// Last level that survived the debounce window.
    stable_low: bool,
}

impl<P: InputPin> ButtonDriver<P> {
    /// Wrap an input pin that already has its pull-up enabled.
    ///
    /// The level at construction is taken as the settled level, so a
    /// button held down at startup produces no events until released.
    pub fn new(mut pin: P, gpio: u8, hold_ms: u64, debounce_ms: u64) -> Self {
        let initial_low = match pin.is_low() {
            Ok(low) => low,
            Err(e) => {
                warn!("Button on GPIO {}: initial read failed: {:?}", gpio, e);
                false
            }
        };
        Self {
            pin,
            gpio,
            hold_ms,
            debounce_ms,
            state: if initial_low {
                PressState::Held
            } else {
                PressState::Released
            },
            raw_low: initial_low,
            raw_since_ms: 0,
            stable_low: initial_low,
        }
    }

    /// GPIO pin this button is attached to.
    pub fn gpio(&self) -> u8 {
        self.gpio
    }

    pub fn hold_ms(&self) -> u64 {
        self.hold_ms
    }

    /// Debounced "button is down".
    pub fn is_pressed(&self) -> bool {
        self.state != PressState::Released
    }

    /// The current press has lasted past the hold threshold.
    pub fn is_held(&self) -> bool {
        self.state == PressState::Held
    }

    /// Sample the pin and advance the state machine.
    /// `now_ms` is the current monotonic time in milliseconds.
    /// Returns at most one event per call.
    pub fn tick(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        let raw_low = match self.pin.is_low() {
            Ok(low) => low,
            Err(e) => {
                warn!(
                    "Button on GPIO {}: {} ({:?})",
                    self.gpio,
                    Error::from(SensorError::GpioReadFailed),
                    e
                );
                return None;
            }
        };

        if raw_low != self.raw_low {
            self.raw_low = raw_low;
            self.raw_since_ms = now_ms;
        }

        if self.raw_low != self.stable_low
            && now_ms.saturating_sub(self.raw_since_ms) >= self.debounce_ms
        {
            self.stable_low = self.raw_low;
            return if self.stable_low {
                self.state = PressState::Pressed { since_ms: now_ms };
                debug!("Button on GPIO {}: pressed", self.gpio);
                Some(ButtonEvent::Pressed)
            } else {
                let was = self.state;
                self.state = PressState::Released;
                debug!("Button on GPIO {}: released", self.gpio);
                (was != PressState::Released).then_some(ButtonEvent::Released)
            };
        }

        if let PressState::Pressed { since_ms } = self.state {
            if now_ms.saturating_sub(since_ms) >= self.hold_ms {
                self.state = PressState::Held;
                debug!("Button on GPIO {}: hold", self.gpio);
                return Some(ButtonEvent::Hold);
            }
        }

        None
    }
}

impl<P> fmt::Display for ButtonDriver<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Button on GPIO {}: pressed={}, hold={}",
            self.gpio,
            self.state != PressState::Released,
            self.state == PressState::Held
        )
    }
}
