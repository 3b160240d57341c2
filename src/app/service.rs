//! Application service: the rate controller shared by every strategy.
//!
//! [`BlinkService`] owns the only coordination state in the system: which
//! LED the dial currently controls and the last rate the dial reported.
//! LEDs are reached through a [`LedPort`] injected at call sites, so the
//! same service drives a polled bank, worker threads, or bus publishers.
//!
//! ```text
//!  Button ──┐                             ┌──▶ LedPort
//!           ├─▶ AppCommand ─▶ BlinkService ┤
//!  Dial ────┘                             └──▶ EventSink
//! ```
//!
//! | Input            | Effect                                         |
//! |------------------|------------------------------------------------|
//! | Button pressed   | dial moves on to the next LED (wraps)          |
//! | Button held      | every LED takes the last dial rate, in phase   |
//! | Button released  | nothing                                        |
//! | Dial changed     | selected LED takes the new rate                |

use log::info;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{EventSink, LedPort};
use crate::drivers::button::ButtonEvent;

// ───────────────────────────────────────────────────────────────
// BlinkService
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BlinkService {
    selected: usize,
    last_rate: f32,
    running: bool,
}

impl Default for BlinkService {
    fn default() -> Self {
        Self::new()
    }
}

impl BlinkService {
    pub fn new() -> Self {
        Self {
            selected: 0,
            last_rate: 0.0,
            running: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Set every LED to the dial's starting position and begin accepting
    /// commands.
    pub fn start(&mut self, initial_rate: f32, leds: &mut impl LedPort, sink: &mut impl EventSink) {
        self.last_rate = initial_rate;
        self.selected = 0;
        self.running = true;
        leds.set_rate_all(initial_rate);
        sink.emit(&AppEvent::Started {
            rate_secs: initial_rate,
            selected: self.selected,
        });
    }

    /// Turn every LED off. Commands arriving afterwards are ignored.
    pub fn stop(&mut self, leds: &mut impl LedPort, sink: &mut impl EventSink) {
        self.running = false;
        leds.set_rate_all(0.0);
        sink.emit(&AppEvent::Stopped);
    }

    // ── Command handling ──────────────────────────────────────

    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        leds: &mut impl LedPort,
        sink: &mut impl EventSink,
    ) {
        if !self.running {
            info!("BlinkService: not running, dropping {:?}", cmd);
            return;
        }

        match cmd {
            AppCommand::Button(ButtonEvent::Pressed) => {
                let count = leds.led_count();
                if count == 0 {
                    return;
                }
                self.selected = (self.selected + 1) % count;
                sink.emit(&AppEvent::SelectionChanged {
                    selected: self.selected,
                });
            }
            AppCommand::Button(ButtonEvent::Hold) => {
                leds.set_rate_all(self.last_rate);
                sink.emit(&AppEvent::AllSynced {
                    rate_secs: self.last_rate,
                });
            }
            AppCommand::Button(ButtonEvent::Released) => {}
            AppCommand::PotChanged(rate) => {
                self.last_rate = rate;
                if self.selected < leds.led_count() {
                    leds.set_rate(self.selected, rate);
                    sink.emit(&AppEvent::LedRateChanged {
                        index: self.selected,
                        rate_secs: rate,
                    });
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Index of the LED the dial currently controls.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Last rate reported by the dial.
    pub fn last_rate(&self) -> f32 {
        self.last_rate
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
