//! The four interchangeable ways of coordinating the peripherals.
//!
//! ```text
//!                 ┌────────────┐
//!  Peripherals ──▶│ run(strat) │──▶ event_loop | threads | pubsub | cooperative
//!                 └────────────┘
//! ```
//!
//! Every strategy follows the same lifecycle: read the dial, sync all LEDs
//! to it, react to the button and dial until `shutdown` is raised, then turn
//! every LED off. Only the scheduling differs; the rate logic always lives
//! in [`BlinkService`](crate::app::service::BlinkService).

pub mod cooperative;
pub mod event_loop;
pub mod pubsub;
mod samplers;
pub mod threads;

use core::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use embedded_hal::digital::{InputPin, StatefulOutputPin};
use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::AnalogInput;
use crate::config::SystemConfig;
use crate::drivers::button::ButtonDriver;
use crate::drivers::pot::Potentiometer;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Single-threaded busy poll.
    #[default]
    EventLoop,
    /// One thread per peripheral.
    Threads,
    /// Peripherals talk over the pub-sub bus.
    PubSub,
    /// Cooperative tasks on a single-threaded executor.
    Async,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EventLoop => "event-loop",
            Self::Threads => "threads",
            Self::PubSub => "pub-sub",
            Self::Async => "async",
        })
    }
}

/// An output pin destined to become an LED, with its identity.
pub struct LedPin<L> {
    pub name: String,
    pub gpio: u8,
    pub pin: L,
}

/// Everything a strategy drives.
pub struct Peripherals<L, B, A> {
    /// In button-cycling order.
    pub leds: Vec<LedPin<L>>,
    pub button: ButtonDriver<B>,
    pub pot: Potentiometer<A>,
}

/// Run `strategy` until `shutdown` is raised. Every LED is off on return.
pub fn run<L, B, A>(
    strategy: Strategy,
    peripherals: Peripherals<L, B, A>,
    config: &SystemConfig,
    shutdown: &AtomicBool,
) -> Result<()>
where
    L: StatefulOutputPin + Send + 'static,
    B: InputPin + Send,
    A: AnalogInput + Send,
{
    info!(
        "Starting {} strategy with {} LED(s). Press Control + C to exit.",
        strategy,
        peripherals.leds.len()
    );
    match strategy {
        Strategy::EventLoop => event_loop::run(peripherals, config, shutdown),
        Strategy::Threads => threads::run(peripherals, config, shutdown),
        Strategy::PubSub => pubsub::run(peripherals, config, shutdown),
        Strategy::Async => cooperative::run(peripherals, config, shutdown),
    }
}

/// Lock a mutex shared between strategy threads, ignoring poisoning.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sleep for `total`, waking every `slice` to check `shutdown`.
pub(crate) fn sleep_sliced(total: Duration, slice: Duration, shutdown: &AtomicBool) {
    let mut waited = Duration::ZERO;
    while waited < total && !shutdown.load(core::sync::atomic::Ordering::Acquire) {
        let step = slice.min(total - waited);
        std::thread::sleep(step);
        waited += step;
    }
}
