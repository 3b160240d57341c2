//! Busy-poll event loop.
//!
//! One thread does everything. Each iteration samples the button and (every
//! `pot.poll_ms`) the dial, queues what changed, drains the queue through
//! the service, lets every LED compare its deadline against the clock, then
//! sleeps `timing.loop_sleep_ms`.
//!
//! ```text
//!  ┌─▶ button.tick ─┐
//!  │   pot.poll  ───┼─▶ pending ─▶ service ─▶ bank.poll_all ─▶ sleep ─┐
//!  └─────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use embedded_hal::digital::{InputPin, StatefulOutputPin};
use heapless::Deque;
use log::{info, warn};

use super::Peripherals;
use crate::adapters::log_sink::LogEventSink;
use crate::adapters::time::MonotonicClock;
use crate::app::commands::AppCommand;
use crate::app::ports::{AnalogInput, Clock};
use crate::app::service::BlinkService;
use crate::config::SystemConfig;
use crate::drivers::led::{PolledLed, PolledLedBank};
use crate::error::Result;

/// Button and dial changes waiting for the service within one iteration.
const PENDING_DEPTH: usize = 8;

pub fn run<L, B, A>(
    peripherals: Peripherals<L, B, A>,
    config: &SystemConfig,
    shutdown: &AtomicBool,
) -> Result<()>
where
    L: StatefulOutputPin,
    B: InputPin,
    A: AnalogInput,
{
    let Peripherals {
        leds,
        mut button,
        mut pot,
    } = peripherals;

    let clock = MonotonicClock::new();
    let leds = leds
        .into_iter()
        .map(|l| PolledLed::new(l.pin, l.name, l.gpio))
        .collect();
    let mut bank = PolledLedBank::new(leds, clock);
    let mut sink = LogEventSink::new();
    let mut service = BlinkService::new();
    let mut pending: Deque<AppCommand, PENDING_DEPTH> = Deque::new();

    let loop_sleep = Duration::from_millis(config.timing.loop_sleep_ms);
    let pot_interval_ms = config.pot.poll_ms;
    let mut next_pot_ms = 0;

    service.start(pot.value(), &mut bank, &mut sink);

    while !shutdown.load(Ordering::Acquire) {
        let now = clock.now_ms();

        if let Some(event) = button.tick(now) {
            queue(&mut pending, AppCommand::Button(event));
        }
        if now >= next_pot_ms {
            next_pot_ms = now + pot_interval_ms;
            if let Some(rate) = pot.poll() {
                queue(&mut pending, AppCommand::PotChanged(rate));
            }
        }

        while let Some(cmd) = pending.pop_front() {
            service.handle_command(cmd, &mut bank, &mut sink);
        }

        bank.poll_all();
        std::thread::sleep(loop_sleep);
    }

    info!("Event loop: shutdown requested");
    service.stop(&mut bank, &mut sink);
    bank.all_off();
    Ok(())
}

fn queue<const N: usize>(pending: &mut Deque<AppCommand, N>, cmd: AppCommand) {
    if let Err(dropped) = pending.push_back(cmd) {
        warn!("Event loop: pending queue full, dropping {:?}", dropped);
    }
}
